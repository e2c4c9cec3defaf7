use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{
    AzureChatService, AzureSpeechService, ServiceConfig, config::default_config::missing_vars,
};
use rag_pipeline::Pipeline;
use tracing::warn;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Completion + synthesis handles, built once.
    pub pipeline: Pipeline,
    /// Directory holding `index.html` and the `/static` assets.
    pub frontend_dir: PathBuf,
}

impl AppState {
    pub fn new(pipeline: Pipeline, frontend_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            frontend_dir: frontend_dir.into(),
        }
    }

    /// Build the Azure clients from environment variables.
    ///
    /// Missing variables are only reported; the first request that needs them
    /// fails upstream instead.
    pub fn from_env(settings: &ServerSettings) -> Result<Self, AppError> {
        for name in missing_vars() {
            warn!(var = name, "environment variable is not set");
        }

        let cfg = ServiceConfig::from_env();
        let chat = AzureChatService::new(&cfg).map_err(AppError::Client)?;
        let speech = AzureSpeechService::new(&cfg).map_err(AppError::Client)?;

        Ok(Self::new(
            Pipeline::new(Arc::new(chat), Arc::new(speech)),
            settings.frontend_dir.clone(),
        ))
    }
}

/// Where and how the HTTP surface is served.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address of the web application (`API_ADDRESS`).
    pub api_address: String,
    /// `FRONTEND_DIR`
    pub frontend_dir: PathBuf,
    /// Set when running as an Azure Functions custom handler
    /// (`FUNCTIONS_CUSTOMHANDLER_PORT`).
    pub function_port: Option<u16>,
    /// Route prefix the Functions host puts in front of HTTP trigger routes
    /// (`FUNCTIONS_ROUTE_PREFIX`).
    pub function_route_prefix: String,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let function_port = non_blank("FUNCTIONS_CUSTOMHANDLER_PORT").and_then(|p| {
            p.trim()
                .parse::<u16>()
                .inspect_err(|_| warn!(value = %p, "FUNCTIONS_CUSTOMHANDLER_PORT is not a port number, ignoring"))
                .ok()
        });

        Self {
            api_address: non_blank("API_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".into()),
            frontend_dir: non_blank("FRONTEND_DIR")
                .unwrap_or_else(|| "frontend".into())
                .into(),
            function_port,
            function_route_prefix: lookup("FUNCTIONS_ROUTE_PREFIX").unwrap_or_else(|| "api".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = ServerSettings::from_lookup(|_| None);
        assert_eq!(s.api_address, "0.0.0.0:8000");
        assert_eq!(s.frontend_dir, PathBuf::from("frontend"));
        assert_eq!(s.function_port, None);
        assert_eq!(s.function_route_prefix, "api");
    }

    #[test]
    fn function_mode_and_prefix() {
        let s = ServerSettings::from_lookup(|k| match k {
            "FUNCTIONS_CUSTOMHANDLER_PORT" => Some("40123".into()),
            "FUNCTIONS_ROUTE_PREFIX" => Some(String::new()),
            _ => None,
        });
        assert_eq!(s.function_port, Some(40123));
        assert_eq!(s.function_route_prefix, "");
    }

    #[test]
    fn bad_port_is_ignored() {
        let s = ServerSettings::from_lookup(|k| {
            (k == "FUNCTIONS_CUSTOMHANDLER_PORT").then(|| "http".to_string())
        });
        assert_eq!(s.function_port, None);
    }
}
