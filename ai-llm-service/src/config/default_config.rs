//! Service configuration loaded from environment variables.
//!
//! Loading is deliberately permissive: every value is taken as-is and a
//! missing value becomes an empty string. Nothing here fails; a bad endpoint
//! or key shows up as an upstream error on the first request that needs it.
//!
//! # Environment variables
//!
//! Azure OpenAI resource:
//! - `AZURE_OPENAI_ENDPOINT`    = resource endpoint
//! - `AZURE_OPENAI_API_KEY`     = resource key
//! - `AZURE_OPENAI_API_VERSION` = optional, defaults to [`DEFAULT_API_VERSION`]
//!
//! Deployments:
//! - `LLM_MODEL_NAME`       = chat deployment
//! - `EMBEDDING_MODEL_NAME` = embedding deployment used by the retrieval directive
//! - `TTS_MODEL_NAME`       = optional, defaults to [`DEFAULT_TTS_MODEL`]
//!
//! Azure AI Search:
//! - `AZURE_SEARCH_ENDPOINT`, `AZURE_SEARCH_API_KEY`, `AZURE_SEARCH_INDEX`

use crate::config::azure_config::{
    AzureServiceConfig, DEFAULT_API_VERSION, DEFAULT_TTS_MODEL, RetrievalConfig, ServiceConfig,
    SpeechConfig,
};

/// Variables without a default. Reported by [`missing_vars`] when unset.
pub const REQUIRED_VARS: [&str; 7] = [
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_KEY",
    "LLM_MODEL_NAME",
    "EMBEDDING_MODEL_NAME",
    "AZURE_SEARCH_ENDPOINT",
    "AZURE_SEARCH_API_KEY",
    "AZURE_SEARCH_INDEX",
];

impl ServiceConfig {
    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    ///
    /// # Example
    /// ```
    /// use ai_llm_service::config::azure_config::ServiceConfig;
    ///
    /// let cfg = ServiceConfig::from_lookup(|name| match name {
    ///     "AZURE_SEARCH_INDEX" => Some("psi20-reports".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(cfg.retrieval.index_name, "psi20-reports");
    /// assert_eq!(cfg.speech.model, "gpt-4o-mini-tts");
    /// assert!(cfg.chat_deployment.is_empty());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).unwrap_or_default();
        let value_or = |name: &str, dflt: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| dflt.to_string())
        };

        Self {
            service: AzureServiceConfig {
                endpoint: value("AZURE_OPENAI_ENDPOINT"),
                api_key: value("AZURE_OPENAI_API_KEY"),
                api_version: value_or("AZURE_OPENAI_API_VERSION", DEFAULT_API_VERSION),
            },
            chat_deployment: value("LLM_MODEL_NAME"),
            retrieval: RetrievalConfig {
                search_endpoint: value("AZURE_SEARCH_ENDPOINT"),
                search_api_key: value("AZURE_SEARCH_API_KEY"),
                index_name: value("AZURE_SEARCH_INDEX"),
                embedding_deployment: value("EMBEDDING_MODEL_NAME"),
            },
            speech: SpeechConfig {
                model: value_or("TTS_MODEL_NAME", DEFAULT_TTS_MODEL),
                ..SpeechConfig::default()
            },
        }
    }
}

/// Names of [`REQUIRED_VARS`] that are unset or blank in the process environment.
pub fn missing_vars() -> Vec<&'static str> {
    missing_vars_with(|name| std::env::var(name).ok())
}

fn missing_vars_with<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_VARS
        .into_iter()
        .filter(|name| lookup(name).is_none_or(|v| v.trim().is_empty()))
        .collect()
}
