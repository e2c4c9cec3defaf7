//! HTTP surface of the PSI 20 chat backend.
//!
//! Two deployment targets share one router built by [`app`]:
//! - web server: the router itself, bound to `API_ADDRESS`;
//! - Azure Functions custom handler: [`function_host::router`] on
//!   `FUNCTIONS_CUSTOMHANDLER_PORT`, which replays each invocation through
//!   the same router.

pub mod core {
    pub mod app_state;
}
pub mod error_handler;
pub mod middleware_layer {
    pub mod cors;
}
mod routes {
    pub mod chat {
        pub mod chat_request;
        pub mod chat_route;
    }
    pub mod frontend_route;
    pub mod function_host {
        pub mod function_route;
        pub mod invocation;
    }
}

pub mod function_host {
    pub use crate::routes::function_host::function_route::router;
    pub use crate::routes::function_host::invocation::{
        InvocationRequest, InvocationResponse, OutputResponse,
    };
}

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, get_service, post},
};
use tokio::signal;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    core::app_state::{AppState, ServerSettings},
    error_handler::AppError,
    routes::{
        chat::chat_route::chat,
        frontend_route::{favicon, not_found},
    },
};

/// Build the web application router.
pub fn app(state: AppState) -> Router {
    let index = ServeFile::new(state.frontend_dir.join("index.html"));
    let assets = ServeDir::new(&state.frontend_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.into_service());

    Router::new()
        .route("/", get_service(index))
        .route("/favicon.ico", get(favicon))
        .route("/chat", post(chat))
        .route("/api/chat", post(chat))
        .nest_service("/static", assets)
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn(middleware_layer::cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve settings and clients from the environment and serve until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let settings = ServerSettings::from_env();
    let state = AppState::from_env(&settings)?;
    let web = app(state);

    let (address, service, target) = match settings.function_port {
        Some(port) => (
            format!("0.0.0.0:{port}"),
            function_host::router(web, settings.function_route_prefix.clone()),
            "azure-functions custom handler",
        ),
        None => (settings.api_address.clone(), web, "web server"),
    };

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;

    info!(%address, target, frontend = %settings.frontend_dir.display(), "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed.
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
