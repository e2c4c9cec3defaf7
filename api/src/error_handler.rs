use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rag_pipeline::PipelineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot ---
    #[error("failed to build service client: {0}")]
    Client(#[source] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Upstream failure inside the answer pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Functions host sent an invocation this adapter cannot translate.
    #[error("invalid invocation: {0}")]
    Invocation(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Invocation(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Client(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Pipeline(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}

/// `{"error": "..."}`
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Full chain (upstream status, URL, body snippet) stays in the logs.
        error!(%status, error = %self, source = ?std::error::Error::source(&self), "request failed");
        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
