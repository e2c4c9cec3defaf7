//! Typed error for the answer pipeline.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Failure of one pipeline stage. There is no partial result: a synthesis
/// failure after a successful completion fails the whole request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The grounded chat completion failed.
    #[error("completion failed: {0}")]
    Completion(#[source] AiLlmError),

    /// Speech synthesis of the cleaned answer failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] AiLlmError),
}

impl PipelineError {
    /// Short description for clients.
    ///
    /// Names the failed stage and, when known, the upstream HTTP status, but
    /// leaves out URLs and upstream response bodies (those go to the logs).
    pub fn client_message(&self) -> String {
        let (stage, source) = match self {
            PipelineError::Completion(e) => ("completion service", e),
            PipelineError::Synthesis(e) => ("speech service", e),
        };
        match source {
            AiLlmError::HttpStatus(h) => format!("{stage} returned HTTP {}", h.status),
            AiLlmError::HttpTransport(e) if e.is_connect() => {
                format!("{stage} is unreachable")
            }
            AiLlmError::HttpTransport(_) => format!("{stage} request failed"),
            AiLlmError::Decode(_) => format!("{stage} sent an unreadable response"),
            _ => format!("{stage} request failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::{HttpError, StatusCode};

    use super::*;

    #[test]
    fn client_message_hides_upstream_body() {
        let err = PipelineError::Completion(AiLlmError::HttpStatus(HttpError {
            operation: "chat/completions",
            status: StatusCode::UNAUTHORIZED,
            url: "https://res.openai.azure.com/openai/deployments/x/chat/completions".into(),
            snippet: "Access denied due to invalid subscription key".into(),
        }));
        let msg = err.client_message();
        assert_eq!(msg, "completion service returned HTTP 401 Unauthorized");
        assert!(!msg.contains("subscription key"));
        assert!(!msg.contains("azure.com"));
    }

    #[test]
    fn synthesis_stage_is_named() {
        let err = PipelineError::Synthesis(AiLlmError::Decode("bad".into()));
        assert_eq!(err.client_message(), "speech service sent an unreadable response");
    }
}
