//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library. Both Azure clients (chat completion and speech synthesis) return it,
//! so callers only ever match on one enum.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Underlying HTTP transport error (connect, TLS, body read, ...).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// A configured value could not be used as an HTTP header (e.g. an API key
    /// with control characters).
    #[error("[AI LLM Service] invalid header value: {0}")]
    InvalidHeader(String),
}

impl AiLlmError {
    /// HTTP status reported by the upstream service, if the failure was a
    /// non-2xx response.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            AiLlmError::HttpStatus(e) => Some(e.status),
            AiLlmError::HttpTransport(e) => e.status(),
            _ => None,
        }
    }
}

/// Details of a non-successful upstream response.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// Which Azure operation failed (`"chat/completions"`, `"audio/speech"`).
    pub operation: &'static str,
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL, without secrets (keys travel in headers only).
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HTTP {} from {} ({}): {}",
            self.status, self.operation, self.url, self.snippet
        )
    }
}

/// Upper bound for response body snippets kept in errors and logs.
const SNIPPET_MAX_CHARS: usize = 300;

/// Builds a compact, single-line snippet of an upstream response body.
///
/// Whitespace runs collapse to one space and the result is cut at
/// [`SNIPPET_MAX_CHARS`] characters (never inside a UTF-8 sequence).
pub fn make_snippet(body: &str) -> String {
    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= SNIPPET_MAX_CHARS {
        return compact;
    }
    let mut out: String = compact.chars().take(SNIPPET_MAX_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_whitespace() {
        let s = make_snippet("  {\n  \"error\":   \"nope\"\n}  ");
        assert_eq!(s, "{ \"error\": \"nope\" }");
    }

    #[test]
    fn snippet_is_truncated_on_char_boundary() {
        let body = "€".repeat(SNIPPET_MAX_CHARS + 10);
        let s = make_snippet(&body);
        assert_eq!(s.chars().count(), SNIPPET_MAX_CHARS + 1);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn status_error_message_names_operation() {
        let err = AiLlmError::HttpStatus(HttpError {
            operation: "audio/speech",
            status: StatusCode::UNAUTHORIZED,
            url: "https://example.openai.azure.com/openai/deployments/tts/audio/speech".into(),
            snippet: "denied".into(),
        });
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("audio/speech"));
        assert_eq!(err.upstream_status(), Some(StatusCode::UNAUTHORIZED));
    }
}
