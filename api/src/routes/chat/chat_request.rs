use serde::Deserialize;

/// Request payload for `/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Natural language question.
    #[serde(default)]
    pub query: Option<String>,
}

impl ChatRequest {
    /// Lenient parse: a body that is not JSON, not an object, or carries a
    /// non-string `query` counts as a request without a question.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}
