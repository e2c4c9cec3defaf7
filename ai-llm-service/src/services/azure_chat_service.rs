//! Azure OpenAI chat completion grounded on Azure AI Search.
//!
//! One synchronous (non-streaming) request per question:
//! - POST {endpoint}/openai/deployments/{chat_deployment}/chat/completions?api-version=...
//!
//! The request carries an `azure_search` data source, so retrieval runs inside
//! the hosted service: the query is vectorized with the configured embedding
//! deployment and matched against the configured index. This client never
//! calls the search service itself.

use std::time::Instant;

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::azure_config::{RetrievalConfig, ServiceConfig},
    error_handler::{AiLlmError, HttpError, Result, make_snippet},
};

const OPERATION: &str = "chat/completions";

/// Thin client for grounded Azure OpenAI chat completions.
///
/// Holds a preconfigured `reqwest::Client`, the `api-key` header value and the
/// retrieval directive parameters. Cheap to share behind an `Arc`; the inner
/// client is safe for concurrent use.
#[derive(Debug)]
pub struct AzureChatService {
    client: reqwest::Client,
    api_key: ApiKey,
    url_chat: String,
    deployment: String,
    retrieval: RetrievalConfig,
}

impl AzureChatService {
    /// Creates a new [`AzureChatService`] from the resolved configuration.
    ///
    /// No request timeout is configured; call duration is bounded by the
    /// hosted service. An API key that cannot be sent as a header does not
    /// fail here; each [`complete`](Self::complete) call reports it.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: &ServiceConfig) -> Result<Self> {
        let client = build_client()?;
        let url_chat = cfg
            .service
            .deployment_url(&cfg.chat_deployment, OPERATION);

        info!(
            deployment = %cfg.chat_deployment,
            endpoint = %cfg.service.endpoint,
            index = %cfg.retrieval.index_name,
            "AzureChatService initialized"
        );

        Ok(Self {
            client,
            api_key: ApiKey::new(&cfg.service.api_key),
            url_chat,
            deployment: cfg.chat_deployment.clone(),
            retrieval: cfg.retrieval.clone(),
        })
    }

    /// Asks the chat deployment to answer `user` under the `system`
    /// instruction, grounded on the configured search index.
    ///
    /// Returns the first choice's message content, or an empty string when the
    /// service returned no choices or a choice without content.
    ///
    /// # Errors
    /// - [`AiLlmError::InvalidHeader`] if the API key is not a valid header value
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let started = Instant::now();
        let api_key = self.api_key.header()?;
        let body = ChatCompletionRequest::grounded(system, user, &self.retrieval);

        debug!(
            deployment = %self.deployment,
            query_len = user.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                url = %self.url_chat,
                %snippet,
                deployment = %self.deployment,
                latency_ms = started.elapsed().as_millis(),
                "Azure OpenAI chat/completions returned non-success status"
            );

            return Err(AiLlmError::HttpStatus(HttpError {
                operation: OPERATION,
                status,
                url: self.url_chat.clone(),
                snippet,
            }));
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                deployment = %self.deployment,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode chat/completions response"
            );
            AiLlmError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = out.first_content();

        info!(
            deployment = %self.deployment,
            answer_len = content.len(),
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

pub(crate) const API_KEY_HEADER: &str = "api-key";

/// Resource key as a sensitive header value. A key that is not a valid header
/// value is kept as its error and returned by every [`ApiKey::header`] call.
#[derive(Debug, Clone)]
pub(crate) struct ApiKey(std::result::Result<header::HeaderValue, String>);

impl ApiKey {
    pub(crate) fn new(api_key: &str) -> Self {
        let value = header::HeaderValue::from_str(api_key)
            .map(|mut v| {
                v.set_sensitive(true);
                v
            })
            .map_err(|e| format!("{API_KEY_HEADER}: {e}"));
        Self(value)
    }

    pub(crate) fn header(&self) -> Result<header::HeaderValue> {
        self.0.clone().map_err(AiLlmError::InvalidHeader)
    }
}

/// Builds the shared HTTP client: JSON content type, no timeout.
pub(crate) fn build_client() -> Result<reqwest::Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `chat/completions` with an Azure AI Search data source.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub data_sources: Vec<DataSource<'a>>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// System + user exchange with a single vector-mode `azure_search` source.
    pub fn grounded(system: &'a str, user: &'a str, retrieval: &'a RetrievalConfig) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            data_sources: vec![DataSource {
                kind: "azure_search",
                parameters: SearchParameters {
                    endpoint: &retrieval.search_endpoint,
                    index_name: &retrieval.index_name,
                    authentication: SearchAuthentication {
                        kind: "api_key",
                        key: &retrieval.search_api_key,
                    },
                    query_type: "vector",
                    embedding_dependency: EmbeddingDependency {
                        kind: "deployment_name",
                        deployment_name: &retrieval.embedding_deployment,
                    },
                },
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    /// "system" | "user"
    pub role: &'a str,
    pub content: &'a str,
}

/// Retrieval directive attached to the completion request.
#[derive(Debug, Serialize)]
pub struct DataSource<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub parameters: SearchParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct SearchParameters<'a> {
    pub endpoint: &'a str,
    pub index_name: &'a str,
    pub authentication: SearchAuthentication<'a>,
    pub query_type: &'a str,
    pub embedding_dependency: EmbeddingDependency<'a>,
}

#[derive(Debug, Serialize)]
pub struct SearchAuthentication<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingDependency<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub deployment_name: &'a str,
}

/// Minimal response for `chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessageOut>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn retrieval() -> RetrievalConfig {
        RetrievalConfig {
            search_endpoint: "https://s.search.windows.net".into(),
            search_api_key: "search-key".into(),
            index_name: "psi20".into(),
            embedding_deployment: "text-embedding-3-small".into(),
        }
    }

    #[test]
    fn grounded_request_shape() {
        let r = retrieval();
        let body = ChatCompletionRequest::grounded("sys", "What was EDP's EBITDA?", &r);
        let v = serde_json::to_value(&body).unwrap();

        assert_eq!(
            v,
            json!({
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "What was EDP's EBITDA?" }
                ],
                "data_sources": [{
                    "type": "azure_search",
                    "parameters": {
                        "endpoint": "https://s.search.windows.net",
                        "index_name": "psi20",
                        "authentication": { "type": "api_key", "key": "search-key" },
                        "query_type": "vector",
                        "embedding_dependency": {
                            "type": "deployment_name",
                            "deployment_name": "text-embedding-3-small"
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn first_choice_content_or_empty() {
        let parse = |v: serde_json::Value| {
            serde_json::from_value::<ChatCompletionResponse>(v)
                .unwrap()
                .first_content()
        };

        assert_eq!(
            parse(json!({ "choices": [
                { "message": { "content": "first" } },
                { "message": { "content": "second" } }
            ]})),
            "first"
        );
        assert_eq!(parse(json!({ "choices": [{ "message": { "content": null } }] })), "");
        assert_eq!(parse(json!({ "choices": [{ "finish_reason": "stop" }] })), "");
        assert_eq!(parse(json!({ "choices": [] })), "");
        assert_eq!(parse(json!({})), "");
    }

    #[test]
    fn api_key_with_newline_fails_only_when_used() {
        let key = ApiKey::new("bad\nkey");
        assert!(matches!(key.header(), Err(AiLlmError::InvalidHeader(_))));
        assert!(!format!("{key:?}").contains("bad"));

        let good = ApiKey::new("openai-key").header().unwrap();
        assert!(good.is_sensitive());
    }
}
