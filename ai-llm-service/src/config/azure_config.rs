use std::fmt;

/// REST api-version used when `AZURE_OPENAI_API_VERSION` is not set.
pub const DEFAULT_API_VERSION: &str = "2025-03-01-preview";

/// Speech model used when `TTS_MODEL_NAME` is not set.
pub const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";

/// Fixed voice identity for synthesized answers.
pub const DEFAULT_VOICE: &str = "coral";

/// Fixed delivery-style instruction for synthesized answers.
pub const DEFAULT_VOICE_INSTRUCTIONS: &str = "Speak in a cheerful and positive tone.";

/// Connection parameters of the Azure OpenAI resource.
///
/// Shared by the chat-completion and speech clients; both talk to the same
/// resource through per-deployment URLs.
#[derive(Clone, Default)]
pub struct AzureServiceConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Resource key, sent as the `api-key` header.
    pub api_key: String,
    /// REST api-version query parameter.
    pub api_version: String,
}

impl AzureServiceConfig {
    /// Builds the URL of a deployment-scoped operation.
    ///
    /// ```
    /// use ai_llm_service::config::azure_config::AzureServiceConfig;
    ///
    /// let cfg = AzureServiceConfig {
    ///     endpoint: "https://res.openai.azure.com/".into(),
    ///     api_key: "k".into(),
    ///     api_version: "2025-03-01-preview".into(),
    /// };
    /// assert_eq!(
    ///     cfg.deployment_url("gpt-4o-mini", "chat/completions"),
    ///     "https://res.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2025-03-01-preview"
    /// );
    /// ```
    pub fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint.trim().trim_end_matches('/'),
            deployment,
            operation,
            self.api_version
        )
    }
}

impl fmt::Debug for AzureServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Retrieval directive parameters: which search index the completion service
/// grounds its answer on, and which embedding deployment vectorizes the query.
#[derive(Clone, Default)]
pub struct RetrievalConfig {
    pub search_endpoint: String,
    pub search_api_key: String,
    pub index_name: String,
    pub embedding_deployment: String,
}

impl fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("search_endpoint", &self.search_endpoint)
            .field("search_api_key", &"[REDACTED]")
            .field("index_name", &self.index_name)
            .field("embedding_deployment", &self.embedding_deployment)
            .finish()
    }
}

/// Speech synthesis settings. Only `model` comes from the environment; voice
/// and style are fixed.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub model: String,
    pub voice: String,
    pub instructions: String,
    /// Audio container requested from the service (`mp3` is what the
    /// frontend plays through a `data:audio/mpeg` URL).
    pub response_format: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            instructions: DEFAULT_VOICE_INSTRUCTIONS.to_string(),
            response_format: "mp3".to_string(),
        }
    }
}

/// Everything the two Azure clients need, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub service: AzureServiceConfig,
    /// Chat deployment identifier (`LLM_MODEL_NAME`).
    pub chat_deployment: String,
    pub retrieval: RetrievalConfig,
    pub speech: SpeechConfig,
}
