//! Seams between the pipeline and the hosted services.
//!
//! The Azure clients implement these traits directly; tests plug in doubles.

use ai_llm_service::{AiLlmError, AzureChatService, AzureSpeechService};
use async_trait::async_trait;

/// Produces an answer grounded in the document index.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the raw answer, possibly empty, possibly with citation markers.
    async fn complete(&self, system: &str, query: &str) -> Result<String, AiLlmError>;
}

/// Turns answer text into audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AiLlmError>;
}

#[async_trait]
impl CompletionClient for AzureChatService {
    async fn complete(&self, system: &str, query: &str) -> Result<String, AiLlmError> {
        AzureChatService::complete(self, system, query).await
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechService {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AiLlmError> {
        AzureSpeechService::synthesize(self, text).await
    }
}
