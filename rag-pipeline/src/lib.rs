//! Answer pipeline for the PSI 20 chat backend.
//!
//! Public API: [`Pipeline::process_query`]. It validates the query, asks the
//! completion client for a grounded answer, strips citation markers, has the
//! answer spoken by the synthesizer, and returns text plus base64 audio.
//! The stages run strictly one after another.
//!
//! The pipeline knows nothing about HTTP; both transport adapters call it
//! with a plain `Option<&str>` and serialize the returned [`ChatResponse`].

pub mod audio;
mod clients;
mod error;
pub mod prompt;
pub mod sanitize;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use clients::{CompletionClient, SpeechSynthesizer};
pub use error::PipelineError;

/// Final `{response, audio}` payload of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Cleaned answer text.
    pub response: String,
    /// Base64 of the synthesized audio; empty when there is none.
    pub audio: String,
}

impl ChatResponse {
    /// Soft-fail answer for a request without a question.
    pub fn empty_query() -> Self {
        Self {
            response: prompt::EMPTY_QUERY_RESPONSE.to_string(),
            audio: String::new(),
        }
    }
}

/// Long-lived service handles, built once at startup and shared by all
/// requests.
#[derive(Clone)]
pub struct Pipeline {
    completion: Arc<dyn CompletionClient>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl Pipeline {
    pub fn new(completion: Arc<dyn CompletionClient>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { completion, speech }
    }

    /// Answers `query` with text and speech.
    ///
    /// A missing or empty query returns [`ChatResponse::empty_query`] without
    /// contacting any service.
    ///
    /// # Errors
    /// [`PipelineError::Completion`] or [`PipelineError::Synthesis`] from the
    /// stage that failed. Nothing is retried.
    pub async fn process_query(&self, query: Option<&str>) -> Result<ChatResponse, PipelineError> {
        let query = match query {
            Some(q) if !q.is_empty() => q,
            _ => {
                debug!("empty query, returning canned response");
                return Ok(ChatResponse::empty_query());
            }
        };

        let raw = self
            .completion
            .complete(prompt::SYSTEM_MESSAGE, query)
            .await
            .map_err(PipelineError::Completion)?;

        let response = sanitize::clean_response(&raw);
        debug!(raw_len = raw.len(), clean_len = response.len(), "answer cleaned");

        let bytes = self
            .speech
            .synthesize(&response)
            .await
            .map_err(PipelineError::Synthesis)?;

        info!(
            query_len = query.len(),
            answer_len = response.len(),
            audio_bytes = bytes.len(),
            "query answered"
        );

        Ok(ChatResponse {
            response,
            audio: audio::encode_audio(&bytes),
        })
    }
}
