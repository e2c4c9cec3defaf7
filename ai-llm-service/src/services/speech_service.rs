//! Azure OpenAI text-to-speech with a streamed response body.
//!
//! - POST {endpoint}/openai/deployments/{tts_model}/audio/speech?api-version=...
//!
//! The audio arrives as a chunked transfer; chunks are appended in arrival
//! order into one buffer.

use std::time::Instant;

use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    config::azure_config::{ServiceConfig, SpeechConfig},
    error_handler::{AiLlmError, HttpError, Result, make_snippet},
    services::azure_chat_service::{API_KEY_HEADER, ApiKey, build_client},
};

const OPERATION: &str = "audio/speech";

/// Client for the speech deployment with a fixed voice and delivery style.
#[derive(Debug)]
pub struct AzureSpeechService {
    client: reqwest::Client,
    api_key: ApiKey,
    url_speech: String,
    speech: SpeechConfig,
}

impl AzureSpeechService {
    /// Creates a new [`AzureSpeechService`] from the resolved configuration.
    ///
    /// An unusable API key is reported by [`synthesize`](Self::synthesize),
    /// not here.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: &ServiceConfig) -> Result<Self> {
        let client = build_client()?;
        let url_speech = cfg.service.deployment_url(&cfg.speech.model, OPERATION);

        info!(
            model = %cfg.speech.model,
            voice = %cfg.speech.voice,
            endpoint = %cfg.service.endpoint,
            "AzureSpeechService initialized"
        );

        Ok(Self {
            client,
            api_key: ApiKey::new(&cfg.service.api_key),
            url_speech,
            speech: cfg.speech.clone(),
        })
    }

    /// Synthesizes `text` and returns the raw audio bytes.
    ///
    /// Empty text is submitted unchanged; whatever the service sends back
    /// (possibly nothing) is returned.
    ///
    /// # Errors
    /// - [`AiLlmError::InvalidHeader`] if the API key is not a valid header value
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for network failures, including a
    ///   stream that breaks mid-body
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let started = Instant::now();
        let api_key = self.api_key.header()?;
        let body = SpeechRequest {
            model: &self.speech.model,
            input: text,
            voice: &self.speech.voice,
            instructions: &self.speech.instructions,
            response_format: &self.speech.response_format,
        };

        debug!(
            model = %self.speech.model,
            input_len = text.len(),
            "POST {}", self.url_speech
        );

        let resp = self
            .client
            .post(&self.url_speech)
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
                url = %self.url_speech,
                %snippet,
                model = %self.speech.model,
                latency_ms = started.elapsed().as_millis(),
                "Azure OpenAI audio/speech returned non-success status"
            );

            return Err(AiLlmError::HttpStatus(HttpError {
                operation: OPERATION,
                status,
                url: self.url_speech.clone(),
                snippet,
            }));
        }

        let mut audio = Vec::new();
        let mut chunks = 0usize;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                error!(
                    error = %e,
                    received = audio.len(),
                    "audio/speech stream broke"
                );
                AiLlmError::HttpTransport(e)
            })?;
            audio.extend_from_slice(&chunk);
            chunks += 1;
        }

        info!(
            model = %self.speech.model,
            bytes = audio.len(),
            chunks,
            latency_ms = started.elapsed().as_millis(),
            "speech synthesis completed"
        );

        Ok(audio)
    }
}

/// Request body for `audio/speech`.
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    instructions: &'a str,
    response_format: &'a str,
}
