//! Azure OpenAI clients shared by the PSI 20 chat backend.
//!
//! - [`AzureChatService`]: grounded chat completion; retrieval over Azure AI
//!   Search is delegated to the hosted service through a data-source directive.
//! - [`AzureSpeechService`]: text-to-speech with a streamed response body.
//! - [`ServiceConfig`]: connection parameters resolved from the environment.
//!
//! Construct each client once, wrap it in `Arc`, and share it across requests.

pub mod config {
    pub mod azure_config;
    pub mod default_config;
}
pub mod error_handler;
pub mod services {
    pub mod azure_chat_service;
    pub mod speech_service;
}
pub mod telemetry;

pub use config::azure_config::ServiceConfig;
pub use reqwest::StatusCode;
pub use error_handler::{AiLlmError, HttpError};
pub use services::{azure_chat_service::AzureChatService, speech_service::AzureSpeechService};
