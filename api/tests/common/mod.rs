#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{AiLlmError, HttpError, StatusCode};
use api::core::app_state::AppState;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use rag_pipeline::{CompletionClient, Pipeline, SpeechSynthesizer};
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><title>PSI 20 Chatbot</title>";
/// PNG signature followed by bytes that are not valid UTF-8.
pub const LOGO_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe];

/// Completion double: fixed answer or an upstream 401.
pub struct StubCompletion {
    pub answer: Option<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, _system: &str, _query: &str) -> Result<String, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(a) => Ok(a.clone()),
            None => Err(AiLlmError::HttpStatus(HttpError {
                operation: "chat/completions",
                status: StatusCode::UNAUTHORIZED,
                url: "https://res.openai.azure.com/openai/deployments/x/chat/completions".into(),
                snippet: "invalid subscription key".into(),
            })),
        }
    }
}

/// Synthesizer double: fixed bytes or a decode failure.
pub struct StubSpeech {
    pub audio: Option<Vec<u8>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.audio
            .clone()
            .ok_or_else(|| AiLlmError::Decode("no audio".into()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub completion: Arc<StubCompletion>,
    pub speech: Arc<StubSpeech>,
    // Keeps the frontend directory alive for the duration of the test.
    _frontend: TempDir,
}

impl TestApp {
    pub fn new(answer: Option<&str>, audio: Option<&[u8]>) -> Self {
        let frontend = tempfile::tempdir().unwrap();
        std::fs::write(frontend.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(frontend.path().join("app.js"), "console.log('psi20');").unwrap();
        std::fs::write(frontend.path().join("logo.png"), LOGO_PNG).unwrap();

        let completion = Arc::new(StubCompletion {
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
        });
        let speech = Arc::new(StubSpeech {
            audio: audio.map(<[u8]>::to_vec),
            calls: AtomicUsize::new(0),
        });

        let pipeline = Pipeline::new(completion.clone(), speech.clone());
        let router = api::app(AppState::new(pipeline, frontend.path()));

        Self {
            router,
            completion,
            speech,
            _frontend: frontend,
        }
    }

    pub fn upstream_calls(&self) -> (usize, usize) {
        (
            self.completion.calls.load(Ordering::SeqCst),
            self.speech.calls.load(Ordering::SeqCst),
        )
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }
}

pub fn post_chat(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn request(method: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(res).await).unwrap()
}
