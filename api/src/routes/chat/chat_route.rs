//! POST /chat: answers a question with text and speech.

use axum::{Json, body::Bytes, extract::State};
use rag_pipeline::ChatResponse;

use crate::{
    core::app_state::AppState, error_handler::AppResult, routes::chat::chat_request::ChatRequest,
};

/// Handler: POST /chat (also mounted at /api/chat)
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"query":"What was Jerónimo Martins revenue in 2023?"}'
/// ```
///
/// The body is read raw so that a malformed one falls through to the
/// empty-question answer instead of an extractor rejection.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> AppResult<Json<ChatResponse>> {
    let request = ChatRequest::from_body(&body);
    let answer = state
        .pipeline
        .process_query(request.query.as_deref())
        .await?;
    Ok(Json(answer))
}
