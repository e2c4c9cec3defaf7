use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /favicon.ico
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any unknown path, or a known path with the wrong method.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
