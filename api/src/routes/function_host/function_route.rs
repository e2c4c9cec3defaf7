//! POST /{function}: Azure Functions custom-handler entry point.
//!
//! Each invocation is translated into a plain HTTP request and dispatched
//! through the web application router, so routing, CORS and payloads are
//! exactly those of the web deployment.

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, State},
    http::{
        HeaderName, HeaderValue, Method, Request, StatusCode, Uri,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::Response,
    routing::post,
};
use tower::ServiceExt;
use tracing::{debug, info, warn};

use crate::{
    error_handler::{AppError, AppResult},
    middleware_layer::cors::ALLOW_ORIGIN,
    routes::function_host::invocation::{
        InvocationRequest, InvocationResponse, OutputResponse, TriggerRequest,
    },
};

/// State of the custom-handler server: the web app it forwards to.
#[derive(Clone)]
pub struct FunctionHost {
    web: Router,
    route_prefix: String,
}

/// Router served on `FUNCTIONS_CUSTOMHANDLER_PORT`.
pub fn router(web: Router, route_prefix: impl Into<String>) -> Router {
    Router::new()
        .route("/{function}", post(invoke))
        .with_state(FunctionHost {
            web,
            route_prefix: route_prefix.into(),
        })
}

/// Handler: POST /{function}
pub async fn invoke(
    State(host): State<FunctionHost>,
    Path(function): Path<String>,
    body: Bytes,
) -> AppResult<Json<InvocationResponse>> {
    let invocation: InvocationRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Invocation(format!("payload is not an invocation: {e}")))?;
    let trigger = invocation.trigger().map_err(AppError::Invocation)?;

    let request = to_http_request(&trigger, &host.route_prefix)?;
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    debug!(%function, %method, %path, "dispatching invocation");

    let response = host
        .web
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    let output = to_output(response).await?;
    let line = format!("{method} {path} -> {}", output.status_code);
    info!(%function, "{line}");

    Ok(Json(InvocationResponse::http(output, vec![line])))
}

/// Rebuilds the trigger's request with the Functions route prefix removed
/// from its path.
fn to_http_request(trigger: &TriggerRequest, route_prefix: &str) -> AppResult<Request<Body>> {
    let uri: Uri = trigger
        .url
        .parse()
        .map_err(|e| AppError::Invocation(format!("bad Url `{}`: {e}", trigger.url)))?;
    let path = strip_route_prefix(uri.path(), route_prefix);
    let path_and_query = match uri.query() {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };

    let method = Method::from_bytes(trigger.method.to_ascii_uppercase().as_bytes())
        .map_err(|e| AppError::Invocation(format!("bad Method `{}`: {e}", trigger.method)))?;

    let mut request = Request::builder()
        .method(method)
        .uri(path_and_query)
        .body(Body::from(trigger.body_bytes()))
        .map_err(|e| AppError::Invocation(e.to_string()))?;

    let headers = request.headers_mut();
    for (name, values) in &trigger.headers {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            debug!(%name, "skipping invalid header name");
            continue;
        };
        // Body may have been re-serialized; its length is set by the body itself.
        if name == CONTENT_LENGTH {
            continue;
        }
        for value in values.values() {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.append(name.clone(), v);
                }
                Err(_) => debug!(%name, "skipping invalid header value"),
            }
        }
    }

    Ok(request)
}

/// `/api/chat` → `/chat`, `/api` → `/`; other paths unchanged.
fn strip_route_prefix<'a>(path: &'a str, route_prefix: &str) -> &'a str {
    let prefix = route_prefix.trim_matches('/');
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix('/').and_then(|p| p.strip_prefix(prefix)) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// The HTTP output binding carries the body as text. A response whose body
/// is not UTF-8 is replaced by a `500` error instead of being mangled.
async fn to_output(response: Response) -> AppResult<OutputResponse> {
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Server(std::io::Error::other(e)))?;

    let body = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(_) => {
            warn!(
                status = %parts.status,
                bytes = bytes.len(),
                content_type = ?parts.headers.get(CONTENT_TYPE),
                "response body is not UTF-8, cannot return it through the function host"
            );
            return Ok(binary_body_output());
        }
    };

    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in &parts.headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.as_str().to_string())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }

    Ok(OutputResponse {
        status_code: parts.status.as_u16(),
        headers,
        body,
    })
}

fn binary_body_output() -> OutputResponse {
    OutputResponse {
        status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        headers: HashMap::from([
            (CONTENT_TYPE.as_str().to_string(), "application/json".to_string()),
            (ACCESS_CONTROL_ALLOW_ORIGIN.as_str().to_string(), ALLOW_ORIGIN.to_string()),
        ]),
        body: serde_json::json!({
            "error": "binary response bodies are not supported by the function host"
        })
        .to_string(),
    }
}
