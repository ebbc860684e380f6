// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Bodies above this size (large raw-CV payloads) are not logged.
const MAX_LOGGED_BODY_BYTES: usize = 64 * 1024;

fn is_json_content(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

/// Middleware to log JSON request and response bodies in debug mode.
/// Non-JSON bodies (PDF uploads) pass through without buffering.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let request = if is_json_content(request.headers()) {
        let (parts, body) = request.into_parts();

        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if !bytes.is_empty() && bytes.len() <= MAX_LOGGED_BODY_BYTES {
            if let Ok(body_str) = std::str::from_utf8(&bytes) {
                debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    request_body = %body_str,
                    "📥 Request"
                );
            }
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    if !is_json_content(response.headers()) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() && bytes.len() <= MAX_LOGGED_BODY_BYTES {
        if let Ok(body_str) = std::str::from_utf8(&bytes) {
            debug!(
                status = %parts.status,
                response_body = %body_str,
                "📤 Response"
            );
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
