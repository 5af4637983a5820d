//! Request/response logging middleware.
//!
//! Every exchange is traced. When the state carries a request log
//! repository, the exchange is also written to `request_logs` from a
//! detached task after the response is ready.

use std::borrow::Cow;
use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use lobby_entity::NewRequestLog;

use crate::state::AppState;

/// Largest request or response body copied into a log row.
const MAX_CAPTURED_BODY: usize = 64 * 1024;

/// Caller id the auth middleware leaves on the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedUser(pub Uuid);

/// Logs request method, path, status, and duration, and persists the
/// exchange when a request log repository is configured.
pub async fn request_logging(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let Some(repo) = state.request_logs.clone() else {
        let response = next.run(request).await;
        trace_exchange(&method, &path, &response, start);
        return response;
    };

    let request_time = Utc::now();
    let headers = render_headers(request.headers());
    let (parts, body) = request.into_parts();
    let (body, request_body) = if is_multipart(&parts.headers) {
        (body, String::new())
    } else {
        capture(body).await
    };

    let response = next.run(Request::from_parts(parts, body)).await;
    trace_exchange(&method, &path, &response, start);

    let user_id = response.extensions().get::<LoggedUser>().map(|u| u.0);
    let (parts, body) = response.into_parts();
    let (body, response_body) = capture(body).await;

    let entry = NewRequestLog {
        request_time,
        response_time: Utc::now(),
        user_id,
        method: method.to_string(),
        path,
        headers,
        body: request_body,
        response: response_body,
    };
    tokio::spawn(async move {
        if let Err(e) = repo.create(&entry).await {
            warn!(error = %e, path = %entry.path, "Failed to persist request log");
        }
    });

    Response::from_parts(parts, body)
}

fn trace_exchange(method: &Method, path: &str, response: &Response, start: Instant) {
    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "HTTP request"
    );
}

/// Buffers `body` when its exact length is known and small enough, returning
/// an equivalent body and its text. Anything else passes through uncaptured.
async fn capture(body: Body) -> (Body, String) {
    match body.size_hint().exact() {
        Some(len) if len <= MAX_CAPTURED_BODY as u64 => {
            match axum::body::to_bytes(body, MAX_CAPTURED_BODY).await {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    (Body::from(bytes), text)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to buffer body for the request log");
                    (Body::empty(), String::new())
                }
            }
        }
        _ => (body, String::new()),
    }
}

/// One `name: value` line per header. Credentials are masked.
fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value: Cow<'_, str> =
                if *name == header::AUTHORIZATION || *name == header::COOKIE {
                    Cow::Borrowed("****")
                } else {
                    String::from_utf8_lossy(value.as_bytes())
                };
            format!("{name}: {value}\r\n")
        })
        .collect()
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}
