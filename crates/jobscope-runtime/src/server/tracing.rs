use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is reused.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Per-request tracing state, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestTrace {
    pub request_id: String,
    pub start_time: Instant,
}

impl RequestTrace {
    pub fn new() -> Self {
        Self::with_request_id(Uuid::new_v4().to_string())
    }

    /// Continue a request id supplied by the caller.
    pub fn with_request_id(request_id: String) -> Self {
        Self {
            request_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for RequestTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// Run each request inside a span carrying its request id, and echo the id
/// in the response.
pub async fn tracing_middleware(mut req: Request, next: Next) -> Response {
    let trace = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(|id| RequestTrace::with_request_id(id.to_string()))
        .unwrap_or_default();

    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %trace.request_id,
    );
    req.extensions_mut().insert(trace.clone());

    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = trace.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    if let Ok(val) = HeaderValue::from_str(&trace.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    response
}
