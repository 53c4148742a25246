//! Request logging middleware.

use crate::controllers::user_controller::X_CACHE;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per request once the response is ready.
///
/// Server errors are logged at `warn`. The `cache` field carries the
/// `X-Cache` header when a handler sets it.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();
    let cache = response
        .headers()
        .get(X_CACHE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    if status.is_server_error() {
        warn!(
            target: "http",
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "HTTP request failed"
        );
    } else {
        info!(
            target: "http",
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            cache = cache,
            duration_ms = %duration_ms,
            "HTTP request completed"
        );
    }

    response
}
