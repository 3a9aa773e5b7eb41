//! Access log middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Log one line per request once the response is ready.
///
/// Only the path is logged, never the query string, so credentials passed
/// there by mistake do not end up in the log.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        path = path.as_str(),
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "Request handled"
    );

    response
}
