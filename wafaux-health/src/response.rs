//! Mapping probe outcomes onto HTTP responses
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | healthy | 200 | the check's own report |
//! | unhealthy, JSON report | 503 | the check's own report |
//! | unhealthy, other output | 503 | generic "script failed" |
//! | timed out | 503 | generic "timeout" |
//! | failed to run | 500 | generic "internal server error" |
//!
//! Raw process output and error detail never end up in a body.

use axum::{
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::probe::{ProbeOutcome, UnhealthyReport};

impl ProbeOutcome {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Healthy(_) => StatusCode::OK,
            Self::Unhealthy(_) | Self::TimedOut(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProbeOutcome {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Healthy(report) | Self::Unhealthy(UnhealthyReport::Json(report)) => report,
            Self::Unhealthy(UnhealthyReport::Raw { .. }) => script_failed(),
            Self::TimedOut(_) => timed_out(),
            Self::Failed(_) => internal_error(),
        };

        pretty_json(status, &body)
    }
}

fn script_failed() -> Value {
    json!({ "status": "unhealthy", "message": "Health check script failed" })
}

fn timed_out() -> Value {
    json!({ "status": "unhealthy", "message": "Health check timeout" })
}

fn internal_error() -> Value {
    json!({ "status": "error", "message": "Internal server error" })
}

fn pretty_json(status: StatusCode, body: &Value) -> Response {
    match serde_json::to_vec_pretty(body) {
        Ok(bytes) => (
            status,
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialise health report");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(internal_error()),
            )
                .into_response()
        }
    }
}
