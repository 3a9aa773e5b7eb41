//! Generic HTTP error responses.
//!
//! Bodies are deliberately minimal: no request path, no reason for an
//! authentication failure, no internal error text. Anything useful for
//! debugging is logged by the caller before the error is returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors that map onto a fixed status code and a generic JSON body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, malformed or wrong bearer credential
    #[error("Unauthorized")]
    Unauthorized,

    /// No route matched the request
    #[error("Not Found")]
    NotFound,

    /// The path exists but not for this method
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Anything else that went wrong while producing a response
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback handler for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
