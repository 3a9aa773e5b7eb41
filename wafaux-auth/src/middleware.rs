//! axum middleware guarding protected routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use wafaux_common::ApiError;

use crate::BearerAuth;

/// Reject the request with a bare 401 unless it carries the configured token
///
/// The failure reason is only logged. The wrapped handler never runs for a
/// rejected request.
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use wafaux_auth::{AuthConfig, BearerAuth, require_bearer};
///
/// # fn build() -> Result<Router, wafaux_auth::AuthError> {
/// let auth = BearerAuth::from_config(&AuthConfig {
///     token: Some("secret".to_string()),
///     allow_unauthenticated: false,
/// })?;
/// let router: Router = Router::new()
///     .route("/protected", get(|| async { "ok" }))
///     .route_layer(middleware::from_fn_with_state(auth, require_bearer));
/// # Ok(router)
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when verification fails.
pub async fn require_bearer(
    State(auth): State<BearerAuth>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(reason) = auth.verify(request.headers().get(AUTHORIZATION)) {
        tracing::warn!(
            %reason,
            path = request.uri().path(),
            "Rejected request to protected endpoint"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
