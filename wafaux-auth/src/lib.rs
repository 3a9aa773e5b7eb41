//! Bearer token authentication for the wafaux servers
//!
//! Every protected route expects `Authorization: Bearer <token>` where the
//! token equals a single shared secret loaded from the environment at
//! startup.
//!
//! # Startup policy
//!
//! | token configured | `allow_unauthenticated` | result |
//! |---|---|---|
//! | yes | any | requests must present the token |
//! | no | `false` | [`AuthError::MissingToken`], the process must not start |
//! | no | `true` | insecure mode, every request is accepted |
//!
//! ```
//! use wafaux_auth::{AuthConfig, AuthError, BearerAuth};
//!
//! let missing = BearerAuth::from_config(&AuthConfig::default());
//! assert_eq!(missing.unwrap_err(), AuthError::MissingToken);
//! ```

mod auth;
mod middleware;

pub use auth::{AuthConfig, AuthError, BearerAuth};
pub use middleware::require_bearer;
