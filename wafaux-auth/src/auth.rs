//! Token validation
//!
//! The configured secret is hashed with SHA-256 once at startup and only the
//! digest is kept. Incoming credentials are hashed the same way and the two
//! fixed-length digests are compared without early exit, so the time taken
//! depends neither on the supplied length nor on how many leading bytes match.

use std::fmt;

use axum::http::HeaderValue;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

const BEARER: &str = "Bearer";

/// Authentication settings, read once at process start
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret clients must present. Empty counts as unset.
    #[serde(default)]
    pub token: Option<String>,

    /// Start without a token and accept every request
    ///
    /// Only consulted when no token is configured.
    #[serde(default)]
    pub allow_unauthenticated: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("allow_unauthenticated", &self.allow_unauthenticated)
            .finish()
    }
}

/// Reasons authentication can fail
///
/// Only [`AuthError::MissingToken`] is surfaced to an operator. The others
/// are logged server-side and collapsed into a generic 401 for the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("No API token configured and unauthenticated access is not allowed")]
    MissingToken,

    #[error("Authorization header missing")]
    MissingHeader,

    #[error("Authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("Bearer token does not match")]
    InvalidToken,
}

type TokenDigest = [u8; 32];

#[derive(Clone, Copy)]
enum Mode {
    Token(TokenDigest),
    Insecure,
}

/// Validates bearer credentials against the configured secret
#[derive(Clone, Copy)]
pub struct BearerAuth {
    mode: Mode,
}

impl BearerAuth {
    /// Build the validator, failing closed when no secret is configured
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] if no (non-empty) token is
    /// configured and `allow_unauthenticated` is not set.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        match config.token.as_deref().filter(|token| !token.is_empty()) {
            Some(token) => {
                let auth = Self {
                    mode: Mode::Token(digest(token.as_bytes())),
                };
                tracing::info!(
                    fingerprint = %auth.fingerprint().unwrap_or_default(),
                    "Bearer token authentication enabled"
                );
                Ok(auth)
            }
            None if config.allow_unauthenticated => {
                tracing::warn!("==============================================================");
                tracing::warn!("NO API TOKEN CONFIGURED: AUTHENTICATION IS DISABLED");
                tracing::warn!("Every request to a protected endpoint will be accepted.");
                tracing::warn!("Never run this configuration outside local development.");
                tracing::warn!("==============================================================");
                Ok(Self {
                    mode: Mode::Insecure,
                })
            }
            None => Err(AuthError::MissingToken),
        }
    }

    /// Whether credentials are checked at all
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(self.mode, Mode::Token(_))
    }

    /// Short hex prefix of the secret's digest
    ///
    /// Lets an operator confirm which token a process was started with
    /// without the token itself ever reaching the log.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        match &self.mode {
            Mode::Token(expected) => Some(hex::encode(&expected[..4])),
            Mode::Insecure => None,
        }
    }

    /// Validate a plaintext token
    #[must_use]
    pub fn validate_token(&self, token: &str) -> bool {
        match &self.mode {
            Mode::Token(expected) => constant_time_eq(expected, &digest(token.as_bytes())),
            Mode::Insecure => true,
        }
    }

    /// Validate the value of an `Authorization` header
    ///
    /// # Errors
    ///
    /// Fails if the header is absent, is not `Bearer <token>`, carries an
    /// empty token, or the token does not match. Never fails in insecure mode.
    pub fn verify(&self, header: Option<&HeaderValue>) -> Result<(), AuthError> {
        if !self.requires_auth() {
            return Ok(());
        }

        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = bearer_credential(header)?;

        if self.validate_token(token) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("requires_auth", &self.requires_auth())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Pull the credential out of `Bearer <token>`
fn bearer_credential(header: &HeaderValue) -> Result<&str, AuthError> {
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let (scheme, credential) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case(BEARER) {
        return Err(AuthError::MalformedHeader);
    }

    let credential = credential.trim();
    if credential.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(credential)
}

fn digest(bytes: &[u8]) -> TokenDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(bytes));
    out
}

/// Compare two digests in time independent of their contents
fn constant_time_eq(expected: &TokenDigest, presented: &TokenDigest) -> bool {
    let diff = expected
        .iter()
        .zip(presented.iter())
        .fold(0u8, |acc, (left, right)| acc | (left ^ right));

    std::hint::black_box(diff) == 0
}
