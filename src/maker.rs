/// Token Maker
///
/// The single contract shared by both token backends. Callers hold a
/// `Box<dyn Maker>` built once at startup and never see backend types.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::Deserialize;

use crate::error::{IssueError, KeyError, TokenError};
use crate::jwt_maker::JwtMaker;
use crate::paseto_maker::PasetoMaker;
use crate::payload::Payload;

/// Issues and verifies tokens under a fixed key.
///
/// Implementations hold read-only key material, so one instance may be
/// shared across threads without locking.
pub trait Maker: Send + Sync {
    /// Issue a token for `username` valid for `duration`.
    ///
    /// Returns the token string together with the payload embedded in it.
    fn make(&self, username: &str, duration: Duration) -> Result<(String, Payload), IssueError>;

    /// Authenticate `token` and return its payload.
    ///
    /// # Errors
    /// `TokenError::Invalid` for anything that cannot be trusted,
    /// `TokenError::Expired` for an authentic token past its window
    fn verify(&self, token: &str) -> Result<Payload, TokenError>;
}

/// Token format selected at deployment time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    Jwt,
    Paseto,
}

impl fmt::Display for TokenBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenBackend::Jwt => write!(f, "jwt"),
            TokenBackend::Paseto => write!(f, "paseto"),
        }
    }
}

impl FromStr for TokenBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jwt" => Ok(TokenBackend::Jwt),
            "paseto" => Ok(TokenBackend::Paseto),
            other => Err(format!(
                "{} is not a supported token backend. Use either `jwt` or `paseto`.",
                other
            )),
        }
    }
}

/// Construct the maker for `backend`.
///
/// # Errors
/// Returns error if the key does not satisfy the backend's size requirement
pub fn new_maker(backend: TokenBackend, symmetric_key: &str) -> Result<Box<dyn Maker>, KeyError> {
    let maker: Box<dyn Maker> = match backend {
        TokenBackend::Jwt => Box::new(JwtMaker::new(symmetric_key)?),
        TokenBackend::Paseto => Box::new(PasetoMaker::new(symmetric_key)?),
    };

    tracing::info!(backend = %backend, "Token maker created");
    Ok(maker)
}
