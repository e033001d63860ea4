/// JWT Maker
///
/// Signed-claims tokens: `base64url(header).base64url(claims).base64url(tag)`
/// under HMAC-SHA256. The header algorithm is checked against the one
/// algorithm this maker signs with before anything else in the token is read.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IssueError, KeyError, TokenError};
use crate::maker::Maker;
use crate::payload::Payload;

/// Minimum secret length for HS256
pub const MIN_SECRET_KEY_SIZE: usize = 32;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims set carried by the token.
///
/// `id` and `username` are custom claims; `iat`/`exp` are the registered
/// NumericDate claims in whole seconds. Unknown fields are ignored on decode.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct PayloadClaims {
    pub id: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<&Payload> for PayloadClaims {
    fn from(payload: &Payload) -> Self {
        Self {
            id: payload.id,
            username: payload.username.clone(),
            iat: payload.issued_at.timestamp(),
            // Rounded up so the encoded deadline is never earlier than the requested one
            exp: ceil_seconds(&payload.expired_at),
        }
    }
}

fn ceil_seconds(at: &DateTime<Utc>) -> i64 {
    if at.timestamp_subsec_nanos() > 0 {
        at.timestamp() + 1
    } else {
        at.timestamp()
    }
}

impl PayloadClaims {
    fn into_payload(self) -> Result<Payload, TokenError> {
        let issued_at = DateTime::<Utc>::from_timestamp(self.iat, 0).ok_or(TokenError::Invalid)?;
        let expired_at = DateTime::<Utc>::from_timestamp(self.exp, 0).ok_or(TokenError::Invalid)?;

        Ok(Payload {
            id: self.id,
            username: self.username,
            issued_at,
            expired_at,
        })
    }
}

/// Symmetric JWT maker bound to HS256
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtMaker {
    /// Create a maker from a shared secret
    ///
    /// # Errors
    /// Returns `KeyError::TooShort` if the secret is under `MIN_SECRET_KEY_SIZE` bytes
    pub fn new(secret_key: &str) -> Result<Self, KeyError> {
        if secret_key.len() < MIN_SECRET_KEY_SIZE {
            return Err(KeyError::TooShort {
                min: MIN_SECRET_KEY_SIZE,
                actual: secret_key.len(),
            });
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is decided by Payload::valid after the tag is checked
        validation.validate_exp = false;
        // Registered claims we don't issue are ignored rather than validated
        validation.validate_aud = false;
        // `iat` is enforced by PayloadClaims itself
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            validation,
        })
    }
}

impl fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtMaker")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl Maker for JwtMaker {
    fn make(&self, username: &str, duration: Duration) -> Result<(String, Payload), IssueError> {
        let claims = PayloadClaims::from(&Payload::new(username, duration));

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| IssueError(format!("Token generation failed: {}", e)))?;

        // Return exactly what verify will reconstruct from the token
        let payload = claims
            .into_payload()
            .map_err(|_| IssueError("Token timestamps out of range".to_string()))?;

        Ok((token, payload))
    }

    fn verify(&self, token: &str) -> Result<Payload, TokenError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("JWT header rejected: {}", e);
            TokenError::Invalid
        })?;

        if header.alg != SIGNING_ALGORITHM {
            tracing::warn!(alg = ?header.alg, "JWT declares unexpected algorithm");
            return Err(TokenError::Invalid);
        }

        let claims = decode::<PayloadClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation error: {}", e);
                TokenError::Invalid
            })?;

        let payload = claims.into_payload()?;
        payload.valid()?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_maker() -> JwtMaker {
        JwtMaker::new("test-secret-key-at-least-32-characters-long").expect("Failed to create maker")
    }

    #[test]
    fn test_make_and_verify_token() {
        let maker = get_test_maker();
        let issued_at = Utc::now();

        let (token, made) = maker
            .make("alice", Duration::minutes(1))
            .expect("Failed to make token");
        let payload = maker.verify(&token).expect("Failed to verify token");

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(payload.id, made.id);
        assert_eq!(payload.username, "alice");
        assert!((payload.issued_at - issued_at).num_seconds().abs() <= 1);
        assert!((payload.expired_at - (issued_at + Duration::minutes(1))).num_seconds().abs() <= 1);
    }

    #[test]
    fn test_sub_second_duration_round_trip() {
        let maker = get_test_maker();

        for _ in 0..50 {
            let (token, made) = maker
                .make("alice", Duration::milliseconds(900))
                .expect("Failed to make token");
            let payload = maker.verify(&token).expect("Sub-second token rejected");

            assert_eq!(payload, made);
            assert!(payload.expired_at > payload.issued_at);
        }
    }

    #[test]
    fn test_expired_token() {
        let maker = get_test_maker();

        let (token, _) = maker
            .make("alice", -Duration::minutes(1))
            .expect("Failed to make token");

        assert_eq!(maker.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_invalid_token() {
        let maker = get_test_maker();

        assert_eq!(maker.verify("invalid.token.here"), Err(TokenError::Invalid));
        assert_eq!(maker.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_token() {
        let maker = get_test_maker();
        let (token, _) = maker
            .make("alice", Duration::minutes(1))
            .expect("Failed to make token");

        let tampered = format!("{}X", token);

        assert_eq!(maker.verify(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let secret = "test-secret-key-at-least-32-characters-long";
        let maker = get_test_maker();
        let payload = Payload::new("alice", Duration::minutes(1));

        let token = encode(
            &Header::new(Algorithm::HS512),
            &PayloadClaims::from(&payload),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode token");

        assert_eq!(maker.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = JwtMaker::new("0123456789012345678901234567890").unwrap_err();

        assert_eq!(err, KeyError::TooShort { min: 32, actual: 31 });
        assert!(JwtMaker::new("01234567890123456789012345678901").is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let maker = get_test_maker();

        assert!(!format!("{:?}", maker).contains("test-secret"));
    }
}
