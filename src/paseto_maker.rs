/// PASETO Maker
///
/// Opaque `v4.local.` tokens: the JSON payload is encrypted and authenticated
/// in one step (XChaCha20 + BLAKE2b-MAC). Only this one version and purpose
/// is ever produced or accepted.

use std::fmt;

use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;
use rusty_paseto::core::{
    Footer, ImplicitAssertion, Key, Local, Paseto, PasetoNonce, PasetoSymmetricKey, Payload as PasetoBody, V4,
};

use crate::error::{IssueError, KeyError, TokenError};
use crate::maker::Maker;
use crate::payload::Payload;

/// Required symmetric key length for v4.local
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// Version and purpose prefix of every token this maker accepts
pub const TOKEN_HEADER: &str = "v4.local.";

pub struct PasetoMaker {
    symmetric_key: PasetoSymmetricKey<V4, Local>,
}

impl PasetoMaker {
    /// Create a maker from a 32 byte key
    ///
    /// # Errors
    /// Returns `KeyError::InvalidLength` unless the key is exactly `SYMMETRIC_KEY_SIZE` bytes
    pub fn new(symmetric_key: &str) -> Result<Self, KeyError> {
        let key_bytes: [u8; SYMMETRIC_KEY_SIZE] =
            symmetric_key
                .as_bytes()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: SYMMETRIC_KEY_SIZE,
                    actual: symmetric_key.len(),
                })?;

        Ok(Self {
            symmetric_key: PasetoSymmetricKey::<V4, Local>::from(Key::from(key_bytes)),
        })
    }
}

impl fmt::Debug for PasetoMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasetoMaker")
            .field("header", &TOKEN_HEADER)
            .finish_non_exhaustive()
    }
}

impl Maker for PasetoMaker {
    fn make(&self, username: &str, duration: Duration) -> Result<(String, Payload), IssueError> {
        let payload = Payload::new(username, duration);
        let body = serde_json::to_string(&payload)
            .map_err(|e| IssueError(format!("Payload encoding failed: {}", e)))?;

        let mut nonce_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce_key = Key::<32>::from(nonce_bytes);
        let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);

        let token = Paseto::<V4, Local>::builder()
            .set_payload(PasetoBody::from(body.as_str()))
            .try_encrypt(&self.symmetric_key, &nonce)
            .map_err(|e| IssueError(format!("Token encryption failed: {}", e)))?;

        Ok((token, payload))
    }

    fn verify(&self, token: &str) -> Result<Payload, TokenError> {
        let Some(body) = token.strip_prefix(TOKEN_HEADER) else {
            tracing::warn!("PASETO token has unexpected version or purpose");
            return Err(TokenError::Invalid);
        };

        // Tokens are issued without a footer, so any further segment is foreign
        if body.contains('.') {
            tracing::debug!("PASETO token carries a footer segment");
            return Err(TokenError::Invalid);
        }

        let json = Paseto::<V4, Local>::try_decrypt(
            token,
            &self.symmetric_key,
            None::<Footer>,
            None::<ImplicitAssertion>,
        )
        .map_err(|e| {
            tracing::debug!("PASETO decryption failed: {}", e);
            TokenError::Invalid
        })?;

        let payload: Payload = serde_json::from_str(&json).map_err(|e| {
            tracing::debug!("PASETO payload malformed: {}", e);
            TokenError::Invalid
        })?;

        payload.valid()?;
        Ok(payload)
    }
}
