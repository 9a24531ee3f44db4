//! JWT Token Codec
//! Mission: Issue and decode signed identity tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// Decode failures, kept fine-grained for callers that need to tell
/// a bad signature from an unparsable token.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Token structure could not be parsed at all.
    Malformed,
    /// Structure parsed but the signature does not match our key.
    InvalidSignature,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Malformed token"),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Codec for signed, time-bounded identity tokens (HS256).
///
/// The signing key is fixed at construction and immutable afterwards.
/// Decoding verifies the signature only; expiry is the verifier's job,
/// so expired-but-authentic tokens can still be inspected.
pub struct JwtCodec {
    secret: String,
    ttl_hours: i64,
}

impl JwtCodec {
    /// Create a new codec with the process-wide signing key.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl_hours: 24, // 24-hour tokens
        }
    }

    /// Issue a signed token for the given subject.
    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid expiration timestamp")?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(
            "Issuing token for {}, expires in {}h",
            subject, self.ttl_hours
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to encode token")
    }

    /// Decode a token and verify its signature. Does not check expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;

        Ok(decoded.claims)
    }
}
