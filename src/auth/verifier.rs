//! Token Verifier
//! Mission: Decide whether a decoded token is still good to use

use crate::auth::jwt::{JwtCodec, TokenError};
use crate::auth::models::Claims;
use chrono::Utc;
use std::sync::Arc;

/// Validates decoded tokens against the clock and an expected subject.
///
/// Split out from the codec so expiry rules can be tested without
/// touching signature verification.
pub struct TokenVerifier {
    codec: Arc<JwtCodec>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<JwtCodec>) -> Self {
        Self { codec }
    }

    /// Decode a token through the shared codec.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.codec.decode(token)
    }

    /// True iff the claims' expiration has passed.
    pub fn is_expired(&self, claims: &Claims) -> bool {
        Utc::now().timestamp() >= claims.exp
    }

    /// Boolean predicate: is this token valid for the expected subject?
    ///
    /// Never errors. Decode failures, empty or mismatched subjects
    /// (case-sensitive), and expiry all yield false. Callers that need
    /// error detail should use `decode` directly.
    pub fn validate(&self, token: &str, expected_subject: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => {
                !claims.sub.is_empty()
                    && claims.sub == expected_subject
                    && !self.is_expired(&claims)
            }
            Err(_) => false,
        }
    }
}
