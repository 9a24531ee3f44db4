//! Authentication Models
//! Mission: Define token claims and auth request/response shapes

use crate::users::models::UserInfo;
use serde::{Deserialize, Serialize};

/// Token claims payload. Fixed shape: every claim is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub iat: i64,    // issued-at, unix seconds
    pub exp: i64,    // expiration, unix seconds
}

/// Verified identity attached to a request by the identity middleware.
///
/// Request-scoped: lives in the request extensions and dies with the
/// request. Carries no roles or capabilities; route policy decides what
/// an authenticated subject may do.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Token validation request body
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// Token validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}
