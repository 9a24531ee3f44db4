//! User Models
//! Mission: Define the user entity and its sanitized API view

use serde::{Deserialize, Serialize};

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: String,
    pub enabled: bool,
    pub created_at: String,
}

/// Sanitized user view returned by the API (no credentials).
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub enabled: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl UserInfo {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            enabled: user.enabled,
            created_at: user.created_at.clone(),
        }
    }
}

/// User creation request body. Password is optional: accounts created
/// without one cannot be password-checked, which matches the current
/// username-only login policy.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Partial update body for an existing user.
#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub enabled: Option<bool>,
}
