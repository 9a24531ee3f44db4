//! User API Endpoints
//! Mission: CRUD over user accounts plus the authenticated profile view

use crate::auth::models::AuthContext;
use crate::users::{
    models::{NewUser, UserInfo, UserUpdate},
    store::{StoreError, UserStore},
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// List all users - GET /api/users
pub async fn list_users(
    State(store): State<Arc<UserStore>>,
) -> Result<Json<Vec<UserInfo>>, UsersApiError> {
    let users = store.list_users()?;
    Ok(Json(users.iter().map(UserInfo::from_user).collect()))
}

/// Create user - POST /api/users
pub async fn create_user(
    State(store): State<Arc<UserStore>>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<UserInfo>), UsersApiError> {
    let user = store.create_user(&payload)?;
    Ok((StatusCode::CREATED, Json(UserInfo::from_user(&user))))
}

/// Get user by id - GET /api/users/:id
pub async fn get_user(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, UsersApiError> {
    let user = store.get_user(id)?.ok_or(UsersApiError::NotFound)?;
    Ok(Json(UserInfo::from_user(&user)))
}

/// Update user - PUT /api/users/:id
pub async fn update_user(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserInfo>, UsersApiError> {
    let user = store.update_user(id, &payload)?;
    Ok(Json(UserInfo::from_user(&user)))
}

/// Delete user - DELETE /api/users/:id
pub async fn delete_user(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, UsersApiError> {
    store.delete_user(id)?;
    Ok(StatusCode::OK)
}

/// Authenticated profile - GET /api/users/profile
///
/// Resolves the subject attached by the identity middleware back to its
/// stored profile. Runs behind `require_auth`, so the extension is
/// normally present; a missing one still maps to 401 rather than a panic.
pub async fn get_profile(
    State(store): State<Arc<UserStore>>,
    ctx: Option<Extension<AuthContext>>,
) -> Result<Json<UserInfo>, UsersApiError> {
    let Extension(ctx) = ctx.ok_or(UsersApiError::Unauthorized)?;

    let user = store
        .get_user_by_username(&ctx.subject)?
        .ok_or(UsersApiError::NotFound)?;

    Ok(Json(UserInfo::from_user(&user)))
}

/// User API errors
#[derive(Debug)]
pub enum UsersApiError {
    NotFound,
    DuplicateEmail,
    Validation(&'static str),
    Unauthorized,
    InternalError,
}

impl From<StoreError> for UsersApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => UsersApiError::NotFound,
            StoreError::DuplicateEmail => UsersApiError::DuplicateEmail,
            StoreError::InvalidInput(msg) => UsersApiError::Validation(msg),
            StoreError::Internal(err) => {
                warn!("User store failure: {}", err);
                UsersApiError::InternalError
            }
        }
    }
}

impl IntoResponse for UsersApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UsersApiError::NotFound => (StatusCode::NOT_FOUND, "User not found"),
            UsersApiError::DuplicateEmail => (StatusCode::CONFLICT, "Email already in use"),
            UsersApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            UsersApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            UsersApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
