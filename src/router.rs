//! Application router
//! Mission: Wire public and protected routes around the identity middleware

use crate::auth::{
    api as auth_api, identity_middleware, require_auth, AuthState, JwtCodec, TokenVerifier,
};
use crate::middleware::request_logging;
use crate::users::{api as users_api, UserStore};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Create the application router.
///
/// Route policy: auth endpoints, user list/create, hello, and health are
/// public; per-user routes and the profile require an authenticated
/// identity. The identity middleware itself runs over everything and
/// never rejects - `require_auth` on the protected subrouter does.
pub fn create_router(user_store: Arc<UserStore>, codec: Arc<JwtCodec>) -> Router {
    let auth_state = AuthState::new(user_store.clone(), codec.clone());
    let verifier: Arc<TokenVerifier> = auth_state.verifier.clone();

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/auth/validate", post(auth_api::validate_token))
        .with_state(auth_state);

    let public_user_routes = Router::new()
        .route(
            "/api/users",
            get(users_api::list_users).post(users_api::create_user),
        )
        .with_state(user_store.clone());

    let protected_user_routes = Router::new()
        .route("/api/users/profile", get(users_api::get_profile))
        .route(
            "/api/users/:id",
            get(users_api::get_user)
                .put(users_api::update_user)
                .delete(users_api::delete_user),
        )
        .route_layer(middleware::from_fn(require_auth))
        .with_state(user_store);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/hello", get(hello))
        .merge(auth_routes)
        .merge(public_user_routes)
        .merge(protected_user_routes)
        .layer(middleware::from_fn_with_state(verifier, identity_middleware))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Smoke-test endpoint
async fn hello() -> &'static str {
    "Hello! This is the usermgr API."
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
