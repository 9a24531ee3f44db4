//! Identity Middleware
//! Mission: Attach verified identity to requests without ever rejecting them

use crate::auth::{models::AuthContext, verifier::TokenVerifier};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Fail-open identity middleware.
///
/// Looks for `Authorization: Bearer <token>`; on a valid, unexpired token
/// attaches an `AuthContext` to the request extensions. Any decode failure
/// is logged and discarded: an invalid token degrades to anonymous, it
/// never aborts the pipeline. Rejection is the job of `require_auth` on
/// routes that want it.
pub async fn identity_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    if let Some(token) = bearer {
        match verifier.decode(&token) {
            Ok(claims) => {
                // Attach only if nothing upstream already authenticated
                // this request and the token is still live.
                if req.extensions().get::<AuthContext>().is_none()
                    && !claims.sub.is_empty()
                    && !verifier.is_expired(&claims)
                {
                    req.extensions_mut().insert(AuthContext {
                        subject: claims.sub,
                    });
                }
            }
            Err(e) => {
                debug!("Discarding unusable bearer token: {}", e);
            }
        }
    }

    next.run(req).await
}

/// Route policy layer for protected routes: reject when the identity
/// middleware attached nothing.
pub async fn require_auth(req: Request, next: Next) -> Result<Response, AuthError> {
    if req.extensions().get::<AuthContext>().is_none() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(next.run(req).await)
}

/// Auth policy errors
#[derive(Debug)]
pub enum AuthError {
    Unauthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
        };

        (status, message).into_response()
    }
}
