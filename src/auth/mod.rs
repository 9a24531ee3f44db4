//! Authentication Module
//! Mission: Stateless token auth - issuance, verification, identity propagation

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod verifier;

pub use api::AuthState;
pub use jwt::JwtCodec;
pub use middleware::{identity_middleware, require_auth};
pub use verifier::TokenVerifier;
