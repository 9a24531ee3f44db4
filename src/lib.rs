//! Usermgr Backend Library
//!
//! Exposes the auth core, user management, and middleware modules for
//! use by the server binary and integration tests.

pub mod auth;
pub mod middleware;
pub mod router;
pub mod users;
