//! User Management Module
//! Mission: User entity, SQLite-backed storage, and CRUD endpoints

pub mod api;
pub mod models;
pub mod store;

pub use store::UserStore;
