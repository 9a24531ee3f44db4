//! Usermgr Backend
//! Mission: Minimal user-management API with stateless token auth

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usermgr_backend::{auth::JwtCodec, router::create_router, users::UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    let _ = dotenv();
    init_tracing();

    info!("Usermgr backend starting");

    let db_path = env::var("USERS_DB_PATH").unwrap_or_else(|_| "usermgr.db".to_string());
    let jwt_secret = env::var("JWT_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

    let user_store = Arc::new(UserStore::new(&db_path)?);
    let codec = Arc::new(JwtCodec::new(jwt_secret));

    info!("User store initialized at: {}", db_path);

    let app = create_router(user_store, codec);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usermgr_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
