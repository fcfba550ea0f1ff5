use std::sync::Arc;

use anyhow::Context;

use sgt_api::auth::TokenCodec;
use sgt_api::config::{config, DEV_JWT_SECRET};
use sgt_api::db::Store;
use sgt_api::services::FirebaseIdentity;
use sgt_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up MONGODB_URI, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config();
    if config.security.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set; falling back to the development default");
    }

    let store = Store::connect(&config.store)
        .await
        .context("failed to initialize the document store client")?;

    let state = AppState {
        store,
        codec: TokenCodec::new(&config.security.jwt_secret, config.security.token_ttl_minutes),
        identity: Arc::new(FirebaseIdentity::new(&config.identity)),
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 Sistema de Gestión de Tareas API listening on http://{}", bind_addr);

    axum::serve(listener, sgt_api::app(state))
        .await
        .context("server")?;

    Ok(())
}
