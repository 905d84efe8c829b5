mod auth;
mod config;
mod db;
mod errors;
mod flows;
mod history;
mod interview;
mod llm_client;
mod models;
mod presentation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::history::{HistoryStore, MemoryHistoryStore, PgHistoryStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerFlow API v{}", env!("CARGO_PKG_VERSION"));

    // History store: PostgreSQL when configured, in-memory otherwise
    let history: Arc<dyn HistoryStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgHistoryStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; history is kept in memory and lost on restart");
            Arc::new(MemoryHistoryStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_max_retries,
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?}, retries: {})",
        llm_client::MODEL,
        config.llm_timeout,
        config.llm_max_retries
    );

    let state = AppState::new(Arc::new(llm), history, &config);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
