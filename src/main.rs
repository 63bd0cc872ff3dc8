mod calendar;
mod config;
mod db;
mod error;
mod history;
mod llm;
mod routes;
mod services;
mod state;
mod store;
mod workout;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::llm::LlmChat;
use crate::services::trainer::AiTrainer;
use crate::store::{BlobStore, MemoryBlobStore, PgBlobStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("liftlog=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let backend: Arc<dyn BlobStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            Arc::new(PgBlobStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; records are kept in memory only");
            Arc::new(MemoryBlobStore::new())
        }
    };

    // Initialize LLM client (non-fatal: trainer disabled if config missing).
    let trainer = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            let llm: Arc<dyn LlmChat> = Arc::new(client);
            Some(Arc::new(AiTrainer::new(llm, config.trainer.retry_policy(), config.trainer.max_tokens)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; AI trainer disabled");
            None
        }
    };

    let state = state::AppState::open(backend, trainer).await?;
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "liftlog listening");
    axum::serve(listener, app).await?;
    Ok(())
}
