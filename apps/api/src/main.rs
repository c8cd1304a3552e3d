mod config;
mod db;
mod document;
mod errors;
mod job_descriptions;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod tailoring;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::job_descriptions::store::{
    InMemoryJobDescriptionStore, JobDescriptionStore, PgJobDescriptionStore,
};
use crate::llm_client::LlmClient;
use crate::render::ChromiumRenderer;
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

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Job-description store: Postgres when configured
    let jd_store: Arc<dyn JobDescriptionStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgJobDescriptionStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, job descriptions are kept in memory");
            Arc::new(InMemoryJobDescriptionStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let renderer = ChromiumRenderer::new(&config.chromium_path);
    info!("Renderer: {}", config.chromium_path);

    // Build app state
    let state = AppState {
        config: config.clone(),
        generator: Arc::new(llm),
        renderer: Arc::new(renderer),
        jd_store,
    };

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
