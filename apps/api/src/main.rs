mod config;
mod dashboard;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::{CapitalizedNameRecognizer, FieldExtractor};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Extractor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        &config.openai_base_url,
        &config.llm_model,
        config.llm_timeout,
    )
    .context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm.model(),
        config.llm_timeout.as_secs()
    );

    let extractor = FieldExtractor::new(
        Arc::new(CapitalizedNameRecognizer),
        Arc::new(llm),
        config.openai_api_key.clone(),
        config.llm_timeout,
    );
    if !extractor.has_configured_key() {
        warn!("OPENAI_API_KEY is not set; extraction requests must supply api_key");
    }

    // Initialize flat-file store
    let store = ResumeStore::new(config.data_path.clone(), config.store_policy);
    info!(
        "Resume store at {} ({:?} reads)",
        store.path().display(),
        config.store_policy
    );

    // Build app state
    let state = AppState {
        extractor: Arc::new(extractor),
        store,
        config: config.clone(),
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
