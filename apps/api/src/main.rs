mod audit;
mod catalog;
mod chat;
mod config;
mod db;
mod errors;
mod models;
mod openai_client;
mod query;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::prompts::load_system_template;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::openai_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quarry API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply migrations
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Resolve the system-prompt template once; handlers reuse it read-only
    let system_template = load_system_template(config.prompt_template_path.as_deref());

    // Initialize the OpenAI client
    let openai = OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_embedding_model.clone(),
    );
    info!(
        "OpenAI client initialized (chat: {}, embeddings: {})",
        config.openai_model, config.openai_embedding_model
    );

    // Build app state
    let state = AppState {
        db,
        openai,
        config: config.clone(),
        system_template,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
