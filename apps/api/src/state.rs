use sqlx::PgPool;

use crate::config::Config;
use crate::openai_client::OpenAiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub openai: OpenAiClient,
    pub config: Config,
    /// System-prompt template resolved once at startup (external file when
    /// configured and readable, otherwise the built-in default).
    pub system_template: String,
}
