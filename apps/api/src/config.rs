use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_embedding_model: String,
    /// Optional path to a system-prompt template file; unset or unreadable
    /// falls back to the built-in template.
    pub prompt_template_path: Option<String>,
    /// Max prior exchanges the history retriever attaches to a chat.
    pub history_limit: i64,
    /// Character budget for the rendered schema summary.
    pub schema_summary_max_chars: usize,
    /// Character budget for the composed system prompt.
    pub system_prompt_max_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: env_or("OPENAI_MODEL", "gpt-4.1-2025-04-14"),
            openai_embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-ada-002"),
            prompt_template_path: std::env::var("PROMPT_TEMPLATE_PATH").ok(),
            history_limit: std::env::var("AI_HISTORY_LIMIT")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<i64>()
                .context("AI_HISTORY_LIMIT must be a valid integer")?,
            schema_summary_max_chars: std::env::var("SCHEMA_SUMMARY_MAX_CHARS")
                .unwrap_or_else(|_| "16000".to_string())
                .parse::<usize>()
                .context("SCHEMA_SUMMARY_MAX_CHARS must be a valid integer")?,
            system_prompt_max_chars: std::env::var("SYSTEM_PROMPT_MAX_CHARS")
                .unwrap_or_else(|_| "24000".to_string())
                .parse::<usize>()
                .context("SYSTEM_PROMPT_MAX_CHARS must be a valid integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
