use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde_json::Value;
use sqlx::FromRow;

/// A chat exchange headed for the append-only audit log.
/// `started_at <= ended_at` holds by construction: callers stamp
/// `started_at` before dispatch and `ended_at` after the reply arrives.
#[derive(Debug, Clone)]
pub struct NewChatExchange {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
    pub session_id: Option<String>,
    pub prompt: String,
    pub response: String,
    pub tags: Vec<String>,
    pub context: Option<Value>,
    pub rating: Option<i32>,
    pub source: Option<String>,
    pub embedding: Option<Vector>,
}

/// Outcome classification for a logged query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        }
    }
}

/// A raw query execution headed for the audit log.
#[derive(Debug, Clone)]
pub struct NewQueryExecution {
    pub executed_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub query_text: String,
    pub status: QueryStatus,
    pub error_message: Option<String>,
    pub tags: Vec<String>,
    pub duration_ms: i64,
    pub result_sample: Option<String>,
}

/// Projection of a stored exchange used by history retrieval.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryExchangeRow {
    pub started_at: DateTime<Utc>,
    pub prompt: String,
}
