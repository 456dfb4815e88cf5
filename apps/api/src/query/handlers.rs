//! Axum route handlers for the pass-through query endpoint.

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit;
use crate::errors::AppError;
use crate::models::logs::{NewQueryExecution, QueryStatus};
use crate::query::limit::{apply_row_limit, effective_row_limit};
use crate::query::rows::{describe_fields, rows_to_json, FieldDescriptor};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub sql: Option<String>,
    pub row_limit: Option<i64>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponseBody {
    pub rows: Vec<Value>,
    pub fields: Vec<FieldDescriptor>,
    pub row_limit: i64,
}

/// POST /query
///
/// Runs the submitted statement as a single prepared statement, with a
/// LIMIT appended to bare SELECTs. Database errors come back as 400s that
/// carry the database's own message, so editor users see exactly what
/// Postgres said. Success and failure both land in the audit log on a
/// detached task. A missing, empty, or unparseable JSON body is read as an
/// empty request, so SQL validation answers instead of the body extractor.
pub async fn handle_query(
    State(state): State<AppState>,
    body: Option<Json<QueryRequest>>,
) -> Result<Json<QueryResponseBody>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let sql = match request.sql.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(AppError::Validation("SQL required".to_string())),
    };

    let row_limit = effective_row_limit(request.row_limit);
    let statement = apply_row_limit(&sql, row_limit);

    let executed_at = Utc::now();
    let timer = Instant::now();
    let result = sqlx::query(&statement).fetch_all(&state.db).await;
    let duration_ms = timer.elapsed().as_millis() as i64;

    match result {
        Ok(rows) => {
            let fields = describe_fields(&rows);
            let json_rows = rows_to_json(&rows);

            audit::spawn_query_log(
                state,
                NewQueryExecution {
                    executed_at,
                    user_id: request.user_id,
                    session_id: request.session_id,
                    query_text: statement,
                    status: QueryStatus::Success,
                    error_message: None,
                    tags: request.tags.unwrap_or_default(),
                    duration_ms,
                    result_sample: audit::result_sample(json_rows.first()),
                },
            );

            Ok(Json(QueryResponseBody {
                rows: json_rows,
                fields,
                row_limit,
            }))
        }
        Err(e) => {
            let error = AppError::from_query_error(e);

            audit::spawn_query_log(
                state,
                NewQueryExecution {
                    executed_at,
                    user_id: request.user_id,
                    session_id: request.session_id,
                    query_text: statement,
                    status: QueryStatus::Error,
                    error_message: Some(error.public_message()),
                    tags: request.tags.unwrap_or_default(),
                    duration_ms,
                    result_sample: None,
                },
            );

            Err(error)
        }
    }
}
