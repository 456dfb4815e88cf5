use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::catalog::{self, embeddings};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /object-explorer
///
/// Returns every user-visible table grouped by comment text, ready for a
/// sidebar tree: `{"grouped": {"<comment>": ["table", ...], ...}}`.
pub async fn handle_object_explorer(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let grouped = catalog::grouped_tables(&state.db)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "grouped": grouped })))
}

/// POST /schema-embeddings/refresh
pub async fn handle_refresh_schema_embeddings(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let refreshed = embeddings::refresh_schema_embeddings(&state.db, &state.openai).await?;
    Ok(Json(json!({ "refreshed": refreshed })))
}
