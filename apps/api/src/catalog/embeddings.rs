//! Schema-embedding refresh — re-derives one text block per table and
//! upserts its embedding so semantic lookups stay aligned with the live
//! schema after migrations.

use pgvector::Vector;
use sqlx::PgPool;
use tracing::info;

use crate::catalog::{fetch_summary, TableSummary};
use crate::errors::AppError;
use crate::openai_client::OpenAiClient;

const UPSERT_SQL: &str = r#"
INSERT INTO schema_embeddings (table_name, schema_text, embedding)
VALUES ($1, $2, $3)
ON CONFLICT (table_name)
DO UPDATE SET schema_text = EXCLUDED.schema_text, embedding = EXCLUDED.embedding
"#;

/// Rebuilds the stored embedding for every user-visible table.
///
/// Unlike the chat-path consumers of the catalog, failures here surface to
/// the caller: a refresh that silently skipped tables would leave stale
/// vectors behind with no signal.
pub async fn refresh_schema_embeddings(
    pool: &PgPool,
    openai: &OpenAiClient,
) -> Result<usize, AppError> {
    let summary = fetch_summary(pool).await.map_err(AppError::Internal)?;

    let mut refreshed = 0usize;
    for table in &summary.tables {
        let qualified_name = format!("{}.{}", table.schema, table.name);
        let schema_text = render_table_text(table);
        let embedding = Vector::from(openai.embed(&schema_text).await?);

        sqlx::query(UPSERT_SQL)
            .bind(&qualified_name)
            .bind(&schema_text)
            .bind(&embedding)
            .execute(pool)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        refreshed += 1;
    }

    info!("Refreshed schema embeddings for {refreshed} table(s)");
    Ok(refreshed)
}

/// The text block fed to the embedding model for one table:
/// a `Table:` line followed by one `column type` line per column.
fn render_table_text(table: &TableSummary) -> String {
    let mut text = format!("Table: {}.{}", table.schema, table.name);
    for (name, data_type) in &table.columns {
        text.push('\n');
        text.push_str(name);
        text.push(' ');
        text.push_str(data_type);
    }
    text
}
