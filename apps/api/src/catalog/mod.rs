//! Catalog introspection — schema summarization for prompt grounding and
//! grouped table listings for the object explorer.
//!
//! The summary is derived fresh from `information_schema` on every request.
//! No caching: the editor talks to live databases whose schemas drift.

use anyhow::Result;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use tracing::warn;

pub mod embeddings;
pub mod handlers;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Bucket label for tables without a comment in the object-explorer grouping.
pub const NO_COMMENT_LABEL: &str = "No Comment";

const SUMMARY_HEADER: &str = "schema.table_name\tcolumns\ttable_comment";

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    table_schema: String,
    table_name: String,
    column_name: String,
    data_type: String,
    table_comment: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct TableCommentRow {
    table_name: String,
    table_comment: Option<String>,
}

/// One user-visible table: columns in declaration order plus its comment.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub schema: String,
    pub name: String,
    /// `(column_name, data_type)` pairs in ordinal position order.
    pub columns: Vec<(String, String)>,
    pub comment: Option<String>,
}

/// Deterministically ordered description of every user-visible table:
/// schemas ascending, tables ascending within a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSummary {
    pub tables: Vec<TableSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Schema summarization
// ────────────────────────────────────────────────────────────────────────────

const SUMMARY_SQL: &str = r#"
SELECT c.table_schema::text AS table_schema,
       c.table_name::text AS table_name,
       c.column_name::text AS column_name,
       c.data_type::text AS data_type,
       obj_description(
           (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass,
           'pg_class'
       ) AS table_comment
FROM information_schema.columns c
JOIN information_schema.tables t
  ON c.table_schema = t.table_schema AND c.table_name = t.table_name
WHERE c.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY c.table_schema, c.table_name, c.ordinal_position
"#;

/// Builds the ordered schema summary from the live catalog.
///
/// Best-effort: any failure degrades to an empty summary so the chat
/// pipeline keeps working without schema grounding.
pub async fn summarize_schema(pool: &PgPool) -> SchemaSummary {
    match fetch_summary(pool).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Schema summarization failed, continuing without schema context: {e}");
            SchemaSummary::default()
        }
    }
}

/// Fallible variant used where a catalog failure must surface (embedding
/// refresh) instead of degrading.
pub(crate) async fn fetch_summary(pool: &PgPool) -> Result<SchemaSummary> {
    let rows = sqlx::query_as::<_, ColumnRow>(SUMMARY_SQL)
        .fetch_all(pool)
        .await?;
    Ok(group_columns(rows))
}

/// Folds ordered per-column rows into per-table entries. Rows arrive in
/// catalog order (schema, table, ordinal position), so one forward pass
/// with a last-table check suffices.
fn group_columns(rows: Vec<ColumnRow>) -> SchemaSummary {
    let mut tables: Vec<TableSummary> = Vec::new();

    for row in rows {
        let ColumnRow {
            table_schema,
            table_name,
            column_name,
            data_type,
            table_comment,
        } = row;

        let continues_last = tables
            .last()
            .map(|t| t.schema == table_schema && t.name == table_name)
            .unwrap_or(false);

        if !continues_last {
            tables.push(TableSummary {
                schema: table_schema,
                name: table_name,
                columns: Vec::new(),
                comment: table_comment,
            });
        }

        if let Some(current) = tables.last_mut() {
            current.columns.push((column_name, data_type));
        }
    }

    SchemaSummary { tables }
}

impl TableSummary {
    /// One TSV line: `schema.table_name<TAB>col type, col type<TAB>comment`.
    fn render_line(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(name, data_type)| format!("{name} {data_type}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}.{}\t{}\t{}",
            self.schema,
            self.name,
            columns,
            self.comment.as_deref().unwrap_or("")
        )
    }
}

impl SchemaSummary {
    /// Renders the summary as a TSV block under a character budget.
    ///
    /// The header line is always present. Table lines are added whole, in
    /// summary order, until the next line would push the total past
    /// `max_chars` — no mid-line truncation.
    pub fn render(&self, max_chars: usize) -> String {
        let mut out = String::from(SUMMARY_HEADER);
        let mut used = out.chars().count();

        for table in &self.tables {
            let line = table.render_line();
            let cost = line.chars().count() + 1; // +1 for the newline
            if used + cost > max_chars {
                break;
            }
            out.push('\n');
            out.push_str(&line);
            used += cost;
        }

        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Object explorer grouping
// ────────────────────────────────────────────────────────────────────────────

const EXPLORER_SQL: &str = r#"
SELECT t.table_name::text AS table_name,
       obj_description(
           (quote_ident(t.table_schema) || '.' || quote_ident(t.table_name))::regclass,
           'pg_class'
       ) AS table_comment
FROM information_schema.tables t
WHERE t.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY t.table_name
"#;

/// Groups user-visible tables by their comment text for the object explorer.
pub async fn grouped_tables(pool: &PgPool) -> Result<Map<String, Value>> {
    let rows = sqlx::query_as::<_, TableCommentRow>(EXPLORER_SQL)
        .fetch_all(pool)
        .await?;
    Ok(group_by_comment(
        rows.into_iter()
            .map(|row| (row.table_name, row.table_comment))
            .collect(),
    ))
}

/// Orders groups by comment text ascending with the no-comment bucket last,
/// and table names ascending within each group. The returned map preserves
/// insertion order through serialization.
fn group_by_comment(mut tables: Vec<(String, Option<String>)>) -> Map<String, Value> {
    tables.sort_by(|(name_a, comment_a), (name_b, comment_b)| {
        match (comment_a, comment_b) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| name_a.cmp(name_b)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => name_a.cmp(name_b),
        }
    });

    let mut grouped = Map::new();
    for (name, comment) in tables {
        let label = comment.unwrap_or_else(|| NO_COMMENT_LABEL.to_string());
        match grouped.get_mut(&label) {
            Some(Value::Array(names)) => names.push(Value::String(name)),
            _ => {
                grouped.insert(label, Value::Array(vec![Value::String(name)]));
            }
        }
    }

    grouped
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column_row(
        schema: &str,
        table: &str,
        column: &str,
        data_type: &str,
        comment: Option<&str>,
    ) -> ColumnRow {
        ColumnRow {
            table_schema: schema.to_string(),
            table_name: table.to_string(),
            column_name: column.to_string(),
            data_type: data_type.to_string(),
            table_comment: comment.map(|c| c.to_string()),
        }
    }

    fn two_table_summary() -> SchemaSummary {
        group_columns(vec![
            make_column_row("public", "address1", "id", "integer", Some("Address table")),
            make_column_row("public", "address1", "name", "text", Some("Address table")),
            make_column_row("sales", "orders", "id", "integer", None),
        ])
    }

    #[test]
    fn test_group_columns_preserves_ordinal_order() {
        let summary = group_columns(vec![
            make_column_row("public", "t", "zulu", "text", None),
            make_column_row("public", "t", "alpha", "integer", None),
        ]);
        assert_eq!(summary.tables.len(), 1);
        assert_eq!(
            summary.tables[0].columns,
            vec![
                ("zulu".to_string(), "text".to_string()),
                ("alpha".to_string(), "integer".to_string()),
            ],
            "Columns must keep declaration order, not alphabetical order"
        );
    }

    #[test]
    fn test_group_columns_splits_tables_across_schemas() {
        let summary = group_columns(vec![
            make_column_row("a", "t", "id", "integer", None),
            make_column_row("b", "t", "id", "integer", None),
        ]);
        assert_eq!(summary.tables.len(), 2, "Same name in two schemas is two tables");
    }

    #[test]
    fn test_render_is_tsv_with_header() {
        let rendered = two_table_summary().render(10_000);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "schema.table_name\tcolumns\ttable_comment");
        assert_eq!(lines[1], "public.address1\tid integer, name text\tAddress table");
        assert_eq!(lines[2], "sales.orders\tid integer\t");
    }

    #[test]
    fn test_render_is_deterministic() {
        let summary = two_table_summary();
        assert_eq!(summary.render(10_000), summary.render(10_000));
    }

    #[test]
    fn test_render_drops_whole_lines_past_budget() {
        let summary = two_table_summary();
        let full = summary.render(10_000);
        let header_and_first = full.lines().take(2).collect::<Vec<_>>().join("\n");

        // Budget that fits the header and first table line but not the second.
        let budget = header_and_first.chars().count() + 5;
        let rendered = summary.render(budget);

        assert_eq!(rendered, header_and_first, "Second table line must be dropped whole");
    }

    #[test]
    fn test_render_keeps_header_under_tiny_budget() {
        let rendered = two_table_summary().render(1);
        assert_eq!(rendered, SUMMARY_HEADER);
    }

    #[test]
    fn test_empty_summary_renders_header_only() {
        assert_eq!(SchemaSummary::default().render(10_000), SUMMARY_HEADER);
    }

    #[test]
    fn test_group_by_comment_orders_no_comment_last() {
        let grouped = group_by_comment(vec![
            ("t_plain".to_string(), None),
            ("t_users".to_string(), Some("User data".to_string())),
            ("t_addr".to_string(), Some("Address data".to_string())),
        ]);

        let labels: Vec<&str> = grouped.keys().map(|k| k.as_str()).collect();
        assert_eq!(labels, vec!["Address data", "User data", NO_COMMENT_LABEL]);
    }

    #[test]
    fn test_group_by_comment_merges_shared_comments_sorted() {
        let grouped = group_by_comment(vec![
            ("zebra".to_string(), Some("Shared".to_string())),
            ("apple".to_string(), Some("Shared".to_string())),
        ]);

        assert_eq!(
            grouped.get("Shared"),
            Some(&Value::Array(vec![
                Value::String("apple".to_string()),
                Value::String("zebra".to_string()),
            ])),
            "Names within a group must be ascending"
        );
    }

    #[test]
    fn test_group_by_comment_empty_input() {
        assert!(group_by_comment(Vec::new()).is_empty());
    }
}
