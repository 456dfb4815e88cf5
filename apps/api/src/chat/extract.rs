//! SQL Extractor — pulls candidate SQL out of free-form assistant text.
//!
//! Heuristic, not a parser: fenced code blocks win; a keyword-anchored
//! fallback catches inline statements. Extracted text is never validated
//! or executed here — it only pre-fills the caller's editor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Fenced code block, with or without a `sql` tag. The inner text is the
/// candidate.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?si)```(?:sql)?(.*?)```").unwrap());

/// Fallback: first SQL keyword through the end of the statement. Stops at a
/// semicolon (inclusive) or a backtick (exclusive).
static KEYWORD_FALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:SELECT|INSERT|UPDATE|DELETE|DESCRIBE|SHOW)\b[^;`]*;?").unwrap()
});

/// Editor action attached to a chat response whose reply contained SQL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlEditorAction {
    pub action: &'static str,
    pub code: String,
}

impl SqlEditorAction {
    fn insert(code: String) -> Self {
        Self {
            action: "insert",
            code,
        }
    }
}

/// Extracts SQL from assistant text.
///
/// Fenced blocks are collected in document order, trimmed, and joined with
/// blank lines. Only when no non-empty fenced block exists does the keyword
/// fallback run, and it takes the first match only. Returns `None` when
/// neither pass finds anything.
pub fn extract_sql(text: &str) -> Option<SqlEditorAction> {
    let mut candidates: Vec<String> = FENCED_BLOCK
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|block| !block.is_empty())
        .collect();

    if candidates.is_empty() {
        if let Some(found) = KEYWORD_FALLBACK.find(text) {
            let candidate = found.as_str().trim();
            if !candidate.is_empty() {
                candidates.push(candidate.to_string());
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    Some(SqlEditorAction::insert(candidates.join("\n\n")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
