//! Row-limit enforcement for the pass-through query endpoint.
//!
//! Keyword detection only, not SQL parsing: a statement mentioning LIMIT
//! anywhere (even in a string literal) is left untouched, and so is one
//! whose final line carries a `--` comment (an appended LIMIT would land
//! inside it). That errs on the side of leaving caller SQL unmodified.

use once_cell::sync::Lazy;
use regex::Regex;

/// LIMIT appended to bare SELECTs that do not carry one.
pub const DEFAULT_ROW_LIMIT: i64 = 1000;
/// Clamp bounds for caller-supplied row limits.
pub const MIN_ROW_LIMIT: i64 = 1;
pub const MAX_ROW_LIMIT: i64 = 100_000;

static LIMIT_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\blimit\b").unwrap());

/// Resolves the effective row limit: the caller's value clamped into
/// `[MIN_ROW_LIMIT, MAX_ROW_LIMIT]`, or the default when absent.
pub fn effective_row_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_ROW_LIMIT)
        .clamp(MIN_ROW_LIMIT, MAX_ROW_LIMIT)
}

/// Appends ` LIMIT {limit}` to a bare SELECT that lacks a LIMIT keyword.
/// Everything else (INSERT, UPDATE, WITH, DDL) passes through untouched,
/// as does a SELECT whose final line contains a `--` line comment.
/// A trailing semicolon is stripped before appending.
pub fn apply_row_limit(sql: &str, limit: i64) -> String {
    let trimmed = sql.trim();

    if !is_bare_select(trimmed) || LIMIT_KEYWORD.is_match(trimmed) {
        return trimmed.to_string();
    }

    let without_semicolon = trimmed.trim_end_matches(';').trim_end();
    if ends_in_line_comment(without_semicolon) {
        return trimmed.to_string();
    }

    format!("{without_semicolon} LIMIT {limit}")
}

/// True when the last line opens a `--` comment, which would swallow any
/// text appended to the statement.
fn ends_in_line_comment(sql: &str) -> bool {
    sql.lines().last().map_or(false, |line| line.contains("--"))
}

fn is_bare_select(sql: &str) -> bool {
    let Some(prefix) = sql.get(..6) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case("select") {
        return false;
    }
    // "selection" and friends are not SELECT statements.
    match sql.as_bytes().get(6) {
        None => true,
        Some(b) => !b.is_ascii_alphanumeric() && *b != b'_',
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_select_gets_limit() {
        assert_eq!(
            apply_row_limit("SELECT * FROM users", 1000),
            "SELECT * FROM users LIMIT 1000"
        );
    }

    #[test]
    fn test_trailing_semicolon_stripped_before_append() {
        assert_eq!(
            apply_row_limit("SELECT * FROM users;", 1000),
            "SELECT * FROM users LIMIT 1000"
        );
    }

    #[test]
    fn test_existing_limit_left_untouched() {
        assert_eq!(
            apply_row_limit("SELECT * FROM users LIMIT 10", 1000),
            "SELECT * FROM users LIMIT 10"
        );
    }

    #[test]
    fn test_lowercase_limit_detected() {
        assert_eq!(
            apply_row_limit("select id from t limit 3;", 1000),
            "select id from t limit 3;"
        );
    }

    #[test]
    fn test_limit_in_string_literal_suppresses_append() {
        // Deliberately coarse: any LIMIT keyword suppresses the append.
        let sql = "SELECT * FROM t WHERE note = 'no limit here'";
        assert_eq!(apply_row_limit(sql, 1000), sql);
    }

    #[test]
    fn test_trailing_line_comment_suppresses_append() {
        // Appending here would put the LIMIT inside the comment.
        let sql = "SELECT * FROM t -- preview";
        assert_eq!(apply_row_limit(sql, 1000), sql);
    }

    #[test]
    fn test_comment_after_semicolon_suppresses_append() {
        let sql = "SELECT * FROM t; -- done";
        assert_eq!(apply_row_limit(sql, 1000), sql);
    }

    #[test]
    fn test_interior_line_comment_still_appends() {
        assert_eq!(
            apply_row_limit("SELECT * -- all columns\nFROM t", 1000),
            "SELECT * -- all columns\nFROM t LIMIT 1000"
        );
    }

    #[test]
    fn test_non_select_untouched() {
        assert_eq!(
            apply_row_limit("UPDATE users SET active = false", 1000),
            "UPDATE users SET active = false"
        );
        assert_eq!(
            apply_row_limit("INSERT INTO t (id) VALUES (1);", 1000),
            "INSERT INTO t (id) VALUES (1);"
        );
    }

    #[test]
    fn test_cte_select_untouched() {
        let sql = "WITH x AS (SELECT 1) SELECT * FROM x";
        assert_eq!(apply_row_limit(sql, 1000), sql);
    }

    #[test]
    fn test_select_prefix_word_untouched() {
        let sql = "SELECTION IS NOT SQL";
        assert_eq!(apply_row_limit(sql, 1000), sql);
    }

    #[test]
    fn test_leading_whitespace_still_detected() {
        assert_eq!(
            apply_row_limit("   select 1", 50),
            "select 1 LIMIT 50"
        );
    }

    #[test]
    fn test_effective_row_limit_default() {
        assert_eq!(effective_row_limit(None), DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn test_effective_row_limit_clamps_low_and_high() {
        assert_eq!(effective_row_limit(Some(0)), MIN_ROW_LIMIT);
        assert_eq!(effective_row_limit(Some(-5)), MIN_ROW_LIMIT);
        assert_eq!(effective_row_limit(Some(9_999_999)), MAX_ROW_LIMIT);
    }

    #[test]
    fn test_effective_row_limit_in_range_passthrough() {
        assert_eq!(effective_row_limit(Some(250)), 250);
    }
}
