//! Prompt Composer — merges the system template with request-scoped context.
//!
//! Substitution is a single left-to-right pass over the template: each
//! recognized placeholder is replaced with its value, absent values become
//! empty strings, and spliced values are never rescanned. A schema summary
//! that itself contains `{SCHEMA}` stays literal text.

use crate::chat::prompts::{EDITOR_CONTENTS_TOKEN, SAMPLED_RESULTS_TOKEN, SCHEMA_TOKEN};

/// Request-scoped context substituted into the system template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub schema_summary: String,
    pub editor_contents: Option<String>,
    pub sampled_results: Option<String>,
}

/// Builds the system prompt: substitute placeholders, then cap the result
/// at `max_chars` characters.
pub fn compose_system_prompt(template: &str, ctx: &PromptContext, max_chars: usize) -> String {
    truncate_chars(&substitute(template, ctx), max_chars)
}

fn substitute(template: &str, ctx: &PromptContext) -> String {
    let tokens = [
        (SCHEMA_TOKEN, ctx.schema_summary.as_str()),
        (EDITOR_CONTENTS_TOKEN, ctx.editor_contents.as_deref().unwrap_or("")),
        (SAMPLED_RESULTS_TOKEN, ctx.sampled_results.as_deref().unwrap_or("")),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while !rest.is_empty() {
        let earliest = tokens
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, *token, *value)))
            .min_by_key(|(at, ..)| *at);

        match earliest {
            Some((at, token, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + token.len()..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }

    out
}

/// Truncates to at most `max_chars` characters, never splitting a char.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
