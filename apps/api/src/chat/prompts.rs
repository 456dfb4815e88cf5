// Prompt template and message labels for the SQL assistant.
// The template is resolved once at startup; handlers substitute per-request
// context into it via chat::composer.

use tracing::warn;

/// Placeholder for the rendered schema summary.
pub const SCHEMA_TOKEN: &str = "{SCHEMA}";
/// Placeholder for the caller's current editor contents.
pub const EDITOR_CONTENTS_TOKEN: &str = "{EDITOR_CONTENTS}";
/// Placeholder for sampled rows from the caller's last query run.
pub const SAMPLED_RESULTS_TOKEN: &str = "{SAMPLED_RESULTS}";

/// Label prepended to editor contents appended to the user message.
pub const EDITOR_CONTENTS_LABEL: &str = "SQL Editor Contents:";
/// Label prepended to sampled results appended to the user message.
pub const SAMPLED_RESULTS_LABEL: &str = "Sampled Results:";

/// Built-in system-prompt template, used when PROMPT_TEMPLATE_PATH is unset
/// or unreadable.
pub const DEFAULT_SYSTEM_TEMPLATE: &str = r#"You are a SQL assistant for a Postgres data warehouse. Ground every answer in the schema context below. If the schema does not contain what the user asks about, say so instead of guessing. When you propose SQL, wrap each statement in a ```sql fenced code block so the editor can pick it up.

Schema:
{SCHEMA}

Current editor contents:
{EDITOR_CONTENTS}

Sampled results from the last run:
{SAMPLED_RESULTS}"#;

/// Loads the system-prompt template: the configured file when readable,
/// otherwise the built-in default.
pub fn load_system_template(path: Option<&str>) -> String {
    let Some(path) = path else {
        return DEFAULT_SYSTEM_TEMPLATE.to_string();
    };

    match std::fs::read_to_string(path) {
        Ok(template) => template,
        Err(e) => {
            warn!("Failed to read prompt template at '{path}', using built-in default: {e}");
            DEFAULT_SYSTEM_TEMPLATE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_system_template_unset_path() {
        assert_eq!(load_system_template(None), DEFAULT_SYSTEM_TEMPLATE);
    }

    #[test]
    fn test_load_system_template_unreadable_path() {
        let loaded = load_system_template(Some("/nonexistent/prompt-template.txt"));
        assert_eq!(loaded, DEFAULT_SYSTEM_TEMPLATE);
    }

    #[test]
    fn test_default_template_carries_all_tokens() {
        assert!(DEFAULT_SYSTEM_TEMPLATE.contains(SCHEMA_TOKEN));
        assert!(DEFAULT_SYSTEM_TEMPLATE.contains(EDITOR_CONTENTS_TOKEN));
        assert!(DEFAULT_SYSTEM_TEMPLATE.contains(SAMPLED_RESULTS_TOKEN));
    }
}
