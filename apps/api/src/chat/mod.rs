// AI chat pipeline: compose a schema-grounded system prompt, dispatch to
// OpenAI, extract actionable SQL from the reply, log the exchange.
// All provider calls go through openai_client — no direct HTTP calls here.

pub mod composer;
pub mod extract;
pub mod handlers;
pub mod history;
pub mod prompts;
