//! OpenAI client — the single point of entry for all OpenAI API calls in Quarry.
//!
//! ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
//! All chat completions and embeddings MUST go through this module.
//!
//! Every call is a single attempt with no client-side timeout. A failed
//! call surfaces immediately; a hung call hangs the request that made it.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Token cap for chat completions.
const MAX_TOKENS: u32 = 1024;
/// Sampling temperature for chat completions.
const TEMPERATURE: f32 = 0.2;
/// Dimension of the vectors stored in the `vector(1536)` columns.
pub const EMBEDDING_DIM: usize = 1536;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(&'static str),
}

/// One chat message in OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The single OpenAI client used by all services in Quarry.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, chat_model: String, embedding_model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            chat_model,
            embedding_model,
        }
    }

    /// Submits a message sequence and returns the first completion's text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, OpenAiError> {
        let request_body = ChatCompletionRequest {
            model: &self.chat_model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!(
            "Chat completion returned {} choice(s)",
            completion.choices.len()
        );

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OpenAiError::Malformed("completion carried no message content"))
    }

    /// Embeds a single text, returning its vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, OpenAiError> {
        let request_body = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or(OpenAiError::Malformed("embedding response carried no data"))?;

        if embedding.len() != EMBEDDING_DIM {
            warn!(
                "Embedding model '{}' returned {} dimensions, expected {}",
                self.embedding_model,
                embedding.len(),
                EMBEDDING_DIM
            );
        }

        Ok(embedding)
    }
}

/// Builds an `Api` error, preferring the message inside OpenAI's error
/// envelope over the raw body when the body parses.
fn api_error(status: u16, body: String) -> OpenAiError {
    let message = serde_json::from_str::<OpenAiErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    OpenAiError::Api { status, message }
}
