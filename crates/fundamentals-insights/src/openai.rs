//! OpenAI-compatible embeddings and chat completions.

use async_trait::async_trait;
use fundamentals_core::{FundamentalsError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::{index::Embedder, prompt::CompletionModel};

/// Default API root.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider name used in errors.
const PROVIDER_NAME: &str = "OpenAI";

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-1106-preview";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Default completion length cap.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Client for an OpenAI-compatible API.
///
/// Implements [`Embedder`] over `/embeddings` and [`CompletionModel`] over
/// `/chat/completions` at temperature 0.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    max_tokens: u32,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Use another API root, e.g. a local OpenAI-compatible server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use another chat model.
    #[must_use]
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Use another embedding model.
    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        debug!(endpoint, "OpenAI request");

        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| FundamentalsError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FundamentalsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        if !status.is_success() {
            return Err(FundamentalsError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                status: Some(status.as_u16()),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FundamentalsError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: texts,
        };
        let mut response: EmbeddingResponse = self.post("embeddings", &request).await?;
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };
        let response: ChatResponse = self.post("chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                FundamentalsError::MalformedPayload("completion has no content".to_string())
            })
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAiClient::new("sk-secret");
        let debug_str = format!("{client:?}");
        assert!(!debug_str.contains("sk-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_url_building() {
        let client = OpenAiClient::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            client.url("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_CHAT_MODEL,
            max_tokens: 1024,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "system",
                content: "prompt",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], DEFAULT_CHAT_MODEL);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["temperature"], 0.0);
    }

    #[test]
    fn test_parse_responses() {
        let chat: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "- Revenue up"}}]}"#,
        )
        .unwrap();
        assert_eq!(chat.choices[0].message.content.as_deref(), Some("- Revenue up"));

        let embeddings: EmbeddingResponse = serde_json::from_str(
            r#"{"data": [{"index": 1, "embedding": [0.5]}, {"index": 0, "embedding": [0.25]}]}"#,
        )
        .unwrap();
        assert_eq!(embeddings.data.len(), 2);
    }
}
