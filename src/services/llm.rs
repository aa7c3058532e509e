//! Text generation backend
//!
//! The portal treats generation as an opaque call:
//! `generate(prompt, max_tokens) -> String`. No retry and no rate limiting
//! happen here; an unreachable or failing backend surfaces as
//! [`PortalError::BackendUnavailable`].

use crate::error::{PortalError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Opaque text-generation collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

/// Configuration for LLM service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; may be empty, in which case every call is unavailable
    pub api_key: String,

    /// Messages endpoint URL
    pub endpoint: String,

    /// Model to use
    pub model: String,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
        }
    }
}

/// HTTP-backed generator speaking the messages API
pub struct LlmService {
    config: LlmConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(LlmConfig::default())
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(PortalError::Validation("prompt must not be empty".to_string()));
        }
        if max_tokens == 0 {
            return Err(PortalError::Validation(
                "max_tokens must be positive".to_string(),
            ));
        }
        if !self.is_configured() {
            return Err(PortalError::BackendUnavailable(
                "no API key configured (set ANTHROPIC_API_KEY or llm.api_key)".to_string(),
            ));
        }

        debug!("Calling generation backend {}", self.config.endpoint);

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PortalError::BackendUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PortalError::BackendUnavailable(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: MessagesResponse = response.json().await.map_err(|e| {
            PortalError::BackendUnavailable(format!("Failed to parse response: {}", e))
        })?;

        api_response
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| PortalError::BackendUnavailable("Empty response from API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(api_key: &str, endpoint: &str) -> LlmService {
        LlmService::new(LlmConfig {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
        })
    }

    #[tokio::test]
    async fn test_empty_prompt_is_validation_error() {
        let llm = service("key", DEFAULT_ENDPOINT);
        let err = llm.generate("   ", 128).await.unwrap_err();
        assert!(err.is_validation());

        let err = llm.generate("When is the next town hall?", 0).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_missing_key_is_backend_unavailable() {
        let llm = service("", DEFAULT_ENDPOINT);
        assert!(!llm.is_configured());
        let err = llm.generate("hello", 64).await.unwrap_err();
        assert!(matches!(err, PortalError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_backend_unavailable() {
        // Port 9 (discard) is closed on test machines
        let llm = service("key", "http://127.0.0.1:9/v1/messages");
        let err = llm.generate("hello", 64).await.unwrap_err();
        assert!(matches!(err, PortalError::BackendUnavailable(_)));
    }

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens: 256,
            temperature: 0.7,
            messages: vec![Message {
                role: "user",
                content: "How do I renew my ID?",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
