//! Ollama Provider Implementation
//!
//! Talks to Ollama's `/api/chat` endpoint with a blocking HTTP client. One
//! request is in flight at a time and failures are returned to the caller
//! as-is; there is no retry.
//!
//! # Examples
//!
//! ```no_run
//! use rootcause_llm::OllamaProvider;
//! use rootcause_domain::traits::ChatProvider;
//! use rootcause_domain::{ChatMessage, ChatRequest};
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "qwen2.5:14b-instruct").unwrap();
//! let request = ChatRequest::new(
//!     vec![ChatMessage::system("Answer yes or no."), ChatMessage::user("Is water wet?")],
//!     0.2,
//! );
//! let answer = provider.chat(&request).unwrap();
//! ```

use crate::LlmError;
use rootcause_domain::traits::ChatProvider;
use rootcause_domain::ChatRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model for ticket classification
pub const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Ollama API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    timeout: Option<Duration>,
    client: reqwest::blocking::Client,
}

/// Request body for Ollama chat API
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama chat API
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl OllamaProvider {
    /// Create a provider that waits indefinitely for each response
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "qwen2.5:14b-instruct")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, None)
    }

    /// Create a provider with an optional per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
            client,
        })
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, request: &'a ChatRequest) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        }
    }
}

impl ChatProvider for OllamaProvider {
    type Error = LlmError;

    /// Send one chat request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running or the request times out
    /// - Model is not available
    /// - Response format is invalid
    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error> {
        let url = format!("{}/api/chat", self.endpoint);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            timeout = ?self.timeout,
            "Sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(request))
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: OllamaChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.message.content)
    }
}
