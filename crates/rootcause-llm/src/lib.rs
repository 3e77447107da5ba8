//! Rootcause LLM Provider Layer
//!
//! Chat-completion backends implementing the `ChatProvider` trait from
//! `rootcause-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Ollama `/api/chat` integration
//!
//! # Examples
//!
//! ```
//! use rootcause_llm::MockProvider;
//! use rootcause_domain::traits::ChatProvider;
//! use rootcause_domain::{ChatMessage, ChatRequest};
//!
//! let provider = MockProvider::new("Yes - disk full");
//! let request = ChatRequest::new(vec![ChatMessage::user("Ticket Number: INC1")], 0.2);
//! assert_eq!(provider.chat(&request).unwrap(), "Yes - disk full");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use rootcause_domain::traits::ChatProvider;
use rootcause_domain::ChatRequest;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// Mock chat provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted responses are matched against the request's user message by
/// substring, first match wins; unmatched requests get the default response.
/// Every request is recorded so tests can inspect what was sent.
///
/// # Examples
///
/// ```
/// use rootcause_llm::MockProvider;
/// use rootcause_domain::traits::ChatProvider;
/// use rootcause_domain::{ChatMessage, ChatRequest};
///
/// let mut provider = MockProvider::new("No");
/// provider.add_response("INC7", "Yes - expired certificate");
///
/// let request = |body: &str| ChatRequest::new(vec![ChatMessage::user(body)], 0.2);
/// assert_eq!(provider.chat(&request("Ticket Number: INC7")).unwrap(), "Yes - expired certificate");
/// assert_eq!(provider.chat(&request("Ticket Number: INC8")).unwrap(), "No");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, Scripted)>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` when the user message contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((needle.into(), Scripted::Reply(response.into())));
    }

    /// Fail when the user message contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), Scripted::Fail));
    }

    /// Remove all scripted responses and failures
    pub fn clear_script(&self) {
        lock(&self.responses).clear();
    }

    /// Get the number of times chat was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatProvider for MockProvider {
    type Error = LlmError;

    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        let user = request.user_content().unwrap_or_default();
        let responses = lock(&self.responses);
        match responses.iter().find(|(needle, _)| user.contains(needle.as_str())) {
            Some((_, Scripted::Reply(response))) => Ok(response.clone()),
            Some((needle, Scripted::Fail)) => {
                Err(LlmError::Other(format!("Mock error for '{}'", needle)))
            }
            None => Ok(self.default_response.clone()),
        }
    }
}

// A poisoned lock only means another test thread panicked mid-update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootcause_domain::ChatMessage;

    fn request(body: &str) -> ChatRequest {
        ChatRequest::new(
            vec![ChatMessage::system("classify"), ChatMessage::user(body)],
            0.2,
        )
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.chat(&request("any"));
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("INC1", "yes");
        provider.add_response("INC2", "no");

        assert_eq!(provider.chat(&request("Ticket Number: INC1")).unwrap(), "yes");
        assert_eq!(provider.chat(&request("Ticket Number: INC2")).unwrap(), "no");
        assert_eq!(
            provider.chat(&request("Ticket Number: INC3")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.chat(&request("first")).unwrap();
        provider.chat(&request("second")).unwrap();

        let seen = provider.requests();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].user_content(), Some("second"));
        assert_eq!(seen[0].system_content(), Some("classify"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("INC9");

        let result = provider.chat(&request("Ticket Number: INC9"));
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));

        provider.clear_script();
        assert!(provider.chat(&request("Ticket Number: INC9")).is_ok());
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.chat(&request("x")).unwrap();

        // Both should share the same request log due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
