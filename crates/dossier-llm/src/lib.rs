//! Dossier Extraction-Service Provider Layer
//!
//! Implementations of the `ExtractionProvider` trait from `dossier-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing
//! - `OllamaProvider`: local Ollama HTTP API integration
//!
//! # Examples
//!
//! ```
//! use dossier_llm::MockProvider;
//! use dossier_domain::traits::ExtractionProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"full_name": "AYLIN KAYA"}"#);
//! let response = provider.generate("system", "prompt").await.unwrap();
//! assert!(response.text.contains("AYLIN"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use dossier_domain::traits::{ExtractionProvider, ProviderResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during extraction-service operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or API communication error (retry budget exhausted)
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request timed out (retry budget exhausted)
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Service reported overload (retry budget exhausted)
    #[error("Service overloaded: HTTP {0}")]
    Overloaded(u16),

    /// Invalid response body from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Requested model is not available on the service
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be keyed by the exact prompt, by a substring the prompt
/// must contain (useful when the prompt embeds a whole document), or fall
/// back to a default.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    contains_rules: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            contains_rules: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a response for an exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Add a response for any prompt containing `marker`
    ///
    /// Rules are checked in insertion order, after exact matches.
    pub fn add_response_containing(
        &mut self,
        marker: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.contains_rules
            .lock()
            .unwrap()
            .push((marker.into(), response.into()));
    }

    /// Configure an error for any prompt containing `marker`
    pub fn add_error_containing(&mut self, marker: impl Into<String>) {
        self.contains_rules
            .lock()
            .unwrap()
            .push((marker.into(), "ERROR".to_string()));
    }

    /// Number of generate calls so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn lookup(&self, prompt: &str) -> String {
        if let Some(response) = self.responses.lock().unwrap().get(prompt) {
            return response.clone();
        }
        for (marker, response) in self.contains_rules.lock().unwrap().iter() {
            if prompt.contains(marker.as_str()) {
                return response.clone();
            }
        }
        self.default_response.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl ExtractionProvider for MockProvider {
    type Error = ProviderError;

    async fn generate(
        &self,
        _system_prompt: &str,
        prompt: &str,
    ) -> Result<ProviderResponse, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let response = self.lookup(prompt);
        if response == "ERROR" {
            return Err(ProviderError::Other("Mock error".to_string()));
        }

        Ok(ProviderResponse {
            text: response,
            model: Some("mock".to_string()),
            duration_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("canned");
        let response = provider.generate("sys", "anything").await.unwrap();
        assert_eq!(response.text, "canned");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_exact_and_contains() {
        let mut provider = MockProvider::default();
        provider.add_response("exact prompt", "exact response");
        provider.add_response_containing("DIPLOMA MARKER", r#"{"graduation_year": 2015}"#);

        let r = provider.generate("sys", "exact prompt").await.unwrap();
        assert_eq!(r.text, "exact response");

        let r = provider
            .generate("sys", "long prompt with DIPLOMA MARKER inside")
            .await
            .unwrap();
        assert!(r.text.contains("2015"));

        let r = provider.generate("sys", "unmatched").await.unwrap();
        assert_eq!(r.text, "{}");
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error_containing("bad document");

        let result = provider.generate("sys", "this bad document here").await;
        assert!(matches!(result, Err(ProviderError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("x");
        let provider2 = provider1.clone();

        provider1.generate("sys", "p").await.unwrap();
        assert_eq!(provider2.call_count(), 1);
    }
}
