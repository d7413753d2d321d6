//! Ollama Provider Implementation
//!
//! HTTP client for a local Ollama-style generate API. The provider owns the
//! transient-retry policy: timeouts, connection failures, and overload
//! statuses (429/503) are retried up to the configured budget with the same
//! payload and no backoff; every other failure class fails fast.

use crate::ProviderError;
use dossier_domain::traits::{ExtractionProvider, ProviderResponse};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Default number of attempts per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Sampling options sent with every request
///
/// Low temperature keeps extraction output deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling cutoff
    pub top_p: f64,
    /// Maximum tokens to generate
    pub num_predict: u32,
    /// Context window size
    pub num_ctx: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            num_predict: 2048,
            num_ctx: 8192,
        }
    }
}

/// Provider for a local Ollama instance
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    options: GenerateOptions,
    timeout_secs: u64,
    max_attempts: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    model: Option<String>,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a provider for the given endpoint and model
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Other(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            options: GenerateOptions::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Override the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Result<Self, ProviderError> {
        self.timeout_secs = timeout_secs;
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Other(format!("HTTP client build failed: {}", e)))?;
        Ok(self)
    }

    /// Override the sampling options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    async fn call_once(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system: system_prompt,
            stream: false,
            options: &self.options,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ProviderError::Communication(format!("Connect failed: {}", e))
                } else {
                    ProviderError::Other(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return Err(ProviderError::Overloaded(status.as_u16()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Communication(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Body parse failed: {}", e)))?;

        Ok(ProviderResponse {
            text: parsed.response,
            model: parsed.model,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn is_transient(error: &ProviderError) -> bool {
        matches!(
            error,
            ProviderError::Timeout(_)
                | ProviderError::Overloaded(_)
                | ProviderError::Communication(_)
        )
    }
}

impl ExtractionProvider for OllamaProvider {
    type Error = ProviderError;

    async fn generate(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<ProviderResponse, Self::Error> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            debug!(
                "Extraction request attempt {}/{} ({} chars)",
                attempt,
                self.max_attempts,
                prompt.len()
            );

            match self.call_once(system_prompt, prompt).await {
                Ok(response) => {
                    debug!(
                        "Extraction response: {} chars in {}ms",
                        response.text.len(),
                        response.duration_ms
                    );
                    return Ok(response);
                }
                Err(e) if Self::is_transient(&e) && attempt < self.max_attempts => {
                    warn!("Transient extraction failure, retrying: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Communication("Retry budget exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "gemma3:4b").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "gemma3:4b");
        assert_eq!(provider.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_attempt_budget_floor() {
        let provider = OllamaProvider::default_endpoint("gemma3:4b")
            .unwrap()
            .with_max_attempts(0);
        assert_eq!(provider.max_attempts, 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(OllamaProvider::is_transient(&ProviderError::Timeout(180)));
        assert!(OllamaProvider::is_transient(&ProviderError::Overloaded(503)));
        assert!(OllamaProvider::is_transient(&ProviderError::Communication(
            "connect refused".to_string()
        )));
        assert!(!OllamaProvider::is_transient(
            &ProviderError::ModelNotAvailable("m".to_string())
        ));
        assert!(!OllamaProvider::is_transient(&ProviderError::InvalidResponse(
            "bad body".to_string()
        )));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        let provider = OllamaProvider::new("http://127.0.0.1:1", "gemma3:4b")
            .unwrap()
            .with_max_attempts(1);

        let result = provider.generate("sys", "prompt").await;
        assert!(result.is_err());
    }
}
