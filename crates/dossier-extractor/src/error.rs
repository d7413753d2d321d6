//! Error types for the extraction client

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Provider error after its retry budget
    #[error("Provider error: {0}")]
    Provider(String),

    /// Input text exceeds the configured maximum
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Segment extraction exceeded the configured timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Response was parseable JSON but not the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Response body was not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
