//! Configuration for the extraction client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for chunking and extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Target segment size (characters)
    pub chunk_size: usize,

    /// Overlap carried into the next segment (characters)
    pub chunk_overlap: usize,

    /// Texts shorter than this become a single segment
    pub min_chunk_size: usize,

    /// Search window around a target boundary for a sentence terminator
    pub boundary_window: usize,

    /// Fallback search window for a whitespace cut
    pub whitespace_window: usize,

    /// Maximum time for a single segment extraction call (seconds)
    pub extraction_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be smaller than chunk_size".to_string());
        }
        if self.min_chunk_size > self.chunk_size {
            return Err("min_chunk_size cannot exceed chunk_size".to_string());
        }
        if self.chunk_size > self.max_text_length {
            return Err("chunk_size cannot exceed max_text_length".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 200_000,
            chunk_size: 4_000,
            chunk_overlap: 200,
            min_chunk_size: 500,
            boundary_window: 200,
            whitespace_window: 100,
            extraction_timeout_secs: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_stay_below_chunk_size() {
        let mut config = ExtractorConfig::default();
        config.chunk_overlap = config.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.chunk_size, parsed.chunk_size);
        assert_eq!(config.chunk_overlap, parsed.chunk_overlap);
        assert_eq!(config.extraction_timeout_secs, parsed.extraction_timeout_secs);
    }
}
