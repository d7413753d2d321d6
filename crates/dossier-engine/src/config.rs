//! Configuration for the reconciliation engine

use dossier_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the reconciliation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum accepted document size (bytes)
    pub max_file_bytes: usize,

    /// Minimum accepted document size; tiny files are almost never real
    /// documents
    pub min_file_bytes: usize,

    /// Extraction client configuration
    pub extractor: ExtractorConfig,
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_file_bytes >= self.max_file_bytes {
            return Err("min_file_bytes must be smaller than max_file_bytes".to_string());
        }
        self.extractor.validate()
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

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 50 * 1024 * 1024,
            min_file_bytes: 100,
            extractor: ExtractorConfig::default(),
        }
    }
}
