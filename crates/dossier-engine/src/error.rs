//! Error types for the reconciliation engine

use dossier_extractor::ExtractorError;
use thiserror::Error;

/// Errors that can fail a reconciliation run
///
/// Per-document problems (undecodable content, failed extraction, missing
/// table) are not in here — they degrade the run, they do not fail it.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Extraction client error (over-long input, bad configuration)
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Persistence error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
