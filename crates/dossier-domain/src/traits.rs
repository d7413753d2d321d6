//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates (`dossier-llm`,
//! the deployment's persistence layer).

use crate::application::ApplicationStatus;
use crate::record::ReconciliationOutcome;

/// Response from one extraction-service call
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Raw response text (expected to be a single JSON object, possibly
    /// fenced — parsing leniency is the caller's job)
    pub text: String,

    /// Model identifier the service reported, if any
    pub model: Option<String>,

    /// Wall-clock duration of the call, milliseconds
    pub duration_ms: u64,
}

/// Trait for the external structured-extraction service
///
/// Implemented by the infrastructure layer (`dossier-llm`). Implementations
/// own their timeout and transient-retry policy; a returned error means the
/// retry budget is exhausted or the failure was not retryable.
pub trait ExtractionProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::fmt::Display + Send;

    /// Send one instruction/document pair to the service
    fn generate(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<ProviderResponse, Self::Error>> + Send;
}

/// Trait for persisting reconciliation output
///
/// The real implementation (relational schema, migrations) is outside this
/// repository; the engine ships an in-memory double for tests.
pub trait RecordStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Persist one run's outcome (record, provenance, conflicts, audit trail)
    fn save_outcome(&mut self, outcome: &ReconciliationOutcome) -> Result<(), Self::Error>;

    /// Update an application's processing status
    ///
    /// This is the last step of a single-threaded run and the only write
    /// that must be linearizable per application.
    fn update_status(
        &mut self,
        application_id: i64,
        status: ApplicationStatus,
        message: Option<&str>,
    ) -> Result<(), Self::Error>;
}
