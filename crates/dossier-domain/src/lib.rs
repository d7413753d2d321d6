//! Dossier Domain Layer
//!
//! Core data model for the application-dossier analysis pipeline. This crate
//! defines the value objects shared by every other layer — applications,
//! documents, extracted field maps, merged records with provenance, and
//! cross-validation findings — plus the trait seams behind which the
//! infrastructure layers (extraction service, persistence) live.
//!
//! ## Key Concepts
//!
//! - **Application**: one applicant's submission, the unit of processing
//! - **Document**: one uploaded file with a declared (nullable) kind
//! - **FieldValue**: tagged union for extracted facts, replacing free-form maps
//! - **MergedRecord**: the reconciled facts with per-field provenance and
//!   recorded conflicts
//! - **ValidationFinding**: a cross-document check result, never a verdict
//!
//! Humans make the final decision; nothing in this crate encodes an
//! accept/reject outcome.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod document;
pub mod education;
pub mod finding;
pub mod ground_truth;
pub mod record;
pub mod sector;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use application::{Application, ApplicationStatus, Seniority, ServiceCategory};
pub use document::{AnalysisStatus, Document, DocumentKind};
pub use education::EducationLevel;
pub use finding::{DocumentListCheck, Severity, ValidationFinding};
pub use ground_truth::GroundTruth;
pub use record::{
    AnalysisAudit, MergeStrategy, MergedField, MergedRecord, ReconciliationOutcome, RunId,
    RunPhase, SegmentRecord,
};
pub use sector::Sector;
pub use value::{FieldMap, FieldValue};
