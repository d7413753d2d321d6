//! Dossier Reconciliation Engine
//!
//! Runs the full pipeline for one application: estimates document kinds,
//! parses the cover letter into ground truth, analyzes every document in the
//! fixed trust order, merges same-kind and cross-kind results under the
//! per-field strategy table, normalizes the merged record, and persists the
//! outcome with provenance, conflicts, findings, and an audit trail.
//!
//! ```text
//! loaded → type-estimated → analyzing → merging → normalized → persisted
//!                                 ↘ failed (message captured, never re-raised)
//! ```
//!
//! Processing is single-application-at-a-time; independent applications may
//! be scheduled concurrently since an application's own record is the only
//! unit of mutation.

#![warn(missing_docs)]

mod analyzer;
mod config;
mod engine;
mod error;
mod intake;
mod merge;
mod normalize;
mod quality;
mod requirements;
mod store;

pub use analyzer::{Analyzer, DocumentAnalysis};
pub use config::EngineConfig;
pub use engine::ReconciliationEngine;
pub use error::EngineError;
pub use intake::{validate_content, DecodedContent};
pub use merge::{merge_across_kinds, merge_same_kind, strategy_for, TypedResult};
pub use normalize::normalize_record;
pub use quality::{assess_text, TextQuality};
pub use requirements::missing_requirements;
pub use store::MemoryRecordStore;
