//! Merged records, provenance, and reconciliation run output

use crate::document::DocumentKind;
use crate::finding::{DocumentListCheck, ValidationFinding};
use crate::value::{FieldMap, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for one reconciliation run, based on UUIDv7
///
/// Chronologically sortable, so the audit trail orders itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Raw value, primarily for storage layers
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// How a winning value was chosen when several document types contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Walk the trust order, take the first type that has a value
    Priority,
    /// Take the largest numeric value
    Max,
    /// Boolean OR; true wins
    Or,
    /// Take the first value encountered in trust order (default)
    First,
}

/// One reconciled field with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedField {
    /// The winning value
    pub value: FieldValue,

    /// Document kind that contributed the winning value
    pub source: DocumentKind,

    /// Strategy that selected it
    pub strategy: MergeStrategy,

    /// All contributing values keyed by source label, present only when the
    /// sources disagreed
    pub conflicts: Option<BTreeMap<String, FieldValue>>,
}

/// The application's canonical extracted facts
///
/// Rebuilt from scratch on every reconciliation run — never updated
/// incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Reconciled fields keyed by field name
    pub fields: BTreeMap<String, MergedField>,
}

impl MergedRecord {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Winning value for a field, if present
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).map(|f| &f.value)
    }

    /// Insert a reconciled field
    pub fn insert(&mut self, field: impl Into<String>, merged: MergedField) {
        self.fields.insert(field.into(), merged);
    }

    /// Remove a field entirely (used by the normalizer when a value cannot
    /// be repaired)
    pub fn remove(&mut self, field: &str) -> Option<MergedField> {
        self.fields.remove(field)
    }

    /// The conflict map: every field where sources disagreed, with all
    /// contributing values keyed by source label
    pub fn conflicts(&self) -> BTreeMap<String, BTreeMap<String, FieldValue>> {
        self.fields
            .iter()
            .filter_map(|(name, f)| f.conflicts.clone().map(|c| (name.clone(), c)))
            .collect()
    }

    /// The provenance map: field name → winning source label
    pub fn provenance(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(name, f)| (name.clone(), f.source.label()))
            .collect()
    }
}

/// One accepted per-segment extraction result, retained for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Document the segment came from
    pub document_id: i64,

    /// Segment index within the document
    pub index: usize,

    /// Segment start offset in the source text (bytes)
    pub start: usize,

    /// Segment end offset (exclusive)
    pub end: usize,

    /// Fields the extraction service returned for this segment
    pub fields: FieldMap,

    /// Service model identifier, when reported
    pub model: Option<String>,

    /// Wall-clock duration of the extraction call, milliseconds
    pub duration_ms: u64,
}

/// Per-document analysis audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisAudit {
    /// Document analyzed
    pub document_id: i64,

    /// Kind label at analysis time
    pub kind: String,

    /// Number of segments processed (1 for unsegmented pathways)
    pub segment_count: usize,

    /// Total analysis duration, milliseconds
    pub duration_ms: u64,

    /// Whether a usable result was produced
    pub success: bool,

    /// Failure reason or advisory note
    pub note: Option<String>,
}

/// Pipeline phase reached by a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RunPhase {
    /// Application and documents loaded
    Loaded,
    /// Document kinds estimated
    TypeEstimated,
    /// Per-document analysis in progress
    Analyzing,
    /// Same-type / cross-type merge in progress
    Merging,
    /// Post-merge normalization applied
    Normalized,
    /// Outcome persisted
    Persisted,
    /// Terminal failure; the outcome carries the captured message
    Failed,
}

/// Everything one reconciliation run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Run identifier
    pub run_id: RunId,

    /// Application processed
    pub application_id: i64,

    /// Phase the run reached
    pub phase: RunPhase,

    /// The reconciled record (empty on failure)
    pub record: MergedRecord,

    /// Cross-validation findings gathered during the run
    pub findings: Vec<ValidationFinding>,

    /// Cover-letter document-list check, when ground truth existed
    pub document_list: Option<DocumentListCheck>,

    /// Accepted per-segment results keyed by (document, segment index)
    pub segments: Vec<SegmentRecord>,

    /// Per-document analysis audit entries
    pub audits: Vec<AnalysisAudit>,

    /// Required document kinds that were not among the loaded documents
    pub missing_required: Vec<String>,

    /// Physical document that won each field during same-kind merging,
    /// keyed by field name
    pub document_provenance: BTreeMap<String, i64>,

    /// Advisory plausibility warnings from the analyzers
    pub warnings: Vec<String>,

    /// Total run duration, milliseconds
    pub duration_ms: u64,

    /// Captured message when `phase` is [`RunPhase::Failed`]
    pub failure_message: Option<String>,
}
