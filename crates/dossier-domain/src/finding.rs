//! Cross-validation findings

use serde::{Deserialize, Serialize};

/// How seriously a mismatch should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Flagged for human review only
    Warning,
    /// Blocks trust in the field; the application needs manual attention
    Critical,
}

/// One cross-document check result
///
/// Findings never block processing — they are annotations attached to the
/// output for the human reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Field that was checked
    pub field: String,

    /// Where the checked value came from (document kind label)
    pub source: String,

    /// The value under test
    pub value: String,

    /// The ground-truth value it was checked against
    pub expected: String,

    /// Severity requested by the caller
    pub severity: Severity,
}

/// Result of checking the loaded documents against the cover letter's list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentListCheck {
    /// Files declared in the cover letter (count)
    pub expected_count: usize,

    /// Files actually loaded (count)
    pub actual_count: usize,

    /// Declared but not loaded (critical)
    pub missing: Vec<String>,

    /// Loaded but not declared (warning)
    pub extra: Vec<String>,

    /// True when both difference sets are empty
    pub matches: bool,
}
