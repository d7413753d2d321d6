//! Field checks against ground truth

use crate::normalize::{normalize_compare, normalize_filename, similarity};
use dossier_domain::{DocumentListCheck, GroundTruth, Severity, ValidationFinding};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// Acceptance threshold for document-to-document name comparison
///
/// Legal names change between documents (marriage), so raw names from two
/// documents are compared by similarity rather than equality. Ground-truth
/// identity checks stay exact.
pub const NAME_SIMILARITY_THRESHOLD: f64 = 0.8;

/// One executed check, kept for the report whether it matched or not
#[derive(Debug, Clone)]
pub struct FieldCheck {
    /// Field that was checked
    pub field: String,
    /// Source of the checked value
    pub source: String,
    /// Whether the values agreed
    pub matched: bool,
    /// Severity the check ran at
    pub severity: Severity,
}

/// Summary of all checks for one application
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// False when any critical finding exists
    pub passed: bool,
    /// Number of critical findings
    pub critical_count: usize,
    /// Number of warning findings
    pub warning_count: usize,
    /// All findings
    pub findings: Vec<ValidationFinding>,
    /// All executed checks
    pub checks: Vec<FieldCheck>,
    /// Human-readable one-liner
    pub summary: String,
}

/// Checks extracted values against the cover letter's ground truth
pub struct CrossValidator {
    ground_truth: GroundTruth,
    findings: Vec<ValidationFinding>,
    checks: Vec<FieldCheck>,
}

impl CrossValidator {
    /// Create a validator for one application's ground truth
    pub fn new(ground_truth: GroundTruth) -> Self {
        Self {
            ground_truth,
            findings: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// The ground truth this validator compares against
    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    /// Check one extracted field against ground truth
    ///
    /// Absence on either side is a silent pass. Comparison is exact after
    /// normalization (uppercase, diacritic fold, collapsed whitespace).
    /// Returns false when a finding was recorded.
    pub fn check_field(
        &mut self,
        field: &str,
        value: Option<&str>,
        source: &str,
        severity: Severity,
    ) -> bool {
        self.check_field_against(field, value, source, severity, field)
    }

    /// Like [`Self::check_field`] with an explicit ground-truth key
    pub fn check_field_against(
        &mut self,
        field: &str,
        value: Option<&str>,
        source: &str,
        severity: Severity,
        ground_truth_key: &str,
    ) -> bool {
        let Some(expected) = self.ground_truth.get(ground_truth_key) else {
            debug!("No ground truth for '{}', check skipped", ground_truth_key);
            return true;
        };
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            debug!("'{}' absent in {}, check skipped", field, source);
            return true;
        };

        let matched = normalize_compare(value) == normalize_compare(expected);

        self.checks.push(FieldCheck {
            field: field.to_string(),
            source: source.to_string(),
            matched,
            severity,
        });

        if !matched {
            match severity {
                Severity::Critical => error!(
                    "Validation mismatch: {} — {}: '{}' ≠ cover letter: '{}'",
                    field, source, value, expected
                ),
                Severity::Warning => warn!(
                    "Validation warning: {} — {}: '{}' ≠ cover letter: '{}'",
                    field, source, value, expected
                ),
            }
            self.findings.push(ValidationFinding {
                field: field.to_string(),
                source: source.to_string(),
                value: value.to_string(),
                expected: expected.to_string(),
                severity,
            });
            return false;
        }

        true
    }

    /// Compare two raw names from different documents by similarity
    ///
    /// A ratio below [`NAME_SIMILARITY_THRESHOLD`] records a warning finding.
    pub fn check_name_pair(
        &mut self,
        name_a: &str,
        source_a: &str,
        name_b: &str,
        source_b: &str,
    ) -> bool {
        let ratio = similarity(name_a, name_b);
        let matched = ratio >= NAME_SIMILARITY_THRESHOLD;

        self.checks.push(FieldCheck {
            field: "full_name".to_string(),
            source: format!("{}/{}", source_a, source_b),
            matched,
            severity: Severity::Warning,
        });

        if !matched {
            warn!(
                "Name consistency warning: {}='{}' vs {}='{}' (ratio {:.2})",
                source_a, name_a, source_b, name_b, ratio
            );
            self.findings.push(ValidationFinding {
                field: "full_name".to_string(),
                source: source_a.to_string(),
                value: name_a.to_string(),
                expected: format!("{} ({})", name_b, source_b),
                severity: Severity::Warning,
            });
        }

        matched
    }

    /// Check the loaded filenames against the cover letter's declared list
    ///
    /// Declared-but-missing files are critical; loaded-but-undeclared files
    /// are warnings.
    pub fn check_document_list(&mut self, actual_files: &[String]) -> DocumentListCheck {
        let expected = &self.ground_truth.declared_files;

        let expected_by_norm: BTreeMap<String, &String> = expected
            .iter()
            .map(|f| (normalize_filename(f), f))
            .collect();
        let actual_by_norm: BTreeMap<String, &String> = actual_files
            .iter()
            .map(|f| (normalize_filename(f), f))
            .collect();

        let missing: Vec<String> = expected_by_norm
            .iter()
            .filter(|(norm, _)| !actual_by_norm.contains_key(*norm))
            .map(|(_, original)| (*original).clone())
            .collect();
        let extra: Vec<String> = actual_by_norm
            .iter()
            .filter(|(norm, _)| !expected_by_norm.contains_key(*norm))
            .map(|(_, original)| (*original).clone())
            .collect();

        if !missing.is_empty() {
            error!("Missing declared documents ({}): {:?}", missing.len(), missing);
            self.findings.push(ValidationFinding {
                field: "document_list".to_string(),
                source: "CoverLetter".to_string(),
                value: missing.join(", "),
                expected: "declared attachment present among loaded documents".to_string(),
                severity: Severity::Critical,
            });
        }
        if !extra.is_empty() {
            warn!("Undeclared documents ({}): {:?}", extra.len(), extra);
            self.findings.push(ValidationFinding {
                field: "document_list".to_string(),
                source: "CoverLetter".to_string(),
                value: extra.join(", "),
                expected: "document declared in the cover letter".to_string(),
                severity: Severity::Warning,
            });
        }

        DocumentListCheck {
            expected_count: expected.len(),
            actual_count: actual_files.len(),
            matches: missing.is_empty() && extra.is_empty(),
            missing,
            extra,
        }
    }

    /// Findings recorded so far
    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// Build the final report, consuming the validator
    pub fn into_report(self) -> ValidationReport {
        let critical_count = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        let warning_count = self.findings.len() - critical_count;
        let passed = critical_count == 0;

        let total = self.checks.len();
        let matched = self.checks.iter().filter(|c| c.matched).count();
        let summary = if passed {
            format!(
                "Validation passed: {}/{} checks matched ({} warnings)",
                matched, total, warning_count
            )
        } else {
            format!(
                "Validation failed: {} critical findings, {} warnings",
                critical_count, warning_count
            )
        };

        ValidationReport {
            passed,
            critical_count,
            warning_count,
            findings: self.findings,
            checks: self.checks,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_truth() -> GroundTruth {
        GroundTruth {
            full_name: "ALI VELI".to_string(),
            national_id: Some("12345678901".to_string()),
            address: None,
            email: Some("ali@example.com".to_string()),
            phone: None,
            submitted_at: None,
            subject: None,
            declared_files: vec![
                "Diploma LisansOnlisans.pdf".to_string(),
                "SGK Hizmet Dokumu.pdf".to_string(),
            ],
        }
    }

    #[test]
    fn test_diacritic_difference_passes() {
        let mut v = CrossValidator::new(ground_truth());
        assert!(v.check_field("full_name", Some("ALİ VELİ"), "Diploma", Severity::Warning));
        assert!(v.findings().is_empty());
    }

    #[test]
    fn test_mismatch_records_exactly_one_finding() {
        let mut v = CrossValidator::new(ground_truth());
        assert!(!v.check_field("full_name", Some("AYŞE FATMA"), "Diploma", Severity::Warning));

        assert_eq!(v.findings().len(), 1);
        let finding = &v.findings()[0];
        assert_eq!(finding.field, "full_name");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.value, "AYŞE FATMA");
    }

    #[test]
    fn test_national_id_check_is_exact() {
        let mut v = CrossValidator::new(ground_truth());
        assert!(v.check_field("national_id", Some("12345678901"), "CV", Severity::Critical));
        assert!(!v.check_field("national_id", Some("12345678900"), "CV", Severity::Critical));
        assert_eq!(v.findings()[0].severity, Severity::Critical);
    }

    #[test]
    fn test_absent_value_is_a_silent_pass() {
        let mut v = CrossValidator::new(ground_truth());
        assert!(v.check_field("full_name", None, "CV", Severity::Critical));
        assert!(v.check_field("full_name", Some(""), "CV", Severity::Critical));
        // No ground truth for this key either way.
        assert!(v.check_field("phone", Some("05321112233"), "CV", Severity::Warning));
        assert!(v.findings().is_empty());
    }

    #[test]
    fn test_document_list_differences() {
        let mut v = CrossValidator::new(ground_truth());
        let check = v.check_document_list(&[
            "diploma lisansonlisans.pdf".to_string(),
            "ozgecmis.pdf".to_string(),
        ]);

        assert!(!check.matches);
        assert_eq!(check.missing, vec!["SGK Hizmet Dokumu.pdf"]);
        assert_eq!(check.extra, vec!["ozgecmis.pdf"]);

        let report = v.into_report();
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.warning_count, 1);
        assert!(!report.passed);
    }

    #[test]
    fn test_complete_document_list_matches() {
        let mut v = CrossValidator::new(ground_truth());
        let check = v.check_document_list(&[
            "Diploma LisansOnlisans.pdf".to_string(),
            "SGK Hizmet Dokumu.pdf".to_string(),
        ]);
        assert!(check.matches);
        assert!(v.findings().is_empty());
    }

    #[test]
    fn test_name_pair_similarity() {
        let mut v = CrossValidator::new(ground_truth());

        // Diacritic-only difference: identical after folding.
        assert!(v.check_name_pair("MEHMET ALİ ÖZ", "Diploma", "MEHMET ALI OZ", "CV"));
        // Different person: below threshold, one warning.
        assert!(!v.check_name_pair("ALI VELI", "Diploma", "AYŞE FATMA", "CV"));
        assert_eq!(v.findings().len(), 1);
        assert_eq!(v.findings()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_report_summary() {
        let mut v = CrossValidator::new(ground_truth());
        v.check_field("full_name", Some("ALI VELI"), "CV", Severity::Warning);
        let report = v.into_report();

        assert!(report.passed);
        assert!(report.summary.contains("1/1"));
    }
}
