//! The reconciliation orchestrator

use crate::analyzer::Analyzer;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::intake::validate_content;
use crate::merge::{merge_across_kinds, merge_same_kind, TypedResult};
use crate::normalize::normalize_record;
use crate::quality::assess_text;
use crate::requirements::missing_requirements;
use dossier_domain::traits::{ExtractionProvider, RecordStore};
use dossier_domain::{
    AnalysisAudit, Application, ApplicationStatus, Document, DocumentKind, FieldMap,
    MergedRecord, ReconciliationOutcome, RunId, RunPhase, SegmentRecord, Severity,
};
use dossier_validator::{parse_cover_letter, CrossValidator};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs the whole pipeline for one application at a time
///
/// Documents are analyzed sequentially in trust order; the cover letter is
/// parsed first to seed ground truth and is excluded from the merge. Any
/// unhandled problem marks the application failed with a captured message —
/// it is never re-raised, and it never affects another application.
pub struct ReconciliationEngine<P: ExtractionProvider, S: RecordStore> {
    analyzer: Analyzer<P>,
    store: S,
    config: EngineConfig,
}

impl<P: ExtractionProvider, S: RecordStore> ReconciliationEngine<P, S> {
    /// Create an engine owning the provider and the store
    pub fn new(provider: P, store: S, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        let analyzer = Analyzer::new(provider, config.extractor.clone())?;
        Ok(Self {
            analyzer,
            store,
            config,
        })
    }

    /// The store, for inspection after runs
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one application end to end
    ///
    /// Always returns an outcome; a failed run carries the captured message
    /// and the `Failed` phase instead of propagating an error.
    pub async fn run(
        &mut self,
        application: &Application,
        documents: &[Document],
    ) -> ReconciliationOutcome {
        let run_id = RunId::new();
        let started = Instant::now();

        info!(
            "Reconciliation run {} started: application {} ({}), {} documents",
            run_id,
            application.id,
            application.tracking_no,
            documents.len()
        );
        self.set_status(application.id, ApplicationStatus::Processing, None);

        match self.run_inner(run_id, application, documents).await {
            Ok(mut outcome) => {
                outcome.duration_ms = started.elapsed().as_millis() as u64;
                match self.store.save_outcome(&outcome) {
                    Ok(()) => {
                        outcome.phase = RunPhase::Persisted;
                        self.set_status(application.id, ApplicationStatus::Done, None);
                        info!(
                            "Run {} complete: {} fields, {} findings, {}ms",
                            run_id,
                            outcome.record.fields.len(),
                            outcome.findings.len(),
                            outcome.duration_ms
                        );
                    }
                    Err(e) => {
                        let message = format!("Store error: {}", e);
                        error!("Run {} could not persist: {}", run_id, message);
                        outcome.phase = RunPhase::Failed;
                        outcome.failure_message = Some(message.clone());
                        self.set_status(application.id, ApplicationStatus::Failed, Some(&message));
                    }
                }
                outcome
            }
            Err(e) => {
                let message = e.to_string();
                error!("Run {} failed: {}", run_id, message);
                self.set_status(application.id, ApplicationStatus::Failed, Some(&message));

                ReconciliationOutcome {
                    run_id,
                    application_id: application.id,
                    phase: RunPhase::Failed,
                    record: MergedRecord::new(),
                    findings: Vec::new(),
                    document_list: None,
                    segments: Vec::new(),
                    audits: Vec::new(),
                    missing_required: Vec::new(),
                    document_provenance: BTreeMap::new(),
                    warnings: Vec::new(),
                    duration_ms: started.elapsed().as_millis() as u64,
                    failure_message: Some(message),
                }
            }
        }
    }

    async fn run_inner(
        &mut self,
        run_id: RunId,
        application: &Application,
        documents: &[Document],
    ) -> Result<ReconciliationOutcome, EngineError> {
        // Loaded → TypeEstimated
        let (category, seniority) = application.classify_service();
        debug!("Service classified: {:?} / {:?}", category, seniority);

        let mut typed: Vec<(&Document, DocumentKind)> =
            documents.iter().map(|d| (d, d.kind())).collect();
        let kinds: Vec<DocumentKind> = typed.iter().map(|(_, k)| *k).collect();
        let missing_required = missing_requirements(category, seniority, &kinds);
        if !missing_required.is_empty() {
            warn!("Missing required documents: {:?}", missing_required);
        }

        // Stable sort keeps intake order within a kind.
        typed.sort_by_key(|(_, kind)| kind.trust_rank());

        // Cover letter first: it seeds ground truth for every later check.
        let mut validator = self.build_validator(&typed);
        let document_list = validator
            .as_mut()
            .map(|v| v.check_document_list(&file_names(documents)));

        // Analyzing
        let mut audits: Vec<AnalysisAudit> = Vec::new();
        let mut segments: Vec<SegmentRecord> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut results_by_kind: BTreeMap<DocumentKind, Vec<TypedResult>> = BTreeMap::new();
        let mut seen_names: Vec<(String, String)> = Vec::new();

        for (document, kind) in &typed {
            if *kind == DocumentKind::CoverLetter {
                continue;
            }

            // Decoded bytes live in a temp artifact scoped to this document;
            // dropping at the end of the iteration deletes it on every path.
            let decoded = match validate_content(document, &self.config) {
                Ok(decoded) => decoded,
                Err(reason) => {
                    warn!("Document {} rejected at intake: {}", document.id, reason);
                    audits.push(failed_audit(document.id, kind, reason));
                    continue;
                }
            };
            debug!("Document {} decoded: {} bytes", document.id, decoded.byte_len);

            let Some(text) = document.text.as_deref().filter(|t| !t.trim().is_empty()) else {
                audits.push(failed_audit(
                    document.id,
                    kind,
                    "No extracted text available".to_string(),
                ));
                continue;
            };

            let quality = assess_text(text);
            if !quality.acceptable {
                warn!(
                    "Document {} text quality low: {} (confidence {:.2})",
                    document.id, quality.reason, quality.confidence
                );
                warnings.push(format!(
                    "Document {}: low text quality — {}",
                    document.id, quality.reason
                ));
            }

            let analysis = self.analyzer.analyze(document.id, *kind, text).await;

            audits.push(AnalysisAudit {
                document_id: document.id,
                kind: kind.label(),
                segment_count: analysis.segments.len().max(1),
                duration_ms: analysis.duration_ms,
                success: analysis.success,
                note: analysis.note.clone(),
            });

            if !analysis.success {
                warn!(
                    "Document {} analysis failed: {}",
                    document.id,
                    analysis.note.as_deref().unwrap_or("unknown")
                );
                continue;
            }

            if let Some(v) = validator.as_mut() {
                let label = kind.label();
                v.check_field(
                    "national_id",
                    field_text(&analysis.fields, "national_id"),
                    &label,
                    Severity::Critical,
                );
                v.check_field(
                    "full_name",
                    field_text(&analysis.fields, "full_name"),
                    &label,
                    Severity::Warning,
                );
                v.check_field(
                    "email",
                    field_text(&analysis.fields, "email"),
                    &label,
                    Severity::Warning,
                );
                v.check_field(
                    "phone",
                    field_text(&analysis.fields, "phone"),
                    &label,
                    Severity::Warning,
                );
            }
            if let Some(name) = field_text(&analysis.fields, "full_name") {
                seen_names.push((kind.label(), name.to_string()));
            }

            warnings.extend(
                analysis
                    .warnings
                    .iter()
                    .map(|w| format!("Document {}: {}", document.id, w)),
            );
            segments.extend(analysis.segments);
            results_by_kind
                .entry(*kind)
                .or_default()
                .push(TypedResult {
                    document_id: document.id,
                    fields: analysis.fields,
                });

            drop(decoded);
        }

        // Raw names across documents: similarity, not equality — legal names
        // change while still naming the same person.
        if let Some(v) = validator.as_mut() {
            for i in 0..seen_names.len() {
                for j in (i + 1)..seen_names.len() {
                    let (source_a, name_a) = &seen_names[i];
                    let (source_b, name_b) = &seen_names[j];
                    v.check_name_pair(name_a, source_a, name_b, source_b);
                }
            }
        }

        // Merging
        let mut by_kind: BTreeMap<DocumentKind, FieldMap> = BTreeMap::new();
        let mut document_provenance: BTreeMap<String, i64> = BTreeMap::new();
        for (kind, results) in &results_by_kind {
            let (merged, provenance) = merge_same_kind(*kind, results);
            by_kind.insert(*kind, merged);
            document_provenance.extend(provenance);
        }
        let mut record = merge_across_kinds(&by_kind);

        // Normalized
        let ground_truth = validator.as_ref().map(|v| v.ground_truth().clone());
        normalize_record(&mut record, &by_kind, ground_truth.as_ref(), &mut warnings);

        let findings = match validator {
            Some(v) => {
                let report = v.into_report();
                info!("{}", report.summary);
                report.findings
            }
            None => Vec::new(),
        };

        Ok(ReconciliationOutcome {
            run_id,
            application_id: application.id,
            phase: RunPhase::Normalized,
            record,
            findings,
            document_list,
            segments,
            audits,
            missing_required,
            document_provenance,
            warnings,
            duration_ms: 0,
            failure_message: None,
        })
    }

    /// Parse the first cover letter into a validator, when possible
    fn build_validator(&self, typed: &[(&Document, DocumentKind)]) -> Option<CrossValidator> {
        let (cover, _) = typed
            .iter()
            .find(|(_, kind)| *kind == DocumentKind::CoverLetter)?;

        let Some(text) = cover.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            warn!("Cover letter {} has no extracted text", cover.id);
            return None;
        };

        match parse_cover_letter(text) {
            Some(ground_truth) => {
                info!(
                    "Ground truth from cover letter {}: {} ({} declared files)",
                    cover.id,
                    ground_truth.full_name,
                    ground_truth.declared_files.len()
                );
                Some(CrossValidator::new(ground_truth))
            }
            None => {
                // Not an error: cross-validation is simply skipped.
                warn!("Cover letter {} yielded no usable ground truth", cover.id);
                None
            }
        }
    }

    fn set_status(&mut self, application_id: i64, status: ApplicationStatus, message: Option<&str>) {
        if let Err(e) = self.store.update_status(application_id, status, message) {
            error!("Status update failed for application {}: {}", application_id, e);
        }
    }
}

fn file_names(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.file_name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

fn failed_audit(document_id: i64, kind: &DocumentKind, reason: String) -> AnalysisAudit {
    AnalysisAudit {
        document_id,
        kind: kind.label(),
        segment_count: 0,
        duration_ms: 0,
        success: false,
        note: Some(reason),
    }
}

fn field_text<'a>(fields: &'a FieldMap, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(|v| v.as_text())
}
