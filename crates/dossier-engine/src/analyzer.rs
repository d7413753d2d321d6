//! Per-document-kind analysis
//!
//! Wires each document kind to its extraction pathway: the service record
//! goes through the tabular parser (with an extraction-service fallback),
//! sector certificates process only their leading segment, diplomas get
//! highest-degree post-processing, everything else is plain extraction.

use crate::error::EngineError;
use dossier_domain::{
    DocumentKind, EducationLevel, FieldMap, FieldValue, Sector, SegmentRecord,
};
use dossier_domain::traits::ExtractionProvider;
use dossier_extractor::{
    DocumentExtraction, ExtractionClient, ExtractorConfig, SegmentPolicy,
};
use dossier_tabular::ServiceRecordParser;
use chrono::{Datelike, Utc};
use std::time::Instant;
use tracing::{info, warn};

/// Result of analyzing one document
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    /// Document analyzed
    pub document_id: i64,

    /// Kind it was analyzed as
    pub kind: DocumentKind,

    /// Extracted fields (empty on failure)
    pub fields: FieldMap,

    /// Accepted per-segment results, for audit
    pub segments: Vec<SegmentRecord>,

    /// Advisory plausibility warnings
    pub warnings: Vec<String>,

    /// Analysis duration, milliseconds
    pub duration_ms: u64,

    /// Whether a usable result was produced
    pub success: bool,

    /// Failure reason or advisory note
    pub note: Option<String>,
}

/// Analyzes one document according to its kind
pub struct Analyzer<P: ExtractionProvider> {
    client: ExtractionClient<P>,
    tabular: ServiceRecordParser,
}

impl<P: ExtractionProvider> Analyzer<P> {
    /// Create an analyzer owning the extraction client
    pub fn new(provider: P, config: ExtractorConfig) -> Result<Self, EngineError> {
        Ok(Self {
            client: ExtractionClient::new(provider, config)?,
            tabular: ServiceRecordParser::new(),
        })
    }

    /// Analyze one document's text
    ///
    /// Never fails the application: any problem comes back as an
    /// unsuccessful analysis with a captured note.
    pub async fn analyze(
        &self,
        document_id: i64,
        kind: DocumentKind,
        text: &str,
    ) -> DocumentAnalysis {
        let started = Instant::now();

        let outcome = match kind {
            DocumentKind::ServiceRecord | DocumentKind::MinistryRecord => {
                self.analyze_service_record(kind, text).await
            }
            DocumentKind::SectorCertificate(sector) => {
                self.analyze_sector_certificate(kind, sector, text).await
            }
            DocumentKind::Diploma => self.analyze_diploma(kind, text).await,
            _ => self.extract_plain(kind, text, SegmentPolicy::All).await,
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((fields, segments, mut note)) => {
                let success = !fields.is_empty();
                if !success && note.is_none() {
                    note = Some("No segment produced a usable result".to_string());
                }
                let warnings = plausibility_warnings(&fields);

                DocumentAnalysis {
                    document_id,
                    kind,
                    segments: segments
                        .into_iter()
                        .map(|s| SegmentRecord {
                            document_id,
                            index: s.index,
                            start: s.start,
                            end: s.end,
                            fields: s.fields,
                            model: s.model,
                            duration_ms: s.duration_ms,
                        })
                        .collect(),
                    fields,
                    warnings,
                    duration_ms,
                    success,
                    note,
                }
            }
            Err(e) => DocumentAnalysis {
                document_id,
                kind,
                fields: FieldMap::new(),
                segments: Vec::new(),
                warnings: Vec::new(),
                duration_ms,
                success: false,
                note: Some(e.to_string()),
            },
        }
    }

    async fn extract_plain(
        &self,
        kind: DocumentKind,
        text: &str,
        policy: SegmentPolicy,
    ) -> Result<AnalysisParts, EngineError> {
        let extraction = self.client.extract(&kind, text, policy).await?;
        Ok(split_extraction(extraction, None))
    }

    /// Tabular pathway with extraction-service fallback
    async fn analyze_service_record(
        &self,
        kind: DocumentKind,
        text: &str,
    ) -> Result<AnalysisParts, EngineError> {
        match self.tabular.parse(text) {
            Ok(record) => {
                info!(
                    "{} parsed tabularly: {}y {}m",
                    kind.label(),
                    record.totals.total_years,
                    record.totals.total_months
                );
                Ok((record.to_field_map(), Vec::new(), None))
            }
            Err(e) => {
                warn!(
                    "{} tabular parse failed ({}), falling back to the extraction service; \
                     fallback output is unreliable and needs manual review",
                    kind.label(),
                    e
                );
                let extraction = self.client.extract(&kind, text, SegmentPolicy::All).await?;
                Ok(split_extraction(
                    extraction,
                    Some(format!(
                        "Tabular parse failed ({}); extraction-service fallback used, manual review advised",
                        e
                    )),
                ))
            }
        }
    }

    /// Sector certificates: leading segment only, duration mapped onto the
    /// certificate's sector
    async fn analyze_sector_certificate(
        &self,
        kind: DocumentKind,
        sector: Sector,
        text: &str,
    ) -> Result<AnalysisParts, EngineError> {
        let extraction = self
            .client
            .extract(&kind, text, SegmentPolicy::LeadingOnly)
            .await?;
        let (mut fields, segments, note) = split_extraction(extraction, None);

        if let Some(years) = fields.get("duration_years").and_then(|v| v.as_i64()) {
            fields.insert(
                sector.experience_field().to_string(),
                FieldValue::Int(years),
            );
        }

        Ok((fields, segments, note))
    }

    /// Diplomas: select the highest academic degree among the entries
    async fn analyze_diploma(
        &self,
        kind: DocumentKind,
        text: &str,
    ) -> Result<AnalysisParts, EngineError> {
        let extraction = self.client.extract(&kind, text, SegmentPolicy::All).await?;
        let (mut fields, segments, note) = split_extraction(extraction, None);
        select_highest_degree(&mut fields);
        Ok((fields, segments, note))
    }
}

type AnalysisParts = (
    FieldMap,
    Vec<dossier_extractor::SegmentResult>,
    Option<String>,
);

fn split_extraction(extraction: DocumentExtraction, note: Option<String>) -> AnalysisParts {
    let note = note.or_else(|| {
        if extraction.failures.is_empty() {
            None
        } else {
            Some(format!("{} segment(s) failed", extraction.failures.len()))
        }
    });
    (extraction.fields, extraction.segments, note)
}

/// Promote the highest-degree diploma entry to the top-level fields
fn select_highest_degree(fields: &mut FieldMap) {
    let Some(FieldValue::List(entries)) = fields.get("diplomas") else {
        return;
    };

    let best = entries
        .iter()
        .filter_map(|entry| match entry {
            FieldValue::Map(map) => {
                let program = map.get("program").and_then(|v| v.as_text()).unwrap_or("");
                Some((EducationLevel::infer(program), map.clone()))
            }
            _ => None,
        })
        .max_by_key(|(level, _)| *level);

    let Some((level, entry)) = best else {
        return;
    };

    fields.insert(
        "education_level".to_string(),
        FieldValue::Text(level.name().to_string()),
    );
    copy_text(&entry, "university", fields, "university");
    copy_text(&entry, "program", fields, "department");
    copy_text(&entry, "national_id", fields, "national_id");

    if let Some(year) = graduation_year_of(&entry) {
        fields.insert("graduation_year".to_string(), FieldValue::Int(year));
    }

    let first = entry.get("first_name").and_then(|v| v.as_text());
    let last = entry.get("last_name").and_then(|v| v.as_text());
    if let (Some(first), Some(last)) = (first, last) {
        fields.insert(
            "full_name".to_string(),
            FieldValue::Text(format!("{} {}", first, last)),
        );
    }
}

fn copy_text(from: &FieldMap, from_key: &str, to: &mut FieldMap, to_key: &str) {
    if let Some(value) = from.get(from_key).and_then(|v| v.as_text()) {
        if !value.is_empty() {
            to.insert(to_key.to_string(), FieldValue::Text(value.to_string()));
        }
    }
}

/// Graduation year from the entry's explicit field or its date's year part
fn graduation_year_of(entry: &FieldMap) -> Option<i64> {
    if let Some(year) = entry.get("graduation_year").and_then(|v| v.as_i64()) {
        return Some(year);
    }
    let date = entry.get("graduation_date").and_then(|v| v.as_text())?;
    date.rsplit(['/', '.', '-'])
        .next()
        .and_then(|part| part.parse::<i64>().ok())
        .filter(|year| *year >= 1000)
}

/// Advisory sanity checks on an analyzed field map
fn plausibility_warnings(fields: &FieldMap) -> Vec<String> {
    let mut warnings = Vec::new();

    let graduation = fields.get("graduation_year").and_then(|v| v.as_i64());
    let birth = fields.get("birth_year").and_then(|v| v.as_i64());

    if let (Some(graduation), Some(birth)) = (graduation, birth) {
        let age_at_graduation = graduation - birth;
        if age_at_graduation < 16 {
            warnings.push(format!(
                "Graduation at age {} is implausible",
                age_at_graduation
            ));
        } else if age_at_graduation > 40 {
            warnings.push(format!(
                "Graduation at age {} is unusual",
                age_at_graduation
            ));
        }
    }

    if let Some(graduation) = graduation {
        let max_experience = Utc::now().year() as i64 - graduation;
        for key in [
            "total_experience_years",
            "experience_energy",
            "experience_metal",
            "experience_mineral",
            "experience_chemistry",
            "experience_waste",
            "experience_other",
        ] {
            if let Some(years) = fields.get(key).and_then(|v| v.as_i64()) {
                if years > max_experience {
                    warnings.push(format!(
                        "{} of {} exceeds the {} years since graduation",
                        key, years, max_experience
                    ));
                }
            }
        }
    }

    warnings
}
