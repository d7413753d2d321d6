//! Per-document extraction orchestration

use crate::chunking::Chunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::merge::merge_segment_maps;
use crate::parser::parse_response;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::schema::schema_for;
use dossier_domain::traits::ExtractionProvider;
use dossier_domain::{DocumentKind, FieldMap};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Which segments of a document to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPolicy {
    /// Process every segment (default)
    All,
    /// Process only the leading segment — sector certificates front-load
    /// their facts and the remainder is boilerplate the service tends to
    /// hallucinate over
    LeadingOnly,
}

/// One successful per-segment extraction
#[derive(Debug, Clone)]
pub struct SegmentResult {
    /// Segment index
    pub index: usize,
    /// Segment start offset (bytes)
    pub start: usize,
    /// Segment end offset (exclusive)
    pub end: usize,
    /// Fields the service returned
    pub fields: FieldMap,
    /// Service model identifier, when reported
    pub model: Option<String>,
    /// Call duration, milliseconds
    pub duration_ms: u64,
}

/// One failed per-segment attempt, recorded for audit
#[derive(Debug, Clone)]
pub struct SegmentFailure {
    /// Segment index
    pub index: usize,
    /// Why the segment produced nothing
    pub reason: String,
}

/// Result of extracting one document
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// Merged fields across all accepted segments
    pub fields: FieldMap,
    /// Accepted per-segment results
    pub segments: Vec<SegmentResult>,
    /// Failed segments (skipped, not fatal)
    pub failures: Vec<SegmentFailure>,
}

impl DocumentExtraction {
    /// True when no segment produced a usable result
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Invokes the external extraction service once per segment and merges the
/// results back into one field map per document
pub struct ExtractionClient<P: ExtractionProvider> {
    provider: Arc<P>,
    chunker: Chunker,
    config: ExtractorConfig,
}

impl<P: ExtractionProvider> ExtractionClient<P> {
    /// Create a client owning the given provider
    pub fn new(provider: P, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let chunker = Chunker::from_config(&config);
        Ok(Self {
            provider: Arc::new(provider),
            chunker,
            config,
        })
    }

    /// Extract structured fields from one document's text
    ///
    /// A failed segment is recorded and skipped; only an over-long input is
    /// an error. An extraction where every segment failed comes back with
    /// empty fields — the caller decides what that means for the document.
    pub async fn extract(
        &self,
        kind: &DocumentKind,
        text: &str,
        policy: SegmentPolicy,
    ) -> Result<DocumentExtraction, ExtractorError> {
        if text.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text.len(),
                self.config.max_text_length,
            ));
        }

        let schema = schema_for(kind);
        let mut segments = self.chunker.split(text);
        if policy == SegmentPolicy::LeadingOnly && segments.len() > 1 {
            info!(
                "{}: {} segments, processing only the first",
                kind.label(),
                segments.len()
            );
            segments.truncate(1);
        }

        debug!("{}: {} segment(s)", kind.label(), segments.len());

        let mut accepted = Vec::new();
        let mut failures = Vec::new();

        for segment in &segments {
            let prompt = build_prompt(&schema, &segment.text);

            let response = match timeout(
                self.config.extraction_timeout(),
                self.provider.generate(SYSTEM_PROMPT, &prompt),
            )
            .await
            {
                Err(_) => {
                    warn!("Segment {} timed out", segment.index);
                    failures.push(SegmentFailure {
                        index: segment.index,
                        reason: ExtractorError::Timeout.to_string(),
                    });
                    continue;
                }
                Ok(Err(e)) => {
                    warn!("Segment {} provider failure: {}", segment.index, e);
                    failures.push(SegmentFailure {
                        index: segment.index,
                        reason: format!("Provider error: {}", e),
                    });
                    continue;
                }
                Ok(Ok(response)) => response,
            };

            match parse_response(&response.text) {
                Ok(fields) => {
                    accepted.push(SegmentResult {
                        index: segment.index,
                        start: segment.start,
                        end: segment.end,
                        fields,
                        model: response.model,
                        duration_ms: response.duration_ms,
                    });
                }
                Err(e) => {
                    warn!("Segment {} response rejected: {}", segment.index, e);
                    failures.push(SegmentFailure {
                        index: segment.index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let fields = merge_segment_maps(accepted.iter().map(|s| s.fields.clone()).collect());

        info!(
            "{}: {} segment(s) accepted, {} failed",
            kind.label(),
            accepted.len(),
            failures.len()
        );

        Ok(DocumentExtraction {
            fields,
            segments: accepted,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_llm::MockProvider;

    fn client(provider: MockProvider) -> ExtractionClient<MockProvider> {
        ExtractionClient::new(provider, ExtractorConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_single_segment_extraction() {
        let provider = MockProvider::new(r#"{"graduation_year": 2015}"#);
        let client = client(provider);

        let result = client
            .extract(&DocumentKind::Cv, "short cv text", SegmentPolicy::All)
            .await
            .unwrap();

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.fields.get("graduation_year").unwrap().as_i64(), Some(2015));
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_segment_is_skipped_not_fatal() {
        let provider = MockProvider::new("not json at all");
        let client = client(provider);

        let result = client
            .extract(&DocumentKind::Cv, "short cv text", SegmentPolicy::All)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_recorded() {
        let mut provider = MockProvider::default();
        provider.add_error_containing("poison");
        let client = client(provider);

        let result = client
            .extract(&DocumentKind::Cv, "text with poison inside", SegmentPolicy::All)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(result.failures[0].reason.contains("Provider error"));
    }

    #[tokio::test]
    async fn test_text_too_long() {
        let client = client(MockProvider::default());
        let text = "a".repeat(300_000);

        let result = client
            .extract(&DocumentKind::Cv, &text, SegmentPolicy::All)
            .await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(_, _))));
    }

    #[tokio::test]
    async fn test_leading_only_processes_one_segment() {
        let provider = MockProvider::new(r#"{"duration_years": 3}"#);
        let client = client(provider.clone());

        // Long enough to produce several segments.
        let sentence = "The certificate attests employment at the plant. ";
        let text = sentence.repeat(300);

        let result = client
            .extract(
                &DocumentKind::SectorCertificate(dossier_domain::Sector::Energy),
                &text,
                SegmentPolicy::LeadingOnly,
            )
            .await
            .unwrap();

        assert_eq!(result.segments.len(), 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_multi_segment_results_merge() {
        let mut provider = MockProvider::default();
        // Different facts per segment; the merged map holds both.
        provider.add_response_containing("FIRST-HALF", r#"{"full_name": "ALİ VELİ"}"#);
        provider.add_response_containing("SECOND-HALF", r#"{"has_criminal_record": true}"#);

        let first = format!("FIRST-HALF {}", "Sentence one here. ".repeat(220));
        let text = format!("{} SECOND-HALF {}", first, "Sentence two here. ".repeat(220));

        let client = client(provider);
        let result = client
            .extract(&DocumentKind::Other, &text, SegmentPolicy::All)
            .await
            .unwrap();

        assert!(result.segments.len() > 1);
        assert_eq!(result.fields.get("full_name").unwrap().as_text(), Some("ALİ VELİ"));
        assert_eq!(
            result.fields.get("has_criminal_record").unwrap().as_bool(),
            Some(true)
        );
    }
}
