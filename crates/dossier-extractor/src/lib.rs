//! Dossier Extractor
//!
//! Per-document extraction orchestration: splits long document text into
//! bounded, sentence-respecting segments, sends each segment to the external
//! structured-extraction service with a document-type-specific instruction,
//! repairs and parses the returned text, and merges the per-segment field
//! maps back into one record per document.
//!
//! # Architecture
//!
//! ```text
//! Text → Chunker → PromptBuilder → ExtractionProvider → Parser → merge → FieldMap
//! ```
//!
//! The social-security service record does NOT pass through this crate — its
//! fixed tabular layout is parsed directly by `dossier-tabular`.

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod merge;
mod parser;
mod prompt;
mod schema;

pub use chunking::{Chunker, Segment};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{
    DocumentExtraction, ExtractionClient, SegmentFailure, SegmentPolicy, SegmentResult,
};
pub use merge::merge_segment_maps;
pub use parser::parse_response;
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use schema::{schema_for, FieldKind, FieldSchema, FieldSpec};
