//! Document content validation at intake
//!
//! Decodes the base64 payload, gates on size, and spills the bytes to a
//! temporary artifact for downstream consumers (OCR handoff). The artifact
//! is scoped to one document's processing: dropping [`DecodedContent`]
//! deletes it, so cleanup happens on every exit path.

use crate::config::EngineConfig;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dossier_domain::Document;
use std::io::Write;
use tempfile::NamedTempFile;

/// Decoded document bytes backed by a self-deleting temp file
#[derive(Debug)]
pub struct DecodedContent {
    /// Decoded size in bytes
    pub byte_len: usize,

    /// Temp artifact holding the decoded bytes; deleted on drop
    pub artifact: NamedTempFile,
}

/// Validate and decode one document's content
///
/// Returns the rejection reason on failure — intake rejections are recorded
/// on the document, they never fail the application.
pub fn validate_content(
    document: &Document,
    config: &EngineConfig,
) -> Result<DecodedContent, String> {
    if document.content_base64.is_empty() {
        return Err("Document content is empty".to_string());
    }

    let bytes = BASE64
        .decode(document.content_base64.trim())
        .map_err(|e| format!("Base64 decode failed: {}", e))?;

    if bytes.len() > config.max_file_bytes {
        return Err(format!(
            "File too large: {} bytes (max {})",
            bytes.len(),
            config.max_file_bytes
        ));
    }
    if bytes.len() < config.min_file_bytes {
        return Err(format!(
            "File too small: {} bytes, likely not a real document",
            bytes.len()
        ));
    }

    let mut artifact =
        NamedTempFile::new().map_err(|e| format!("Temp artifact creation failed: {}", e))?;
    artifact
        .write_all(&bytes)
        .map_err(|e| format!("Temp artifact write failed: {}", e))?;

    Ok(DecodedContent {
        byte_len: bytes.len(),
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::AnalysisStatus;

    fn document(content_base64: &str) -> Document {
        Document {
            id: 1,
            application_id: 1,
            declared_kind: Some("Özgeçmiş/CV".to_string()),
            file_name: "cv.pdf".to_string(),
            content_base64: content_base64.to_string(),
            extension: Some("pdf".to_string()),
            text: None,
            status: AnalysisStatus::Pending,
            note: None,
        }
    }

    #[test]
    fn test_valid_content_decodes() {
        let payload = BASE64.encode(vec![0u8; 500]);
        let decoded = validate_content(&document(&payload), &EngineConfig::default()).unwrap();

        assert_eq!(decoded.byte_len, 500);
        assert!(decoded.artifact.path().exists());
    }

    #[test]
    fn test_artifact_is_deleted_on_drop() {
        let payload = BASE64.encode(vec![0u8; 500]);
        let decoded = validate_content(&document(&payload), &EngineConfig::default()).unwrap();
        let path = decoded.artifact.path().to_path_buf();

        drop(decoded);
        assert!(!path.exists());
    }

    #[test]
    fn test_rejections_state_a_reason() {
        let config = EngineConfig::default();

        let err = validate_content(&document(""), &config).unwrap_err();
        assert!(err.contains("empty"));

        let err = validate_content(&document("not-base64!!!"), &config).unwrap_err();
        assert!(err.contains("Base64"));

        let tiny = BASE64.encode(vec![0u8; 10]);
        let err = validate_content(&document(&tiny), &config).unwrap_err();
        assert!(err.contains("too small"));

        let mut small_cap = config.clone();
        small_cap.max_file_bytes = 256;
        let big = BASE64.encode(vec![0u8; 512]);
        let err = validate_content(&document(&big), &small_cap).unwrap_err();
        assert!(err.contains("too large"));
    }
}
