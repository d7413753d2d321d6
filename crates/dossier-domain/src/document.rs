//! Documents and their declared kinds

use crate::sector::Sector;
use serde::{Deserialize, Serialize};

/// The recognized document kinds, in decreasing trust order
///
/// The variants mirror the source system's declared type labels. A document
/// that arrives with no declared type is always treated as the cover letter —
/// the intake system only omits the type for the applicant's own petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// The applicant's petition; seeds ground truth, excluded from the merge
    CoverLetter,
    /// University diploma listing (most trusted source)
    Diploma,
    /// Curriculum vitae
    Cv,
    /// Social-security service record (fixed tabular layout)
    ServiceRecord,
    /// Ministry service record, same layout family as [`Self::ServiceRecord`]
    MinistryRecord,
    /// Criminal-record certificate
    CriminalRecord,
    /// Project/publication dossier
    ProjectDossier,
    /// Sector employment certificate for one industrial sector
    SectorCertificate(Sector),
    /// Anything unrecognized
    Other,
}

impl DocumentKind {
    /// Position in the fixed trust order; lower wins ties during the merge
    pub fn trust_rank(&self) -> u8 {
        match self {
            DocumentKind::CoverLetter => 0,
            DocumentKind::Diploma => 1,
            DocumentKind::Cv => 2,
            DocumentKind::ServiceRecord => 3,
            DocumentKind::MinistryRecord => 4,
            DocumentKind::CriminalRecord => 5,
            DocumentKind::ProjectDossier => 6,
            DocumentKind::SectorCertificate(_) => 7,
            DocumentKind::Other => 8,
        }
    }

    /// Estimate the kind from the source system's declared label
    ///
    /// An explicit label is trusted as-is; a missing label means cover letter.
    pub fn estimate(declared: Option<&str>) -> DocumentKind {
        let Some(label) = declared else {
            return DocumentKind::CoverLetter;
        };
        let lower = label.to_lowercase();

        if lower.contains("üst yazı") || lower.contains("dilekçe") || lower.contains("cover") {
            DocumentKind::CoverLetter
        } else if lower.contains("diploma") {
            DocumentKind::Diploma
        } else if lower.contains("özgeçmiş") || lower.contains("cv") {
            DocumentKind::Cv
        } else if lower.contains("sgk") {
            DocumentKind::ServiceRecord
        } else if lower.contains("hitap") {
            DocumentKind::MinistryRecord
        } else if lower.contains("adli sicil") || lower.contains("criminal") {
            DocumentKind::CriminalRecord
        } else if lower.contains("proje") || lower.contains("project") {
            DocumentKind::ProjectDossier
        } else if let Some(sector) = Sector::from_certificate_label(&lower) {
            DocumentKind::SectorCertificate(sector)
        } else {
            DocumentKind::Other
        }
    }

    /// Stable label used in provenance and conflict maps
    pub fn label(&self) -> String {
        match self {
            DocumentKind::CoverLetter => "CoverLetter".to_string(),
            DocumentKind::Diploma => "Diploma".to_string(),
            DocumentKind::Cv => "CV".to_string(),
            DocumentKind::ServiceRecord => "ServiceRecord".to_string(),
            DocumentKind::MinistryRecord => "MinistryRecord".to_string(),
            DocumentKind::CriminalRecord => "CriminalRecord".to_string(),
            DocumentKind::ProjectDossier => "ProjectDossier".to_string(),
            DocumentKind::SectorCertificate(s) => format!("SectorCertificate:{}", s.name()),
            DocumentKind::Other => "Other".to_string(),
        }
    }
}

/// Per-document analysis status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    /// Not yet touched
    Pending,
    /// Currently being analyzed
    Analyzing,
    /// Analysis produced a usable result
    Done,
    /// Analysis failed; the note on the document says why
    Failed,
}

/// One uploaded file belonging to an application
///
/// Created at intake and consumed read-only by the analyzers; only the
/// status/note pair is written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source-system document id
    pub id: i64,

    /// Owning application id
    pub application_id: i64,

    /// Declared type label from the source system, if any
    pub declared_kind: Option<String>,

    /// Original filename
    pub file_name: String,

    /// Raw binary content, base64-encoded as delivered
    pub content_base64: String,

    /// File extension, if known
    pub extension: Option<String>,

    /// Text extracted upstream (OCR/text layer), when available
    pub text: Option<String>,

    /// Analysis status
    pub status: AnalysisStatus,

    /// Status note (rejection reason, fallback warnings)
    pub note: Option<String>,
}

impl Document {
    /// Final kind for this document per the estimation rule
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::estimate(self.declared_kind.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_label_is_cover_letter() {
        assert_eq!(DocumentKind::estimate(None), DocumentKind::CoverLetter);
    }

    #[test]
    fn test_declared_labels_map_to_kinds() {
        assert_eq!(
            DocumentKind::estimate(Some("Yök Lisans Diploması")),
            DocumentKind::Diploma
        );
        assert_eq!(DocumentKind::estimate(Some("Özgeçmiş/CV")), DocumentKind::Cv);
        assert_eq!(
            DocumentKind::estimate(Some("SGK Hizmet Dökümü")),
            DocumentKind::ServiceRecord
        );
        assert_eq!(
            DocumentKind::estimate(Some("Hitap Hizmet Dökümü")),
            DocumentKind::MinistryRecord
        );
        assert_eq!(
            DocumentKind::estimate(Some("Adli Sicil Kaydı")),
            DocumentKind::CriminalRecord
        );
        assert_eq!(
            DocumentKind::estimate(Some("Proje Dosyası (1)")),
            DocumentKind::ProjectDossier
        );
        assert_eq!(
            DocumentKind::estimate(Some("Enerji Üretimi")),
            DocumentKind::SectorCertificate(Sector::Energy)
        );
        assert_eq!(DocumentKind::estimate(Some("Fotoğraf")), DocumentKind::Other);
    }

    #[test]
    fn test_trust_order_is_strict() {
        let order = [
            DocumentKind::Diploma,
            DocumentKind::Cv,
            DocumentKind::ServiceRecord,
            DocumentKind::MinistryRecord,
            DocumentKind::CriminalRecord,
            DocumentKind::ProjectDossier,
            DocumentKind::SectorCertificate(Sector::Energy),
            DocumentKind::Other,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].trust_rank() < pair[1].trust_rank());
        }
    }
}
