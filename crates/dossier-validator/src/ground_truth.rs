//! Ground-truth extraction from the cover letter
//!
//! The cover letter is the applicant's own petition: header fields plus a
//! numbered list of the attached documents. Field extraction is regex-based
//! over the fixed petition layout.

use dossier_domain::GroundTruth;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Başvuru\s+Yapan\s*[:\-]?\s*([A-ZÇĞİÖŞÜa-zçğıöşü\s]+?)(?:\s*\n|\s*T\.?C\.?|\s*Kimlik|\s*Adres|\s*GSM)",
        r"(?i)Ad[ıi]?\s*Soyad[ıi]?\s*[:\-]?\s*([A-ZÇĞİÖŞÜa-zçğıöşü\s]+?)(?:\s*\n|\s*T\.?C\.?|\s*Kimlik|\s*Adres|\s*GSM)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex is compile-time constant"))
    .collect()
});

static NAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-ZÇĞİÖŞÜa-zçğıöşü\s]+$").expect("regex is compile-time constant")
});

static NATIONAL_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)T\.?C\.?\s*Kimlik\s*(?:No|Numarası)\s*[:\-]?\s*(\d{11})",
        r"(?i)TC\s*[:\-]?\s*(\d{11})",
        r"(?i)Kimlik\s*No\s*[:\-]?\s*(\d{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex is compile-time constant"))
    .collect()
});

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:İkamet\s+)?Adres[i]?\s*[:\-]?\s*([^\n]+)")
        .expect("regex is compile-time constant")
});

static EMAIL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)E-?(?:Mail|Posta)\s*[:\-]?\s*([^\s\n]+@[^\s\n]+)",
        r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex is compile-time constant"))
    .collect()
});

static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)GSM\s*(?:No)?\s*[:\-]?\s*(\d{10,11})",
        r"(?i)Cep\s*(?:Tel|Telefon)?\s*[:\-]?\s*(\d{10,11})",
        r"(?i)Telefon\s*[:\-]?\s*(\d{10,11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex is compile-time constant"))
    .collect()
});

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Başvuru\s+)?Tarih[i]?\s*[:\-]?\s*(\d{2}[./]\d{2}[./]\d{4})")
        .expect("regex is compile-time constant")
});

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Başvuru\s+)?Konu(?:su)?\s*[:\-]?\s*([^\n]+)")
        .expect("regex is compile-time constant")
});

// "1-Yök Lisans Diploması-Diploma LisansOnlisans.pdf (*)"
static ATTACHMENT_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*[\-\.]\s*[^\-\n]+?\s*\-\s*([^\n]+?\.(?:pdf|jpg|jpeg|png|doc|docx))\s*\(\*\)")
        .expect("regex is compile-time constant")
});

// "1. Diploma LisansOnlisans.pdf"
static ATTACHMENT_SIMPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*[\.\)]\s*([^\n]+?\.(?:pdf|jpg|jpeg|png|doc|docx))")
        .expect("regex is compile-time constant")
});

/// Build ground truth from cover-letter text
///
/// Returns `None` when no usable applicant name can be found — that is the
/// "no ground truth" case, not an error.
pub fn parse_cover_letter(text: &str) -> Option<GroundTruth> {
    let full_name = extract_name(text)?;

    let national_id = first_capture(&NATIONAL_ID_PATTERNS, text);
    let declared_files = extract_attachments(text);

    info!(
        "Ground truth: {} ({}), {} declared attachments",
        full_name,
        national_id.as_deref().unwrap_or("no national id"),
        declared_files.len()
    );

    Some(GroundTruth {
        full_name,
        national_id,
        address: ADDRESS
            .captures(text)
            .map(|c| c[1].split_whitespace().collect::<Vec<_>>().join(" ")),
        email: first_capture(&EMAIL_PATTERNS, text),
        phone: first_capture(&PHONE_PATTERNS, text),
        submitted_at: DATE.captures(text).map(|c| c[1].to_string()),
        subject: SUBJECT.captures(text).map(|c| c[1].trim().to_string()).filter(|s| s.len() < 200),
        declared_files,
    })
}

fn extract_name(text: &str) -> Option<String> {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            let name = captures[1].trim().to_string();
            if name.chars().count() >= 3 && NAME_SHAPE.is_match(&name) {
                return Some(name.to_uppercase());
            }
        }
    }
    debug!("No usable applicant name in cover letter");
    None
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|p| p.captures(text).map(|c| c[1].trim().to_string()))
}

/// Extract the declared attachment filenames, in listed order
fn extract_attachments(text: &str) -> Vec<String> {
    let mut entries: Vec<(u32, String)> = ATTACHMENT_FULL
        .captures_iter(text)
        .filter_map(|c| {
            let order = c[1].parse().ok()?;
            Some((order, c[2].trim().to_string()))
        })
        .collect();

    if entries.is_empty() {
        entries = ATTACHMENT_SIMPLE
            .captures_iter(text)
            .filter_map(|c| {
                let order = c[1].parse().ok()?;
                Some((order, c[2].trim().to_string()))
            })
            .collect();
    }

    entries.sort_by_key(|(order, _)| *order);
    entries.into_iter().map(|(_, file)| file).collect()
}
