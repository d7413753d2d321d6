//! Fixed-layout parsing of the service record text

use crate::error::TabularError;
use crate::types::{
    Employer, ExperienceTotals, InsuranceBranch, ServiceHeader, ServiceRecord, ServiceRow,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

// Row format, as printed by the issuing system:
//   4a 2016/03 2012045271701 1005766 15.03.2016 30 15.11.2016 Gıda Lab Elemanı
// Branch markers appear plain, parenthesized, or starred (internships).
static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)(\*?\(?\*?\)?4[ab])\s+(\d{4}/\d{2})\s+(\d+)\s+(\d+)\s+(?:(\d{2}\.\d{2}\.\d{4})\s+)?(\d+)(?:\s+(\d{2}\.\d{2}\.\d{4}))?[ \t]*(.*)$",
    )
    .expect("regex is compile-time constant")
});

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Ad\s+Soyad\s*[:\-]?\s*([A-ZÇĞİÖŞÜa-zçğıöşü\s]+?)(?:\s*\n|\s*Sicil|\s*T\.?C\.?|\s*Kimlik|$)")
        .expect("regex is compile-time constant")
});

static NAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-ZÇĞİÖŞÜa-zçğıöşü\s]+$").expect("regex is compile-time constant")
});

static NATIONAL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)T\.?C\.?\s*Kimlik\s*No\s*[:\-]?\s*(\d{11})")
        .expect("regex is compile-time constant")
});

static FIRST_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)İlk\s+İşe\s+Giriş\s+Tarihi\s*[:\-]?\s*(\d{2}\.\d{2}\.\d{4})")
        .expect("regex is compile-time constant")
});

static LAST_EXIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Son\s+İşten\s+Çıkış\s+Tarihi\s*[:\-]?\s*(\d{2}\.\d{2}\.\d{4})")
        .expect("regex is compile-time constant")
});

static PREMIUM_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Toplam\s+(?:Prim\s+)?(?:Gün\s+)?(?:Sayısı)?\s*[:\-]?\s*(\d+)")
        .expect("regex is compile-time constant")
});

static EMPLOYER_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)İşyeri\s+Listesi").expect("regex is compile-time constant")
});

static EMPLOYER_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{6,7})\s+([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ\s\.\-]+)")
        .expect("regex is compile-time constant")
});

const INTERNSHIP_KEYWORD: &str = "staj";

/// Parses the fixed service-record layout
#[derive(Debug, Default)]
pub struct ServiceRecordParser;

impl ServiceRecordParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a service record from extracted document text
    pub fn parse(&self, text: &str) -> Result<ServiceRecord, TabularError> {
        if text.len() < 100 {
            return Err(TabularError::TextTooShort(text.len()));
        }

        let header = self.parse_header(text);
        let rows = self.parse_rows(text);
        if rows.is_empty() {
            return Err(TabularError::TableNotFound);
        }
        debug!("Service table: {} rows", rows.len());

        let employers = self.parse_employers(text);
        let totals = ExperienceTotals::from_rows(&rows);

        info!(
            "Service record parsed: {}y {}m across {} rows, {} employers",
            totals.total_years,
            totals.total_months,
            rows.len(),
            employers.len()
        );

        Ok(ServiceRecord {
            header,
            rows,
            employers,
            totals,
        })
    }

    fn parse_header(&self, text: &str) -> ServiceHeader {
        let mut header = ServiceHeader::default();

        if let Some(captures) = NAME.captures(text) {
            let name = captures[1].trim().to_string();
            if name.chars().count() >= 3 && NAME_SHAPE.is_match(&name) {
                header.full_name = Some(name.to_uppercase());
            }
        }
        if let Some(captures) = NATIONAL_ID.captures(text) {
            header.national_id = Some(captures[1].to_string());
        }
        if let Some(captures) = FIRST_ENTRY.captures(text) {
            header.first_entry_date = Some(captures[1].to_string());
        }
        if let Some(captures) = LAST_EXIT.captures(text) {
            header.last_exit_date = Some(captures[1].to_string());
        }
        if let Some(captures) = PREMIUM_DAYS.captures(text) {
            header.declared_premium_days = captures[1].parse().ok();
        }

        header
    }

    fn parse_rows(&self, text: &str) -> Vec<ServiceRow> {
        let mut rows = Vec::new();

        for captures in ROW.captures_iter(text) {
            let raw_branch = &captures[1];
            let cleaned = raw_branch.replace(['(', ')', '*'], "");
            let branch = match cleaned.as_str() {
                "4a" => InsuranceBranch::Employed,
                "4b" => InsuranceBranch::SelfEmployed,
                _ => continue,
            };

            let role = captures
                .get(8)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            let internship =
                raw_branch.contains('*') || role.to_lowercase().contains(INTERNSHIP_KEYWORD);

            rows.push(ServiceRow {
                branch,
                period: captures[2].to_string(),
                registry_no: captures[3].to_string(),
                employer_no: captures[4].to_string(),
                start_date: captures.get(5).map(|m| m.as_str().to_string()),
                days: captures[6].parse().unwrap_or(0),
                end_date: captures.get(7).map(|m| m.as_str().to_string()),
                role,
                internship,
            });
        }

        rows
    }

    fn parse_employers(&self, text: &str) -> Vec<Employer> {
        let Some(section_start) = EMPLOYER_SECTION.find(text) else {
            return Vec::new();
        };

        let rest = &text[section_start.end()..];
        let section = match rest.find("\n\n") {
            Some(end) => &rest[..end],
            None => rest,
        };

        EMPLOYER_ROW
            .captures_iter(section)
            .map(|captures| Employer {
                number: captures[1].to_string(),
                name: captures[2].trim().to_string(),
            })
            .collect()
    }
}
