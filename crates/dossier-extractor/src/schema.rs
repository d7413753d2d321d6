//! Per-document-type target field schemas
//!
//! Each document kind maps to the set of fields the extraction service is
//! asked to fill. Field names here are the canonical merged-record keys —
//! the service is instructed to use them verbatim.

use dossier_domain::DocumentKind;

/// Value shape the service should produce for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number
    Integer,
    /// Free text
    Text,
    /// true/false
    Boolean,
    /// JSON array of objects
    List,
}

impl FieldKind {
    fn hint(&self) -> &'static str {
        match self {
            FieldKind::Integer => "number",
            FieldKind::Text => "string",
            FieldKind::Boolean => "true/false",
            FieldKind::List => "array",
        }
    }
}

/// One requested field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name
    pub name: &'static str,

    /// What the service should put there
    pub description: &'static str,

    /// Expected value shape
    pub kind: FieldKind,
}

/// The target schema for one document kind
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    /// Human-readable document label used in the instruction
    pub doc_label: &'static str,

    /// Requested fields
    pub fields: &'static [FieldSpec],
}

impl FieldSchema {
    /// Render the field list as instruction lines
    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in self.fields {
            out.push_str(&format!(
                "- {} ({}): {}\n",
                field.name,
                field.kind.hint(),
                field.description
            ));
        }
        out
    }
}

const DIPLOMA_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "diplomas",
        description: "one entry per graduation record; each entry has \
                      national_id, first_name, last_name, university (full \
                      official name, no abbreviation), faculty, program \
                      (keep parenthesized qualifiers), graduation_date \
                      (DD/MM/YYYY), diploma_no, grade (number)",
        kind: FieldKind::List,
    },
];

const CV_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "full_name",
        description: "applicant's full name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "national_id",
        description: "11-digit national identity number, when stated",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "university",
        description: "university of the highest completed degree",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "department",
        description: "department of the highest completed degree",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "graduation_year",
        description: "graduation year of the highest completed degree",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "total_experience_years",
        description: "total work experience, whole years, from dates only",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "total_experience_months",
        description: "remaining months of total work experience (0-11)",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_energy",
        description: "years in the energy sector, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_metal",
        description: "years in the metal sector, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_mineral",
        description: "years in the mineral sector, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_chemistry",
        description: "years in the chemical sector, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_waste",
        description: "years in the waste sector, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "experience_other",
        description: "years in other sectors, only if stated",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "green_transition_experience",
        description: "whether the CV states green-transition work",
        kind: FieldKind::Boolean,
    },
    FieldSpec {
        name: "environmental_law_knowledge",
        description: "whether the CV states environmental-legislation knowledge",
        kind: FieldKind::Boolean,
    },
    FieldSpec {
        name: "projects",
        description: "projects/publications; each entry has type, title, year",
        kind: FieldKind::List,
    },
];

const CRIMINAL_RECORD_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "has_criminal_record",
        description: "true only if the certificate lists a conviction; \
                      statements like 'no record found' mean false",
        kind: FieldKind::Boolean,
    },
    FieldSpec {
        name: "record_code",
        description: "the code printed on the certificate, when present",
        kind: FieldKind::Text,
    },
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "projects",
        description: "one entry per project/publication; each entry has \
                      type, title, year, institution, role",
        kind: FieldKind::List,
    },
];

const SECTOR_CERTIFICATE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "company_name",
        description: "issuing company or institution",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "full_name",
        description: "employee's full name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "position",
        description: "position held (engineer, specialist, ...)",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "start_date",
        description: "employment start date (YYYY-MM-DD)",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "end_date",
        description: "employment end date (YYYY-MM-DD), null if ongoing",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "duration_years",
        description: "whole years of the certified employment",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "duration_months",
        description: "remaining months of the certified employment (0-11)",
        kind: FieldKind::Integer,
    },
];

const SERVICE_RECORD_FALLBACK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "full_name",
        description: "person the record belongs to",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "total_experience_years",
        description: "total insured employment, whole years (360-day years)",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "total_experience_months",
        description: "remaining months of insured employment (0-11)",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "total_premium_days",
        description: "total premium day count printed on the record",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "first_entry_date",
        description: "first employment entry date (DD.MM.YYYY)",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "last_exit_date",
        description: "last employment exit date (DD.MM.YYYY), null if employed",
        kind: FieldKind::Text,
    },
];

const GENERIC_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "full_name",
        description: "applicant's full name, when stated",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "national_id",
        description: "11-digit national identity number, when stated",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "summary",
        description: "one-sentence summary of what the document attests",
        kind: FieldKind::Text,
    },
];

/// The target schema for a document kind
pub fn schema_for(kind: &DocumentKind) -> FieldSchema {
    match kind {
        DocumentKind::Diploma => FieldSchema {
            doc_label: "university diploma listing",
            fields: DIPLOMA_FIELDS,
        },
        DocumentKind::Cv => FieldSchema {
            doc_label: "curriculum vitae",
            fields: CV_FIELDS,
        },
        DocumentKind::CriminalRecord => FieldSchema {
            doc_label: "criminal-record certificate",
            fields: CRIMINAL_RECORD_FIELDS,
        },
        DocumentKind::ProjectDossier => FieldSchema {
            doc_label: "project dossier",
            fields: PROJECT_FIELDS,
        },
        DocumentKind::SectorCertificate(_) => FieldSchema {
            doc_label: "sector employment certificate",
            fields: SECTOR_CERTIFICATE_FIELDS,
        },
        // LLM fallback pathway when the tabular parser finds no table.
        DocumentKind::ServiceRecord | DocumentKind::MinistryRecord => FieldSchema {
            doc_label: "social-security service record",
            fields: SERVICE_RECORD_FALLBACK_FIELDS,
        },
        DocumentKind::CoverLetter | DocumentKind::Other => FieldSchema {
            doc_label: "application document",
            fields: GENERIC_FIELDS,
        },
    }
}
