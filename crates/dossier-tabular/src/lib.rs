//! Dossier Tabular Parser
//!
//! Direct parser for the social-security service record. The document has a
//! fixed government layout regular enough for pattern matching, and the
//! extraction service is unreliable on wide tables — so this document kind
//! bypasses the chunking/extraction pathway entirely.
//!
//! Duration arithmetic follows the legal convention, not the calendar:
//! 1 year = 360 days, 1 month = 30 days of the remainder.

#![warn(missing_docs)]

mod error;
mod parser;
mod types;

pub use error::TabularError;
pub use parser::ServiceRecordParser;
pub use types::{
    days_to_years_months, Employer, ExperienceTotals, InsuranceBranch, ServiceHeader, ServiceRecord,
    ServiceRow, DAYS_PER_MONTH, DAYS_PER_YEAR,
};
