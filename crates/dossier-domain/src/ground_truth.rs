//! Ground truth derived from the cover letter

use serde::{Deserialize, Serialize};

/// Reference facts from the applicant's own cover letter
///
/// Built once per application and read-only afterwards. Absent entirely when
/// no cover letter is present or no usable name could be parsed; downstream
/// cross-checks are then skipped, not failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Applicant full name, uppercased
    pub full_name: String,

    /// 11-digit national identity number, when stated
    pub national_id: Option<String>,

    /// Residential address, when stated
    pub address: Option<String>,

    /// Contact e-mail, when stated
    pub email: Option<String>,

    /// Contact phone number, when stated
    pub phone: Option<String>,

    /// Application date as written (dd.mm.yyyy), when stated
    pub submitted_at: Option<String>,

    /// Application subject line, when stated
    pub subject: Option<String>,

    /// Attachment filenames declared in the cover letter
    pub declared_files: Vec<String>,
}

impl GroundTruth {
    /// Look up a reference value by merged-record field name
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "full_name" => Some(self.full_name.as_str()),
            "national_id" => self.national_id.as_deref(),
            "address" => self.address.as_deref(),
            "email" => self.email.as_deref(),
            "phone" => self.phone.as_deref(),
            _ => None,
        }
    }
}
