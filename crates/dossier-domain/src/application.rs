//! Applications and the requested-service classification

use serde::{Deserialize, Serialize};

/// Application processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Intake complete, not yet processed
    Pending,
    /// A reconciliation run is in progress
    Processing,
    /// Processed; a merged record exists
    Done,
    /// Processing failed; `failure_message` carries the reason
    Failed,
}

/// Applicant category derived from the requested service name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCategory {
    /// University faculty applicant
    Academic,
    /// Former ministry personnel
    FormerMinistry,
    /// Private-sector professional
    SectorProfessional,
    /// Unrecognized service
    Other,
}

/// Seniority tier within the requested service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seniority {
    /// Regular responsible role
    Regular,
    /// Lead responsible role
    Lead,
}

/// One applicant's submission under evaluation
///
/// Created on intake; only the reconciliation engine mutates the status
/// fields. Applications are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Source-system application id
    pub id: i64,

    /// Human-facing tracking number
    pub tracking_no: String,

    /// Applicant name as declared by the source system
    pub applicant_name: Option<String>,

    /// Applicant national identity number as declared
    pub national_id: Option<String>,

    /// Requested service name (free text from the source system)
    pub service_name: String,

    /// Processing status
    pub status: ApplicationStatus,

    /// Intake timestamp, seconds since the Unix epoch
    pub created_at: u64,

    /// Completion timestamp of the last run, if any
    pub processed_at: Option<u64>,

    /// Captured message when `status` is [`ApplicationStatus::Failed`]
    pub failure_message: Option<String>,
}

impl Application {
    /// Classify the requested service into category and seniority
    pub fn classify_service(&self) -> (ServiceCategory, Seniority) {
        let name = self.service_name.to_lowercase();

        let category = if name.contains("akademisyen") || name.contains("öğretim üyesi") {
            ServiceCategory::Academic
        } else if name.contains("bakanlık") || name.contains("kamu") {
            ServiceCategory::FormerMinistry
        } else if name.contains("sektör") {
            ServiceCategory::SectorProfessional
        } else {
            ServiceCategory::Other
        };

        let seniority = if name.contains("baş sorumlu") || name.contains("başsorumlu") {
            Seniority::Lead
        } else {
            Seniority::Regular
        };

        (category, seniority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(service: &str) -> Application {
        Application {
            id: 1,
            tracking_no: "TRK-0001".to_string(),
            applicant_name: None,
            national_id: None,
            service_name: service.to_string(),
            status: ApplicationStatus::Pending,
            created_at: 0,
            processed_at: None,
            failure_message: None,
        }
    }

    #[test]
    fn test_service_classification() {
        let (cat, sen) = app("Yeşil Dönüşüm Sorumlusu (Akademisyen)").classify_service();
        assert_eq!(cat, ServiceCategory::Academic);
        assert_eq!(sen, Seniority::Regular);

        let (cat, sen) = app("Yeşil Dönüşüm Baş Sorumlusu (Sektör Çalışanı)").classify_service();
        assert_eq!(cat, ServiceCategory::SectorProfessional);
        assert_eq!(sen, Seniority::Lead);

        let (cat, _) = app("Eski Bakanlık Personeli").classify_service();
        assert_eq!(cat, ServiceCategory::FormerMinistry);
    }
}
