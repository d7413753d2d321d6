//! Required-document matrix per service category
//!
//! Missing required kinds are recorded on the outcome; they never halt
//! analysis — a reviewer decides what an incomplete dossier means.

use dossier_domain::{DocumentKind, Seniority, ServiceCategory};

/// One required document kind, matched structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Diploma,
    Cv,
    ServiceRecord,
    MinistryRecord,
    CriminalRecord,
    ProjectDossier,
    SectorCertificate,
}

impl Requirement {
    fn matches(&self, kind: &DocumentKind) -> bool {
        match self {
            Requirement::Diploma => matches!(kind, DocumentKind::Diploma),
            Requirement::Cv => matches!(kind, DocumentKind::Cv),
            Requirement::ServiceRecord => matches!(kind, DocumentKind::ServiceRecord),
            Requirement::MinistryRecord => matches!(kind, DocumentKind::MinistryRecord),
            Requirement::CriminalRecord => matches!(kind, DocumentKind::CriminalRecord),
            Requirement::ProjectDossier => matches!(kind, DocumentKind::ProjectDossier),
            Requirement::SectorCertificate => {
                matches!(kind, DocumentKind::SectorCertificate(_))
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Requirement::Diploma => "Diploma",
            Requirement::Cv => "CV",
            Requirement::ServiceRecord => "ServiceRecord",
            Requirement::MinistryRecord => "MinistryRecord",
            Requirement::CriminalRecord => "CriminalRecord",
            Requirement::ProjectDossier => "ProjectDossier",
            Requirement::SectorCertificate => "SectorCertificate",
        }
    }
}

fn required(category: ServiceCategory, seniority: Seniority) -> Vec<Requirement> {
    let mut kinds = vec![
        Requirement::Diploma,
        Requirement::Cv,
        Requirement::CriminalRecord,
    ];

    match category {
        ServiceCategory::Academic => kinds.push(Requirement::ServiceRecord),
        ServiceCategory::FormerMinistry => kinds.push(Requirement::MinistryRecord),
        ServiceCategory::SectorProfessional => {
            kinds.push(Requirement::ServiceRecord);
            kinds.push(Requirement::SectorCertificate);
        }
        ServiceCategory::Other => {}
    }

    if seniority == Seniority::Lead {
        kinds.push(Requirement::ProjectDossier);
    }

    kinds
}

/// Names of required document kinds absent from the loaded set
pub fn missing_requirements(
    category: ServiceCategory,
    seniority: Seniority,
    present: &[DocumentKind],
) -> Vec<String> {
    required(category, seniority)
        .into_iter()
        .filter(|req| !present.iter().any(|kind| req.matches(kind)))
        .map(|req| req.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::Sector;

    #[test]
    fn test_complete_sector_professional_dossier() {
        let present = [
            DocumentKind::Diploma,
            DocumentKind::Cv,
            DocumentKind::CriminalRecord,
            DocumentKind::ServiceRecord,
            DocumentKind::SectorCertificate(Sector::Chemistry),
        ];
        let missing = missing_requirements(
            ServiceCategory::SectorProfessional,
            Seniority::Regular,
            &present,
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn test_lead_requires_project_dossier() {
        let present = [
            DocumentKind::Diploma,
            DocumentKind::Cv,
            DocumentKind::CriminalRecord,
            DocumentKind::ServiceRecord,
        ];
        let missing = missing_requirements(ServiceCategory::Academic, Seniority::Lead, &present);
        assert_eq!(missing, vec!["ProjectDossier"]);
    }

    #[test]
    fn test_former_ministry_needs_ministry_record() {
        let present = [DocumentKind::Diploma, DocumentKind::Cv];
        let missing =
            missing_requirements(ServiceCategory::FormerMinistry, Seniority::Regular, &present);
        assert_eq!(missing, vec!["CriminalRecord", "MinistryRecord"]);
    }
}
