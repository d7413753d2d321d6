//! Academic degree levels

use serde::{Deserialize, Serialize};

/// Academic degree level, ordered from lowest to highest
///
/// Ordering matters: when an applicant submits several diploma entries, the
/// diploma analyzer keeps the highest level's university/department/year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    /// Two-year associate degree
    Associate,
    /// Four-year bachelor's degree
    Bachelors,
    /// Master's degree
    Masters,
    /// Doctorate
    Doctorate,
}

impl EducationLevel {
    /// Infer the level from a program/department description
    ///
    /// Diploma listings mark the level inside the program text rather than in
    /// a separate field ("(YL)" for master's, "DOKTORA", "ÖNLİSANS"/"MYO" for
    /// associate programs); anything unmarked is a bachelor's degree.
    pub fn infer(program: &str) -> EducationLevel {
        let lower = program.to_lowercase();

        if lower.contains("doktora") || lower.contains("(dr)") || lower.contains("phd") {
            EducationLevel::Doctorate
        } else if lower.contains("(yl)")
            || lower.contains("yüksek lisans")
            || lower.contains("tezli")
            || lower.contains("master")
        {
            EducationLevel::Masters
        } else if lower.contains("önlisans") || lower.contains("myo") || lower.contains("associate")
        {
            EducationLevel::Associate
        } else {
            EducationLevel::Bachelors
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            EducationLevel::Associate => "Associate",
            EducationLevel::Bachelors => "Bachelors",
            EducationLevel::Masters => "Masters",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_program_text() {
        assert_eq!(
            EducationLevel::infer("ÇEVRE MÜHENDİSLİĞİ (YL) (TEZLİ)"),
            EducationLevel::Masters
        );
        assert_eq!(
            EducationLevel::infer("ÇEVRE MÜHENDİSLİĞİ PR."),
            EducationLevel::Bachelors
        );
        assert_eq!(
            EducationLevel::infer("KİMYA TEKNOLOJİSİ MYO"),
            EducationLevel::Associate
        );
        assert_eq!(
            EducationLevel::infer("ÇEVRE BİLİMLERİ DOKTORA"),
            EducationLevel::Doctorate
        );
    }

    #[test]
    fn test_ordering() {
        assert!(EducationLevel::Doctorate > EducationLevel::Masters);
        assert!(EducationLevel::Masters > EducationLevel::Bachelors);
        assert!(EducationLevel::Bachelors > EducationLevel::Associate);
    }
}
