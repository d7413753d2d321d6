//! Industrial sectors and the keyword classifier

use serde::{Deserialize, Serialize};

/// The fixed set of industrial sectors used to bucket employment experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Energy production
    Energy,
    /// Metal production and processing
    Metal,
    /// Mineral industry (cement, ceramics, glass, mining)
    Mineral,
    /// Chemical industry
    Chemistry,
    /// Waste management
    Waste,
    /// Everything else
    Other,
}

/// Keyword → sector rule table
///
/// Kept as data so the rule set can be extended without touching callers.
/// Keywords are matched case-insensitively against free text (employer names,
/// certificate labels, role descriptions).
const SECTOR_RULES: &[(&str, Sector)] = &[
    ("enerji", Sector::Energy),
    ("elektrik", Sector::Energy),
    ("santral", Sector::Energy),
    ("rüzgar", Sector::Energy),
    ("güneş", Sector::Energy),
    ("doğalgaz", Sector::Energy),
    ("energy", Sector::Energy),
    ("metal", Sector::Metal),
    ("demir", Sector::Metal),
    ("çelik", Sector::Metal),
    ("alüminyum", Sector::Metal),
    ("döküm", Sector::Metal),
    ("metalurji", Sector::Metal),
    ("steel", Sector::Metal),
    ("mineral", Sector::Mineral),
    ("çimento", Sector::Mineral),
    ("seramik", Sector::Mineral),
    ("maden", Sector::Mineral),
    ("cement", Sector::Mineral),
    ("mining", Sector::Mineral),
    ("kimya", Sector::Chemistry),
    ("petrokimya", Sector::Chemistry),
    ("gübre", Sector::Chemistry),
    ("ilaç", Sector::Chemistry),
    ("chemical", Sector::Chemistry),
    ("atık", Sector::Waste),
    ("geri dönüşüm", Sector::Waste),
    ("arıtma", Sector::Waste),
    ("waste", Sector::Waste),
    ("recycl", Sector::Waste),
];

impl Sector {
    /// Every sector, in display order
    pub const ALL: [Sector; 6] = [
        Sector::Energy,
        Sector::Metal,
        Sector::Mineral,
        Sector::Chemistry,
        Sector::Waste,
        Sector::Other,
    ];

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Energy => "Energy",
            Sector::Metal => "Metal",
            Sector::Mineral => "Mineral",
            Sector::Chemistry => "Chemistry",
            Sector::Waste => "Waste",
            Sector::Other => "Other",
        }
    }

    /// Merged-record field key holding the experience years for this sector
    pub fn experience_field(&self) -> &'static str {
        match self {
            Sector::Energy => "experience_energy",
            Sector::Metal => "experience_metal",
            Sector::Mineral => "experience_mineral",
            Sector::Chemistry => "experience_chemistry",
            Sector::Waste => "experience_waste",
            Sector::Other => "experience_other",
        }
    }

    /// Classify free text against the keyword rule table
    pub fn classify(text: &str) -> Sector {
        let lower = text.to_lowercase();
        for (keyword, sector) in SECTOR_RULES {
            if lower.contains(keyword) {
                return *sector;
            }
        }
        Sector::Other
    }

    /// Map a declared certificate label onto a sector, if it names one
    ///
    /// Distinct from [`Self::classify`]: a label that names no sector yields
    /// `None` rather than `Other`, so unrelated document labels are not
    /// mistaken for certificates.
    pub fn from_certificate_label(lower_label: &str) -> Option<Sector> {
        for (keyword, sector) in SECTOR_RULES {
            if lower_label.contains(keyword) {
                return Some(*sector);
            }
        }
        if lower_label.contains("diğer üretim") || lower_label.contains("üretim faaliyet") {
            return Some(Sector::Other);
        }
        None
    }
}
