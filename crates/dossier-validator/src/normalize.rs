//! String normalization for cross-document comparison

/// Normalize a value for comparison: uppercase, fold Turkish diacritics,
/// collapse whitespace
///
/// Documents for the same person mix diacritic conventions freely
/// ("ALİ VELİ" on one, "ALI VELI" on another); comparisons must not care.
pub fn normalize_compare(value: &str) -> String {
    let folded: String = value.chars().map(fold_upper).collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a filename: lowercase, trim, spaces to underscores
pub fn normalize_filename(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Similarity ratio in [0, 1] between two normalized values
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize_compare(a), &normalize_compare(b))
}

fn fold_upper(c: char) -> char {
    match c {
        'ç' | 'Ç' => 'C',
        'ğ' | 'Ğ' => 'G',
        'ı' | 'İ' | 'i' => 'I',
        'ö' | 'Ö' => 'O',
        'ş' | 'Ş' => 'S',
        'ü' | 'Ü' => 'U',
        _ => c.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diacritics_fold_together() {
        assert_eq!(normalize_compare("ALİ VELİ"), "ALI VELI");
        assert_eq!(normalize_compare("ali veli"), "ALI VELI");
        assert_eq!(normalize_compare("  Ayşe   Çağlar "), "AYSE CAGLAR");
    }

    #[test]
    fn test_digits_pass_through() {
        assert_eq!(normalize_compare("12345678901"), "12345678901");
    }

    #[test]
    fn test_filename_normalization() {
        assert_eq!(
            normalize_filename("SGK Hizmet Dokumu.pdf "),
            "sgk_hizmet_dokumu.pdf"
        );
    }

    #[test]
    fn test_similarity_is_diacritic_blind() {
        assert_eq!(similarity("ALİ VELİ", "ALI VELI"), 1.0);
        assert!(similarity("ALI VELI", "AYŞE FATMA") < 0.8);
    }
}
