//! Advisory text-quality gate
//!
//! OCR output can be garbage; these heuristics flag it. Low quality is a
//! logged warning on the document, never a hard stop — the extraction
//! service sometimes recovers facts from mediocre text.

/// Result of the text-quality assessment
#[derive(Debug, Clone)]
pub struct TextQuality {
    /// Whether the text looks usable
    pub acceptable: bool,

    /// Why not, when it doesn't
    pub reason: String,

    /// Advisory confidence in [0, 1]
    pub confidence: f64,
}

/// Assess extracted text quality
pub fn assess_text(text: &str) -> TextQuality {
    let trimmed = text.trim();
    if trimmed.chars().count() < 100 {
        return TextQuality {
            acceptable: false,
            reason: "Text too short (<100 chars)".to_string(),
            confidence: 0.0,
        };
    }

    let total = trimmed.chars().count();
    let garbled = trimmed.chars().filter(|c| is_garbled(*c)).count();
    let garbled_ratio = garbled as f64 / total as f64;
    if garbled_ratio > 0.3 {
        return TextQuality {
            acceptable: false,
            reason: format!("Too many garbled characters ({:.0}%)", garbled_ratio * 100.0),
            confidence: 0.3,
        };
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() < 20 {
        return TextQuality {
            acceptable: false,
            reason: "Too few words (<20)".to_string(),
            confidence: 0.4,
        };
    }

    let avg_word_len =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
    if avg_word_len > 15.0 {
        return TextQuality {
            acceptable: false,
            reason: format!("Abnormal word length (avg {:.1})", avg_word_len),
            confidence: 0.5,
        };
    }

    let confidence =
        (0.6 + (total as f64 / 10_000.0) * 0.2 + (words.len() as f64 / 100.0) * 0.2).min(1.0);

    TextQuality {
        acceptable: true,
        reason: "Quality acceptable".to_string(),
        confidence,
    }
}

fn is_garbled(c: char) -> bool {
    !(c.is_alphanumeric() || c.is_whitespace() || ".,;:!?()-/'\"".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unacceptable() {
        let quality = assess_text("kısa metin");
        assert!(!quality.acceptable);
        assert!(quality.reason.contains("short"));
    }

    #[test]
    fn test_normal_text_passes() {
        let text = "Başvuru sahibi çevre mühendisliği bölümünden mezun olmuştur. "
            .repeat(10);
        let quality = assess_text(&text);
        assert!(quality.acceptable);
        assert!(quality.confidence > 0.6);
    }

    #[test]
    fn test_garbled_text_is_flagged() {
        let text = "�~�#�$�%�^�&�*�@�!�� ".repeat(20);
        let quality = assess_text(&text);
        assert!(!quality.acceptable);
        assert!(quality.reason.contains("garbled"));
    }

    #[test]
    fn test_run_on_words_are_flagged() {
        let text = "pneumonoultramicroscopicsilicovolcanoconiosislike ".repeat(25);
        let quality = assess_text(&text);
        assert!(!quality.acceptable);
        assert!(quality.reason.contains("word length"));
    }
}
