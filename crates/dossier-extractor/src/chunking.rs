//! Boundary-aware text segmentation
//!
//! Splits long document text into bounded, overlapping segments that avoid
//! cutting inside a sentence. Deterministic: the same text and configuration
//! always produce the same segments, so a restarted run is idempotent.

use crate::config::ExtractorConfig;
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s").expect("regex is compile-time constant"));

/// One bounded slice of a document's text
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Segment index, starting at 0
    pub index: usize,

    /// Start offset in the source text (bytes)
    pub start: usize,

    /// End offset, exclusive
    pub end: usize,

    /// Segment text, trimmed
    pub text: String,
}

/// Splits text into segments sized for the extraction service
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    min_size: usize,
    boundary_window: usize,
    whitespace_window: usize,
}

impl Chunker {
    /// Create a chunker from the extractor configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_size: config.min_chunk_size,
            boundary_window: config.boundary_window,
            whitespace_window: config.whitespace_window,
        }
    }

    /// Split `text` into ordered, overlapping segments
    ///
    /// Texts shorter than the minimum size come back as a single segment.
    /// Consecutive segments overlap by at most the configured amount, and the
    /// segment windows cover the whole input.
    pub fn split(&self, text: &str) -> Vec<Segment> {
        let len = text.len();

        if len < self.min_size {
            return vec![Segment {
                index: 0,
                start: 0,
                end: len,
                text: text.trim().to_string(),
            }];
        }

        let mut segments = Vec::new();
        let mut start = 0;
        let mut index = 0;

        loop {
            let target = start + self.chunk_size;
            let end = if target >= len {
                len
            } else {
                self.find_cut(text, start, target)
            };

            segments.push(Segment {
                index,
                start,
                end,
                text: text[start..end].trim().to_string(),
            });

            if end >= len {
                break;
            }

            // Next segment starts `overlap` before this one ended; snapping
            // up keeps the realized overlap within the configured amount,
            // and the guard keeps the walk moving forward on degenerate cuts.
            let next = if end > start + self.overlap {
                ceil_char_boundary(text, end - self.overlap)
            } else {
                end
            };
            start = if next > start { next } else { end };
            index += 1;
        }

        segments
    }

    /// Pick the cut point nearest to `target`
    ///
    /// Sentence terminator within the boundary window wins, then whitespace
    /// within the (smaller) whitespace window, then the raw target position.
    fn find_cut(&self, text: &str, start: usize, target: usize) -> usize {
        let len = text.len();

        let search_start = floor_char_boundary(
            text,
            target.saturating_sub(self.boundary_window).max(start + 1),
        );
        let search_end = floor_char_boundary(text, (target + self.boundary_window).min(len));

        if search_start < search_end {
            let window = &text[search_start..search_end];
            let best = SENTENCE_END
                .find_iter(window)
                .map(|m| search_start + m.end())
                .min_by_key(|pos| pos.abs_diff(target));
            if let Some(pos) = best {
                return pos;
            }
        }

        let ws_start = floor_char_boundary(
            text,
            target.saturating_sub(self.whitespace_window).max(start + 1),
        );
        let ws_end = floor_char_boundary(text, (target + self.whitespace_window).min(len));
        if ws_start < ws_end {
            if let Some(rel) = text[ws_start..ws_end].rfind(' ') {
                let pos = ws_start + rel;
                if pos > start {
                    return pos;
                }
            }
        }

        floor_char_boundary(text, target.min(len))
    }
}

/// Largest char boundary not exceeding `index`
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary not below `index`
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize, min_size: usize) -> Chunker {
        Chunker {
            chunk_size,
            overlap,
            min_size,
            boundary_window: 200,
            whitespace_window: 100,
        }
    }

    #[test]
    fn test_short_text_is_a_single_segment() {
        let c = chunker(100, 20, 50);
        let segments = c.split("Short text.");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[0].end, 11);
        assert_eq!(segments[0].text, "Short text.");
    }

    #[test]
    fn test_empty_text() {
        let c = chunker(100, 20, 50);
        let segments = c.split("");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn test_cuts_fall_on_sentence_boundaries() {
        let sentence = "The applicant worked at the plant for years. ";
        let text = sentence.repeat(20);
        let c = chunker(200, 40, 50);

        let segments = c.split(&text);
        assert!(segments.len() > 1);

        for segment in &segments[..segments.len() - 1] {
            // Every non-final cut lands right after a sentence terminator.
            let before = &text[..segment.end];
            assert!(
                before.trim_end().ends_with('.'),
                "segment {} ends mid-sentence: ...{:?}",
                segment.index,
                &before[before.len().saturating_sub(20)..]
            );
        }
    }

    #[test]
    fn test_whitespace_fallback_without_sentences() {
        let text = "word ".repeat(100);
        let c = chunker(120, 20, 50);

        let segments = c.split(&text);
        assert!(segments.len() > 1);
        for segment in &segments[..segments.len() - 1] {
            assert_eq!(text.as_bytes()[segment.end], b' ');
        }
    }

    #[test]
    fn test_hard_cut_when_no_boundary_exists() {
        let text = "a".repeat(1000);
        let c = chunker(300, 50, 50);

        let segments = c.split(&text);
        assert!(segments.len() > 1);
        assert_eq!(segments[0].end, 300);
    }

    #[test]
    fn test_segments_cover_input_with_bounded_overlap() {
        let sentence = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
        let text = sentence.repeat(50);
        let c = chunker(400, 80, 50);

        let segments = c.split(&text);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments.last().unwrap().end, text.len());

        for pair in segments.windows(2) {
            // No gap...
            assert!(pair[1].start <= pair[0].end);
            // ...and overlap bounded by the configured amount.
            assert!(pair[0].end - pair[1].start <= 80);
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "Bir cümle daha. ".repeat(60);
        let c = chunker(250, 50, 50);
        assert_eq!(c.split(&text), c.split(&text));
    }

    #[test]
    fn test_multibyte_text_never_splits_a_char() {
        // Turkish characters are multi-byte in UTF-8; every cut must stay on
        // a char boundary even under the hard-cut fallback.
        let text = "çğıöşüÇĞİÖŞÜ".repeat(200);
        let c = chunker(128, 16, 50);

        for segment in c.split(&text) {
            assert!(text.is_char_boundary(segment.start));
            assert!(text.is_char_boundary(segment.end));
        }
    }
}
