//! Word-boundary segmentation
//!
//! Thin helpers over `unicode-segmentation` shared by the chunker, the
//! heuristic scorer and the sentence masker.

use unicode_segmentation::UnicodeSegmentation;

/// Split `text` at Unicode word boundaries, attaching every whitespace run
/// to the segment that follows it.
///
/// The returned slices concatenate back to `text`. Trailing whitespace is
/// attached to the last segment; a whitespace-only input is one segment.
pub fn leading_space_segments(text: &str) -> Vec<&str> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut pending_space: Option<usize> = None;

    for (idx, segment) in text.split_word_bound_indices() {
        if is_blank(segment) {
            pending_space.get_or_insert(idx);
            continue;
        }
        let start = pending_space.take().unwrap_or(idx);
        ranges.push((start, idx + segment.len()));
    }

    if let Some(start) = pending_space {
        match ranges.last_mut() {
            Some(last) => last.1 = text.len(),
            None => ranges.push((start, text.len())),
        }
    }

    ranges.into_iter().map(|(s, e)| &text[s..e]).collect()
}

/// Words and punctuation marks of `text`, whitespace dropped
pub fn words(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|segment| !is_blank(segment))
        .collect()
}

/// Whether a segment contains a letter or digit
pub fn is_wordlike(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

pub fn is_blank(segment: &str) -> bool {
    segment.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_space_segments() {
        let segments = leading_space_segments("Bella is happy.");
        assert_eq!(segments, vec!["Bella", " is", " happy", "."]);
    }

    #[test]
    fn test_segments_rebuild_text() {
        for text in [
            "She likes apples, pears and 3.5 kg of plums!",
            "  padded  text ",
            "e.g. the U.S. economy",
            "naïve café owners",
            "   ",
            "",
        ] {
            let rebuilt: String = leading_space_segments(text).concat();
            assert_eq!(rebuilt, text);
        }
    }

    #[test]
    fn test_words() {
        assert_eq!(words("Hi, there  you."), vec!["Hi", ",", "there", "you", "."]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_wordlike() {
        assert!(is_wordlike("apples"));
        assert!(is_wordlike(" 42"));
        assert!(!is_wordlike(" ,"));
    }
}
