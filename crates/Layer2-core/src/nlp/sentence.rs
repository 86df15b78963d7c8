//! Sentence splitting
//!
//! Abbreviation-aware boundary heuristic: a sentence ends at the whitespace
//! after `.` or `?` unless the text before it ends in an initial (`J.`), a
//! short title (`Mr.`) or a dotted abbreviation (`e.g.`, `U.S.`). Other
//! abbreviations may be mis-split.

use regex::Regex;

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

/// Collapse every whitespace run to one space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Split normalized text into trimmed, non-empty sentences in input order
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (byte_idx, c) = chars[i];
        if !c.is_whitespace() || !matches!(chars[i - 1].1, '.' | '?') {
            continue;
        }
        if ends_with_abbreviation(&chars[..i]) {
            continue;
        }
        push_trimmed(&mut sentences, &text[start..byte_idx]);
        start = byte_idx + c.len_utf8();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, span: &str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// `before` ends with the terminator that precedes a candidate boundary
fn ends_with_abbreviation(before: &[(usize, char)]) -> bool {
    let n = before.len();
    let at = |back: usize| -> Option<char> { n.checked_sub(back).map(|i| before[i].1) };

    // w.w. (e.g. / i.e. / U.S.)
    if let (Some(a), Some('.'), Some(b)) = (at(4), at(3), at(2)) {
        if is_word_char(a) && is_word_char(b) {
            return true;
        }
    }

    if at(1) != Some('.') {
        return false;
    }

    // Xx. (Mr. / Dr. / St.)
    if let (Some(upper), Some(lower)) = (at(3), at(2)) {
        if upper.is_ascii_uppercase() && lower.is_ascii_lowercase() {
            return true;
        }
    }

    // X. (initial)
    match (at(3), at(2)) {
        (prev, Some(letter)) if letter.is_uppercase() => !prev.is_some_and(is_word_char),
        _ => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Bella\tis \n\n happy.  "),
            "Bella is happy."
        );
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_basic_split() {
        let sentences = split_sentences("Bella is happy. She likes apples.");
        assert_eq!(sentences, vec!["Bella is happy.", "She likes apples."]);
    }

    #[test]
    fn test_question_mark() {
        let sentences = split_sentences("Why? Because it rains. Fine!");
        assert_eq!(sentences, vec!["Why?", "Because it rains.", "Fine!"]);
    }

    #[test]
    fn test_exclamation_does_not_split() {
        let sentences = split_sentences("Wait! Now go.");
        assert_eq!(sentences, vec!["Wait! Now go."]);
    }

    #[test]
    fn test_title_abbreviation() {
        let sentences = split_sentences("Mr. Smith went to Washington. He left.");
        assert_eq!(
            sentences,
            vec!["Mr. Smith went to Washington.", "He left."]
        );
    }

    #[test]
    fn test_dotted_abbreviation() {
        let sentences = split_sentences("Fruit, e.g. apples, is good. The U.S. grows it.");
        assert_eq!(
            sentences,
            vec!["Fruit, e.g. apples, is good.", "The U.S. grows it."]
        );
    }

    #[test]
    fn test_initials() {
        let sentences = split_sentences("J. R. R. Tolkien wrote books. They sold.");
        assert_eq!(
            sentences,
            vec!["J. R. R. Tolkien wrote books.", "They sold."]
        );
    }

    #[test]
    fn test_single_sentence_and_empty() {
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
        assert!(split_sentences("").is_empty());
    }
}
