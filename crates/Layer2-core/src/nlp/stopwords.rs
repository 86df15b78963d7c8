//! English function words
//!
//! Closed-class words (determiners, pronouns, auxiliaries, prepositions,
//! conjunctions). They bound noun-phrase chunks and carry little
//! self-information in the heuristic scorer.

use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref DETERMINERS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her",
        "its", "our", "their", "some", "any", "no", "every", "each", "either", "neither",
        "another", "such", "what", "which", "whose", "all", "both", "many", "much", "few",
        "several",
    ]
    .into_iter()
    .collect();

    static ref FUNCTION_WORDS: HashSet<&'static str> = [
        // pronouns
        "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who", "whom",
        "mine", "yours", "hers", "ours", "theirs",
        // auxiliaries and copulas
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "having", "do", "does", "did", "will", "would", "shall", "should", "can", "could",
        "may", "might", "must",
        // prepositions
        "in", "on", "at", "to", "for", "of", "with", "by", "from", "as", "into", "onto",
        "about", "over", "under", "between", "through", "during", "before", "after",
        "above", "below", "up", "down", "out", "off", "than", "via", "per",
        // conjunctions and particles
        "and", "or", "but", "nor", "so", "yet", "if", "then", "because", "while", "although",
        "though", "when", "where", "how", "why", "not", "also", "just", "very", "too",
        "there", "here",
    ]
    .into_iter()
    .collect();
}

/// Whether `word` is a determiner (case-insensitive)
pub fn is_determiner(word: &str) -> bool {
    DETERMINERS.contains(word.trim().to_lowercase().as_str())
}

/// Whether `word` is a closed-class word, determiners included
pub fn is_function_word(word: &str) -> bool {
    let lower = word.trim().to_lowercase();
    FUNCTION_WORDS.contains(lower.as_str()) || DETERMINERS.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determiners() {
        assert!(is_determiner("The"));
        assert!(is_determiner(" a"));
        assert!(!is_determiner("apple"));
    }

    #[test]
    fn test_function_words() {
        assert!(is_function_word("is"));
        assert!(is_function_word(" She"));
        assert!(is_function_word("the"));
        assert!(!is_function_word("apples"));
        assert!(!is_function_word("Bella"));
    }
}
