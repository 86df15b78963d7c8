//! Heuristic Scorer
//!
//! Offline stand-in for a causal language model. Surprisal is estimated from
//! lexical cues instead of model probabilities:
//!
//! - function words are cheap to predict
//! - long words, capitalized words and numerals are rare
//! - code-like identifiers (`snake_case`, `a::b`, `->`) are rare
//! - punctuation carries almost nothing
//!
//! Tokens are word-boundary segments with their leading whitespace, the same
//! shape a sub-word tokenizer produces. The first segment is left unscored.

use crate::nlp::stopwords::is_function_word;
use crate::nlp::words::{is_wordlike, leading_space_segments};
use async_trait::async_trait;
use trimctx_foundation::{Result, ScoredSentence, ScoredToken, SelfInfoScorer};

const BASE: f64 = 1.0;
const LONG_WORD_BONUS: f64 = 0.5;
const CAPITALIZED_BONUS: f64 = 0.3;
const NUMERAL_BONUS: f64 = 1.0;
const IDENTIFIER_BONUS: f64 = 0.5;
const FUNCTION_WORD: f64 = 0.1;
const PUNCTUATION: f64 = 0.05;

/// Words longer than this many chars count as long
const LONG_WORD_CHARS: usize = 8;

/// Deterministic lexical surprisal estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Estimated surprisal of a single segment
    pub fn segment_surprisal(segment: &str) -> f64 {
        let word = segment.trim();

        if !is_wordlike(word) {
            return PUNCTUATION;
        }
        if is_function_word(word) {
            return FUNCTION_WORD;
        }

        let mut score = BASE;
        if word.chars().count() > LONG_WORD_CHARS {
            score += LONG_WORD_BONUS;
        }
        if word.chars().next().is_some_and(char::is_uppercase) {
            score += CAPITALIZED_BONUS;
        }
        if word.chars().any(char::is_numeric) {
            score += NUMERAL_BONUS;
        }
        if word.contains('_') || word.contains("::") || word.contains("->") {
            score += IDENTIFIER_BONUS;
        }
        score
    }
}

#[async_trait]
impl SelfInfoScorer for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn score(&self, sentence: &str) -> Result<ScoredSentence> {
        let tokens: Vec<ScoredToken> = leading_space_segments(sentence)
            .into_iter()
            .skip(1)
            .map(|segment| ScoredToken::new(segment, Self::segment_surprisal(segment)))
            .collect();

        ScoredSentence::new(sentence, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_surprisal() {
        assert_eq!(HeuristicScorer::segment_surprisal(" the"), FUNCTION_WORD);
        assert_eq!(HeuristicScorer::segment_surprisal("."), PUNCTUATION);
        assert_eq!(HeuristicScorer::segment_surprisal(" apples"), BASE);
        assert_eq!(
            HeuristicScorer::segment_surprisal(" Washington"),
            BASE + LONG_WORD_BONUS + CAPITALIZED_BONUS
        );
        assert_eq!(HeuristicScorer::segment_surprisal(" 42"), BASE + NUMERAL_BONUS);
        assert_eq!(
            HeuristicScorer::segment_surprisal(" max_len"),
            BASE + IDENTIFIER_BONUS
        );
    }

    #[tokio::test]
    async fn test_score_excludes_first_token() {
        let scored = HeuristicScorer::new().score("Bella is happy.").await.unwrap();
        assert_eq!(scored.head(), "Bella");

        let texts: Vec<&str> = scored.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec![" is", " happy", "."]);
        assert_eq!(scored.tokens()[0].surprisal, FUNCTION_WORD);
    }

    #[tokio::test]
    async fn test_score_is_deterministic() {
        let scorer = HeuristicScorer::new();
        let sentence = "The U.S. exported 3.5 tons of crème brûlée in 2023.";
        let a = scorer.score(sentence).await.unwrap();
        let b = scorer.score(sentence).await.unwrap();
        assert_eq!(a, b);
        assert!(a.tokens().iter().all(|t| t.surprisal > 0.0));
    }

    #[tokio::test]
    async fn test_single_word_sentence() {
        let scored = HeuristicScorer::new().score("Hello").await.unwrap();
        assert_eq!(scored.head(), "Hello");
        assert!(scored.tokens().is_empty());
    }
}
