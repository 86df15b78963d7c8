//! Noun chunk detection
//!
//! Part-of-speech-free approximation of the pattern `(DET)? (CONTENT)+`:
//! an optional determiner followed by a run of content words (alphanumeric,
//! not a function word). Punctuation and function words stand alone.
//!
//! Whitespace is attached to the front of the following chunk, so the chunks
//! always concatenate back to the input.

use super::stopwords::{is_determiner, is_function_word};
use super::words::{is_wordlike, leading_space_segments};
use trimctx_foundation::PhraseChunker;

/// Configuration for noun chunk detection
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum number of words in a chunk, determiner included
    pub max_length: usize,
    /// Whether a leading determiner joins the chunk
    pub include_determiners: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_length: 4,
            include_determiners: true,
        }
    }
}

/// Heuristic noun chunker
#[derive(Debug, Clone, Default)]
pub struct HeuristicChunker {
    config: ChunkerConfig,
}

impl HeuristicChunker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Set maximum chunk length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length.max(1);
        self
    }

    /// Split a sentence into chunks
    pub fn split(&self, sentence: &str) -> Vec<String> {
        let segments = leading_space_segments(sentence);
        let mut chunks = Vec::with_capacity(segments.len());
        let mut i = 0;

        while i < segments.len() {
            let end = self.match_noun_phrase(&segments, i).unwrap_or(i + 1);
            chunks.push(segments[i..end].concat());
            i = end;
        }

        chunks
    }

    /// End (exclusive) of a noun phrase starting at `start`, if one starts there
    fn match_noun_phrase(&self, segments: &[&str], start: usize) -> Option<usize> {
        let mut end = start;

        if self.config.include_determiners && is_determiner(segments[end]) {
            end += 1;
        }

        let content_start = end;
        while end < segments.len()
            && end - start < self.config.max_length
            && is_content_word(segments[end])
        {
            end += 1;
        }

        (end > content_start).then_some(end)
    }
}

impl PhraseChunker for HeuristicChunker {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn chunk(&self, sentence: &str) -> Vec<String> {
        self.split(sentence)
    }
}

fn is_content_word(segment: &str) -> bool {
    is_wordlike(segment) && !is_function_word(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunks() {
        let chunker = HeuristicChunker::new();
        let chunks = chunker.chunk("Bella is happy.");
        assert_eq!(chunks, vec!["Bella", " is", " happy", "."]);
    }

    #[test]
    fn test_determiner_phrase() {
        let chunker = HeuristicChunker::new();
        let chunks = chunker.chunk("The quick brown fox jumps over the lazy dog.");
        assert_eq!(
            chunks,
            vec!["The quick brown fox", " jumps", " over", " the lazy dog", "."]
        );
    }

    #[test]
    fn test_max_length() {
        let chunker = HeuristicChunker::new().with_max_length(2);
        let chunks = chunker.chunk("New York City council");
        assert_eq!(chunks, vec!["New York", " City council"]);
    }

    #[test]
    fn test_lone_determiner() {
        let chunker = HeuristicChunker::new();
        let chunks = chunker.chunk("I want that.");
        assert_eq!(chunks, vec!["I", " want", " that", "."]);
    }

    #[test]
    fn test_chunks_rebuild_sentence() {
        let chunker = HeuristicChunker::new();
        for sentence in [
            "She likes apples, pears and 3.5 kg of plums!",
            "Dr. Who's TARDIS is bigger on the inside.",
            "naïve café owners serve crème brûlée",
            "",
        ] {
            assert_eq!(chunker.chunk(sentence).concat(), sentence);
        }
    }
}
