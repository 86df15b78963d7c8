//! Core Traits - collaborator interfaces
//!
//! The reducer never talks to a model or a parser directly. It consumes:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Reducer (Layer2-core)                        │
//! │   ├── SelfInfoScorer  → per-token surprisal   │
//! │   └── PhraseChunker   → noun-phrase chunks    │
//! ├───────────────────────────────────────────────┤
//! │  Implementations                              │
//! │   ├── OpenAiCompatScorer (Layer2-provider)    │
//! │   ├── HeuristicScorer    (Layer2-core)        │
//! │   └── HeuristicChunker   (Layer2-core)        │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Both are long-lived and shared read-only across calls.

use super::types::ScoredSentence;
use crate::Result;
use async_trait::async_trait;

// ============================================================================
// SelfInfoScorer
// ============================================================================

/// Scores every token of a sentence given the tokens before it.
///
/// The returned sentence holds `(token, -ln P(token | preceding))` for token
/// positions 1.. of the model's own tokenization; position 0 has no context
/// and becomes the unscored head. Failures must not return partial scores.
#[async_trait]
pub trait SelfInfoScorer: Send + Sync {
    /// Scorer identifier for logs
    fn name(&self) -> &str;

    /// Score one sentence
    async fn score(&self, sentence: &str) -> Result<ScoredSentence>;
}

// ============================================================================
// PhraseChunker
// ============================================================================

/// Splits a sentence into noun-phrase-bounded chunks.
///
/// The chunks concatenate back to the sentence exactly; whitespace between
/// two chunks is attached to the front of the following chunk.
pub trait PhraseChunker: Send + Sync {
    /// Chunker identifier for logs
    fn name(&self) -> &str {
        "chunker"
    }

    fn chunk(&self, sentence: &str) -> Vec<String>;
}
