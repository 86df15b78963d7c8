//! Natural Language Processing components
//!
//! This module provides whitespace normalization, sentence splitting,
//! word segmentation, function-word lookup and noun chunking.

pub mod chunker;
pub mod sentence;
pub mod stopwords;
pub mod words;

pub use chunker::{ChunkerConfig, HeuristicChunker};
pub use sentence::{normalize_whitespace, split_sentences};
