//! trimctx-core: Selective Context reducer
//!
//! Layer2 - reduction pipeline
//!
//! # Modules
//!
//! - `nlp`: whitespace normalization, sentence splitting, word segmentation,
//!   heuristic noun-phrase chunker
//! - `select`: heuristic scorer, lexical unit segmenter, adaptive masker and
//!   the `SelectiveContext` entry point
//! - `config`: layered `settings.json` loader
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trimctx_core::{HeuristicChunker, HeuristicScorer, ReducerConfig, SelectiveContext};
//!
//! let reducer = SelectiveContext::new(
//!     Arc::new(HeuristicScorer::new()),
//!     Arc::new(HeuristicChunker::new()),
//!     ReducerConfig::default(),
//! );
//!
//! let result = reducer
//!     .reduce_named("Bella is happy. She likes apples.", 0.5, "sentence")
//!     .await?;
//! println!("{}", result.masked_context);
//! ```

pub mod config;
pub mod nlp;
pub mod select;

// Re-exports: Config
pub use config::{load_config_from_file, strip_json_comments, ConfigLoader};

// Re-exports: NLP
pub use nlp::{normalize_whitespace, split_sentences, ChunkerConfig, HeuristicChunker};

// Re-exports: Select
pub use select::{
    percentile, split_lexical_units, validate_ratio, HeuristicScorer, MaskOutcome, MaskerConfig,
    ReducerConfig, SelectiveContext, UnitMasker, DEFAULT_MAX_CONCURRENT_SCORES,
    DEFAULT_REDUCE_RATIO,
};

// Re-exports: Foundation
pub use trimctx_foundation::{
    Error, LexicalUnits, PhraseChunker, ReduceLevel, ReductionResult, Result, ScoredSentence,
    ScoredToken, SelfInfoScorer, TrimConfig, UnitType,
};
