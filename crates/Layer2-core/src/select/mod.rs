//! Selective Context - self-information driven reduction
//!
//! - `heuristic`: offline lexical surprisal estimator
//! - `segment`: token surprisal onto phrase / sentence / token units
//! - `mask`: percentile cutoff and per-granularity masking
//! - `reducer`: the `SelectiveContext` entry point

pub mod heuristic;
pub mod mask;
pub mod reducer;
pub mod segment;

pub use heuristic::HeuristicScorer;
pub use mask::{
    percentile, MaskOutcome, MaskerConfig, UnitMasker, DEFAULT_NUM_LEAD_WORDS,
    DEFAULT_SENTENCE_MASK,
};
pub use reducer::{
    validate_ratio, ReducerConfig, SelectiveContext, DEFAULT_MAX_CONCURRENT_SCORES,
    DEFAULT_REDUCE_RATIO,
};
pub use segment::{chunk_means, redistribute, segment_sentence, split_lexical_units};
