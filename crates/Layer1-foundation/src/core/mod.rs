//! Core Module - data model and collaborator interfaces
//!
//! - `types.rs`: data types (ScoredSentence, LexicalUnits, ReductionResult)
//! - `traits.rs`: interfaces (SelfInfoScorer, PhraseChunker)

pub mod traits;
pub mod types;

pub use traits::{PhraseChunker, SelfInfoScorer};
pub use types::{
    mean, LexicalUnits, ReduceLevel, ReductionResult, ScoredSentence, ScoredToken, UnitType,
};
