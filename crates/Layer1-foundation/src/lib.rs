//! # trimctx-foundation
//!
//! Foundation layer for trimctx:
//! - Core: data model (ScoredSentence, LexicalUnits, ReductionResult) and
//!   collaborator traits (SelfInfoScorer, PhraseChunker)
//! - Config: settings schema shared by the loader and the CLI
//! - Error: error taxonomy of a reduction call
//!
//! ## Architecture
//!
//! ```text
//! text ─► sentences ─► (tokens, surprisals) ─► lexical units ─► masked text
//!            │                 │                     │
//!         splitter      SelfInfoScorer          PhraseChunker
//! ```

pub mod config;
pub mod core;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core
// ============================================================================
pub use core::{
    // Helpers
    mean,
    // Types
    LexicalUnits,
    // Traits
    PhraseChunker,
    ReduceLevel,
    ReductionResult,
    ScoredSentence,
    ScoredToken,
    SelfInfoScorer,
    UnitType,
};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    ReducerSettings, ScorerKind, ScorerSettings, TrimConfig, CONFIG_DIR_NAME, LOCAL_SETTINGS_FILE,
    SETTINGS_FILE,
};
