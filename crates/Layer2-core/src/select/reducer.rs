//! Selective Context reducer
//!
//! Entry point of a reduction call:
//!
//! ```text
//! validate ─► normalize ─► split sentences ─► score (bounded, ordered)
//!          ─► lexical units ─► percentile mask ─► ReductionResult
//! ```
//!
//! Arguments are validated before any sentence reaches the scorer. Any error
//! aborts the whole call.

use super::mask::{MaskerConfig, UnitMasker};
use super::segment::split_lexical_units;
use crate::nlp::{normalize_whitespace, split_sentences};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use trimctx_foundation::{
    Error, PhraseChunker, ReduceLevel, ReducerSettings, ReductionResult, Result, ScoredSentence,
    SelfInfoScorer,
};

/// Default fraction of units to mask
pub const DEFAULT_REDUCE_RATIO: f64 = 0.35;

/// Default bound on sentences scored at once
pub const DEFAULT_MAX_CONCURRENT_SCORES: usize = 4;

// ============================================================================
// Configuration
// ============================================================================

/// Reducer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReducerConfig {
    /// Ratio used by [`SelectiveContext::reduce_default`]
    pub reduce_ratio: f64,
    /// Level used by [`SelectiveContext::reduce_default`]
    pub reduce_level: ReduceLevel,
    /// Sentences scored at the same time
    pub max_concurrent_scores: usize,
    pub masker: MaskerConfig,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            reduce_ratio: DEFAULT_REDUCE_RATIO,
            reduce_level: ReduceLevel::default(),
            max_concurrent_scores: DEFAULT_MAX_CONCURRENT_SCORES,
            masker: MaskerConfig::default(),
        }
    }
}

impl From<&ReducerSettings> for ReducerConfig {
    fn from(settings: &ReducerSettings) -> Self {
        let defaults = Self::default();
        Self {
            reduce_ratio: settings.reduce_ratio.unwrap_or(defaults.reduce_ratio),
            reduce_level: settings.reduce_level.unwrap_or(defaults.reduce_level),
            max_concurrent_scores: settings
                .max_concurrent_scores
                .unwrap_or(defaults.max_concurrent_scores)
                .max(1),
            masker: MaskerConfig::from(settings),
        }
    }
}

/// Checks that `reduce_ratio` is a finite number within `[0, 1]`
pub fn validate_ratio(reduce_ratio: f64) -> Result<()> {
    if reduce_ratio.is_finite() && (0.0..=1.0).contains(&reduce_ratio) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "reduce_ratio must be within [0, 1], got {}",
            reduce_ratio
        )))
    }
}

// ============================================================================
// SelectiveContext
// ============================================================================

/// Self-information driven context reducer.
///
/// Holds the scorer and chunker as shared collaborators; one instance serves
/// any number of concurrent calls.
pub struct SelectiveContext {
    scorer: Arc<dyn SelfInfoScorer>,
    chunker: Arc<dyn PhraseChunker>,
    masker: UnitMasker,
    config: ReducerConfig,
}

impl SelectiveContext {
    pub fn new(
        scorer: Arc<dyn SelfInfoScorer>,
        chunker: Arc<dyn PhraseChunker>,
        config: ReducerConfig,
    ) -> Self {
        Self {
            scorer,
            chunker,
            masker: UnitMasker::with_config(config.masker.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Reduce with the configured ratio and level
    pub async fn reduce_default(&self, context: &str) -> Result<ReductionResult> {
        self.reduce(context, self.config.reduce_ratio, self.config.reduce_level)
            .await
    }

    /// Reduce with the level given by name (`phrase`, `sentence`, `token`)
    pub async fn reduce_named(
        &self,
        context: &str,
        reduce_ratio: f64,
        reduce_level: &str,
    ) -> Result<ReductionResult> {
        let level: ReduceLevel = reduce_level.parse()?;
        self.reduce(context, reduce_ratio, level).await
    }

    /// Mask the least informative `reduce_ratio` share of `context`'s units
    pub async fn reduce(
        &self,
        context: &str,
        reduce_ratio: f64,
        reduce_level: ReduceLevel,
    ) -> Result<ReductionResult> {
        validate_ratio(reduce_ratio)?;

        let start = Instant::now();
        let normalized = normalize_whitespace(context);
        let sentences = split_sentences(&normalized);

        debug!(
            sentences = sentences.len(),
            level = %reduce_level,
            ratio = reduce_ratio,
            scorer = self.scorer.name(),
            "reducing context"
        );

        let scored = self.score_sentences(&sentences).await?;
        let units = split_lexical_units(&scored, reduce_level, self.chunker.as_ref())?;
        let outcome = self.masker.mask(&units, reduce_ratio);

        info!(
            level = %reduce_level,
            units = units.len(),
            masked = outcome.masked_units.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "context reduced"
        );

        Ok(ReductionResult {
            original_context: normalized,
            masked_context: outcome.text,
            reduce_level,
            reduce_ratio,
            threshold: outcome.threshold,
            total_units: units.len(),
            masked_units: outcome.masked_units,
        })
    }

    /// Score every sentence, at most `max_concurrent_scores` at once, in order
    async fn score_sentences(&self, sentences: &[String]) -> Result<Vec<ScoredSentence>> {
        let scorer = self.scorer.as_ref();
        futures::stream::iter(sentences)
            .map(|sentence| scorer.score(sentence))
            .buffered(self.config.max_concurrent_scores.max(1))
            .try_collect()
            .await
    }
}
