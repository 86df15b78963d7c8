//! Adaptive Masker
//!
//! Ranks every lexical unit by its surprisal and replaces the units that fall
//! strictly below the `reduce_ratio` percentile.
//!
//! Masking rules per granularity:
//! - `phrase`: the configurable phrase mask token (empty by default)
//! - `sentence`: a placeholder marker, optionally preceded by the first words
//!   of the sentence
//! - `token`: removed
//!
//! Units without a defined surprisal never take part in ranking and are
//! always kept.

use crate::nlp::words::words;
use serde::{Deserialize, Serialize};
use trimctx_foundation::{LexicalUnits, ReducerSettings, UnitType};

/// Default placeholder for a masked sentence
pub const DEFAULT_SENTENCE_MASK: &str = "<...some content omitted.>";

/// Default number of words kept in front of a masked sentence
pub const DEFAULT_NUM_LEAD_WORDS: usize = 3;

/// Configuration for unit masking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskerConfig {
    /// Replacement for a masked phrase
    pub phrase_mask_token: String,
    /// Placeholder for a masked sentence
    pub sentence_mask_token: String,
    /// Keep the first words of a masked sentence
    pub keep_leading_words: bool,
    /// How many leading words to keep
    pub num_lead_words: usize,
}

impl Default for MaskerConfig {
    fn default() -> Self {
        Self {
            phrase_mask_token: String::new(),
            sentence_mask_token: DEFAULT_SENTENCE_MASK.to_string(),
            keep_leading_words: false,
            num_lead_words: DEFAULT_NUM_LEAD_WORDS,
        }
    }
}

impl From<&ReducerSettings> for MaskerConfig {
    fn from(settings: &ReducerSettings) -> Self {
        let defaults = Self::default();
        Self {
            phrase_mask_token: settings
                .phrase_mask_token
                .clone()
                .unwrap_or(defaults.phrase_mask_token),
            sentence_mask_token: settings
                .sentence_mask_token
                .clone()
                .unwrap_or(defaults.sentence_mask_token),
            keep_leading_words: settings
                .keep_leading_words
                .unwrap_or(defaults.keep_leading_words),
            num_lead_words: settings.num_lead_words.unwrap_or(defaults.num_lead_words),
        }
    }
}

/// Result of masking a unit list
#[derive(Debug, Clone, PartialEq)]
pub struct MaskOutcome {
    /// Kept and replaced units joined back together
    pub text: String,
    /// Percentile cutoff, absent when no unit had a defined surprisal
    pub threshold: Option<f64>,
    /// Original texts of the masked units, in order
    pub masked_units: Vec<String>,
}

/// Percentile of `values` at `ratio` (0.0 to 1.0).
///
/// Linear interpolation between the two closest ranks, the same as NumPy's
/// default method. `None` for an empty input.
pub fn percentile(values: impl IntoIterator<Item = f64>, ratio: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = ratio.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Unit masker
#[derive(Debug, Clone, Default)]
pub struct UnitMasker {
    config: MaskerConfig,
}

impl UnitMasker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MaskerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaskerConfig {
        &self.config
    }

    /// Mask every unit strictly below the `reduce_ratio` percentile
    pub fn mask(&self, units: &LexicalUnits, reduce_ratio: f64) -> MaskOutcome {
        let threshold = percentile(units.defined_infos(), reduce_ratio);

        let mut kept: Vec<String> = Vec::with_capacity(units.len());
        let mut masked_units = Vec::new();

        for (text, info) in units.iter() {
            let below = matches!((info, threshold), (Some(v), Some(t)) if v < t);
            if below {
                masked_units.push(text.to_string());
                kept.push(self.replacement(units.unit_type, text));
            } else {
                kept.push(text.to_string());
            }
        }

        tracing::debug!(
            unit_type = %units.unit_type,
            total = units.len(),
            masked = masked_units.len(),
            threshold = ?threshold,
            "masked lexical units"
        );

        MaskOutcome {
            text: kept.join(units.unit_type.separator()),
            threshold,
            masked_units,
        }
    }

    fn replacement(&self, unit_type: UnitType, text: &str) -> String {
        match unit_type {
            UnitType::Phrase => self.config.phrase_mask_token.clone(),
            UnitType::Token => String::new(),
            UnitType::Sentence => {
                if !self.config.keep_leading_words {
                    return self.config.sentence_mask_token.clone();
                }
                let lead: Vec<&str> = words(text)
                    .into_iter()
                    .take(self.config.num_lead_words)
                    .collect();
                if lead.is_empty() {
                    self.config.sentence_mask_token.clone()
                } else {
                    format!("{} {}", lead.join(" "), self.config.sentence_mask_token)
                }
            }
        }
    }
}
