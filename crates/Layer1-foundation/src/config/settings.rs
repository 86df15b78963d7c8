//! Settings - file schema of `settings.json`
//!
//! Every field is optional so that several files can be layered; a later
//! file only overrides what it sets.

use crate::core::UnitType;
use serde::{Deserialize, Serialize};

/// Settings folder name
pub const CONFIG_DIR_NAME: &str = ".trimctx";

/// Shared settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Local (gitignored) settings file name
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";

// ============================================================================
// TrimConfig
// ============================================================================

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimConfig {
    /// Reduction behaviour
    #[serde(default)]
    pub reducer: ReducerSettings,

    /// Which language model scores tokens
    #[serde(default)]
    pub scorer: ScorerSettings,
}

impl TrimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another config into this one (other wins)
    pub fn merge(&mut self, other: TrimConfig) {
        self.reducer.merge(other.reducer);
        self.scorer.merge(other.scorer);
    }
}

// ============================================================================
// Reducer settings
// ============================================================================

/// Reduction settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducerSettings {
    /// Fraction of units (by surprisal percentile) to mask
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_ratio: Option<f64>,

    /// Unit granularity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_level: Option<UnitType>,

    /// Replacement text for masked phrases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_mask_token: Option<String>,

    /// Placeholder for masked sentences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_mask_token: Option<String>,

    /// Keep the first words of a masked sentence before the placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_leading_words: Option<bool>,

    /// How many leading words to keep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_lead_words: Option<usize>,

    /// Upper bound of sentences scored at the same time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_scores: Option<usize>,
}

impl ReducerSettings {
    pub fn merge(&mut self, other: ReducerSettings) {
        if other.reduce_ratio.is_some() {
            self.reduce_ratio = other.reduce_ratio;
        }
        if other.reduce_level.is_some() {
            self.reduce_level = other.reduce_level;
        }
        if other.phrase_mask_token.is_some() {
            self.phrase_mask_token = other.phrase_mask_token;
        }
        if other.sentence_mask_token.is_some() {
            self.sentence_mask_token = other.sentence_mask_token;
        }
        if other.keep_leading_words.is_some() {
            self.keep_leading_words = other.keep_leading_words;
        }
        if other.num_lead_words.is_some() {
            self.num_lead_words = other.num_lead_words;
        }
        if other.max_concurrent_scores.is_some() {
            self.max_concurrent_scores = other.max_concurrent_scores;
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn reduce_ratio(mut self, ratio: f64) -> Self {
        self.reduce_ratio = Some(ratio);
        self
    }

    pub fn reduce_level(mut self, level: UnitType) -> Self {
        self.reduce_level = Some(level);
        self
    }

    pub fn keep_leading_words(mut self, count: usize) -> Self {
        self.keep_leading_words = Some(true);
        self.num_lead_words = Some(count);
        self
    }
}

// ============================================================================
// Scorer settings
// ============================================================================

/// Scorer backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Offline lexical heuristic
    #[default]
    Heuristic,
    /// OpenAI-compatible `/completions` endpoint with prompt logprobs
    OpenAi,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Heuristic => "heuristic",
            ScorerKind::OpenAi => "openai",
        }
    }
}

/// Scorer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ScorerKind>,

    /// API base URL, e.g. `http://localhost:8000/v1`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key (environment variable wins when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl ScorerSettings {
    pub fn merge(&mut self, other: ScorerSettings) {
        if other.kind.is_some() {
            self.kind = other.kind;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.max_retries.is_some() {
            self.max_retries = other.max_retries;
        }
    }

    pub fn kind_or_default(&self) -> ScorerKind {
        self.kind.unwrap_or_default()
    }
}
