//! Core Types - data model of a reduction call
//!
//! Every value here is created and consumed inside a single reduction call.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// UnitType - lexical unit granularity
// ============================================================================

/// Granularity a reduction operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Noun-phrase chunks
    #[default]
    Phrase,
    /// Whole sentences
    Sentence,
    /// Raw model tokens
    Token,
}

/// The `reduce_level` argument of a reduction is a unit type
pub type ReduceLevel = UnitType;

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Phrase, UnitType::Sentence, UnitType::Token];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Phrase => "phrase",
            UnitType::Sentence => "sentence",
            UnitType::Token => "token",
        }
    }

    /// Separator used when joining unit texts back together.
    ///
    /// Phrase and token texts carry their own boundary whitespace.
    pub fn separator(&self) -> &'static str {
        match self {
            UnitType::Sentence => " ",
            UnitType::Phrase | UnitType::Token => "",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phrase" => Ok(UnitType::Phrase),
            "sentence" => Ok(UnitType::Sentence),
            "token" => Ok(UnitType::Token),
            _ => Err(Error::config(format!(
                "reduce_level should be one of [phrase, sentence, token], got {:?}",
                s
            ))),
        }
    }
}

// ============================================================================
// Scored tokens
// ============================================================================

/// A sub-sentence token with its surprisal (`-ln P(token | preceding)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredToken {
    pub text: String,
    pub surprisal: f64,
}

impl ScoredToken {
    pub fn new(text: impl Into<String>, surprisal: f64) -> Self {
        Self {
            text: text.into(),
            surprisal,
        }
    }

    /// Whitespace-only tokens never carry weight inside a chunk
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One sentence as scored by a language model.
///
/// The first model token has no left context and therefore no score; its
/// text is kept as `head`. `head` followed by every token text rebuilds
/// `text` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    text: String,
    head: String,
    tokens: Vec<ScoredToken>,
}

impl ScoredSentence {
    /// Build from a sentence and its scored tokens (positions 1..).
    ///
    /// Fails with a scoring error when the tokens are not a suffix of the
    /// sentence or a surprisal is not a finite non-negative number.
    pub fn new(text: impl Into<String>, tokens: Vec<ScoredToken>) -> Result<Self> {
        let text = text.into();
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();

        if !text.ends_with(&joined) {
            return Err(Error::scoring(format!(
                "token texts {:?} do not rebuild the end of sentence {:?}",
                joined, text
            )));
        }

        if let Some(bad) = tokens
            .iter()
            .find(|t| !t.surprisal.is_finite() || t.surprisal < 0.0)
        {
            return Err(Error::scoring(format!(
                "token {:?} has invalid surprisal {}",
                bad.text, bad.surprisal
            )));
        }

        let head = text[..text.len() - joined.len()].to_string();
        Ok(Self { text, head, tokens })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Unscored leading text
    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn tokens(&self) -> &[ScoredToken] {
        &self.tokens
    }

    /// Arithmetic mean of all token surprisals; `None` without scored tokens
    pub fn mean_surprisal(&self) -> Option<f64> {
        mean(self.tokens.iter().map(|t| t.surprisal))
    }
}

/// Arithmetic mean, `None` for an empty sequence
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ============================================================================
// LexicalUnits
// ============================================================================

/// Ordered lexical units of one granularity with their aggregate surprisal.
///
/// `self_infos[i]` is `None` when unit `i` received no surprisal at all; such
/// units take no part in ranking and are never masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalUnits {
    pub unit_type: UnitType,
    pub texts: Vec<String>,
    pub self_infos: Vec<Option<f64>>,
}

impl LexicalUnits {
    pub fn new(unit_type: UnitType) -> Self {
        Self {
            unit_type,
            texts: Vec::new(),
            self_infos: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Add a unit at the end
    pub fn push_back(&mut self, text: impl Into<String>, self_info: Option<f64>) {
        self.texts.push(text.into());
        self.self_infos.push(self_info);
    }

    /// Append another unit list of the same type
    pub fn append(&mut self, mut other: LexicalUnits) -> Result<()> {
        if other.unit_type != self.unit_type {
            return Err(Error::config(format!(
                "cannot concatenate {} units with {} units",
                self.unit_type, other.unit_type
            )));
        }
        self.texts.append(&mut other.texts);
        self.self_infos.append(&mut other.self_infos);
        Ok(())
    }

    /// Owned concatenation of two unit lists of the same type
    pub fn concat(mut self, other: LexicalUnits) -> Result<Self> {
        self.append(other)?;
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.texts
            .iter()
            .map(String::as_str)
            .zip(self.self_infos.iter().copied())
    }

    /// Surprisal values that take part in ranking
    pub fn defined_infos(&self) -> impl Iterator<Item = f64> + '_ {
        self.self_infos.iter().filter_map(|info| *info)
    }

    /// Unit texts joined with the separator of this granularity
    pub fn joined(&self) -> String {
        self.texts.join(self.unit_type.separator())
    }
}

// ============================================================================
// ReductionResult
// ============================================================================

/// Output of one reduction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionResult {
    /// Whitespace-normalized input
    pub original_context: String,
    /// Reduced text
    pub masked_context: String,
    pub reduce_level: UnitType,
    pub reduce_ratio: f64,
    /// Percentile cutoff; absent when no unit had a defined surprisal
    pub threshold: Option<f64>,
    pub total_units: usize,
    /// Original text of every masked unit, in input order
    pub masked_units: Vec<String>,
}

impl ReductionResult {
    pub fn masked_count(&self) -> usize {
        self.masked_units.len()
    }

    pub fn is_noop(&self) -> bool {
        self.masked_units.is_empty()
    }

    /// Share of characters removed from the normalized input, in percent
    pub fn savings_percent(&self) -> f64 {
        let original = self.original_context.chars().count();
        if original == 0 {
            return 0.0;
        }
        let masked = self.masked_context.chars().count();
        (original.saturating_sub(masked) as f64 / original as f64) * 100.0
    }
}
