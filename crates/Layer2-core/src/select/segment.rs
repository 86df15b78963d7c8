//! Lexical Unit Segmenter
//!
//! Moves per-token surprisal onto the requested granularity:
//!
//! - `sentence`: one unit, mean of the token surprisals
//! - `token`: one unit per scored token (the unscored head becomes a unit
//!   without surprisal)
//! - `phrase`: chunker output, with token surprisal redistributed onto chunk
//!   boundaries by a two-cursor scan
//!
//! Lengths are counted in `char`s. Token and chunk boundaries rarely agree:
//! a sub-word token may end inside a chunk, or run across one or more chunk
//! boundaries, in which case its surprisal is split evenly over every chunk
//! whose end it reaches.

use trimctx_foundation::{
    mean, Error, LexicalUnits, PhraseChunker, Result, ScoredSentence, ScoredToken, UnitType,
};

// ============================================================================
// Chunk cursor
// ============================================================================

/// Where a token ended relative to the chunk cursor
#[derive(Debug, Clone, PartialEq, Eq)]
enum Advance {
    /// Ended strictly inside chunk `i`
    Inside(usize),
    /// Ended exactly at the end of chunk `i`
    Closes(usize),
    /// Reached or crossed the end of every listed chunk
    Crosses(Vec<usize>),
    /// No chunk left
    Exhausted,
}

/// Chunk index plus characters already consumed inside that chunk
struct ChunkCursor<'a> {
    lens: &'a [usize],
    index: usize,
    consumed: usize,
}

impl<'a> ChunkCursor<'a> {
    fn new(lens: &'a [usize]) -> Self {
        Self {
            lens,
            index: 0,
            consumed: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.lens.len()
    }

    fn advance(&mut self, len: usize) -> Advance {
        if self.is_exhausted() {
            return Advance::Exhausted;
        }

        self.consumed += len;
        let current = self.lens[self.index];

        if self.consumed < current {
            return Advance::Inside(self.index);
        }

        if self.consumed == current {
            let closed = self.index;
            self.index += 1;
            self.consumed = 0;
            return Advance::Closes(closed);
        }

        let mut crossed = Vec::new();
        loop {
            self.consumed -= self.lens[self.index];
            crossed.push(self.index);
            self.index += 1;
            if self.is_exhausted() || self.consumed < self.lens[self.index] {
                break;
            }
        }
        Advance::Crosses(crossed)
    }
}

// ============================================================================
// Redistribution
// ============================================================================

/// Surprisal contributions received by each chunk.
///
/// `head_chars` leading characters are unscored and only move the cursor.
/// A token running past the last chunk stops the scan; whatever it already
/// crossed keeps its shares.
pub fn redistribute(
    head_chars: usize,
    tokens: &[ScoredToken],
    chunk_lens: &[usize],
) -> Vec<Vec<f64>> {
    let mut contributions: Vec<Vec<f64>> = vec![Vec::new(); chunk_lens.len()];
    let mut cursor = ChunkCursor::new(chunk_lens);

    if head_chars > 0 {
        cursor.advance(head_chars);
    }

    for token in tokens {
        match cursor.advance(token.text.chars().count()) {
            Advance::Inside(i) => {
                if !token.is_blank() {
                    contributions[i].push(token.surprisal);
                }
            }
            Advance::Closes(i) => contributions[i].push(token.surprisal),
            Advance::Crosses(spanned) => {
                let share = token.surprisal / spanned.len() as f64;
                for i in spanned {
                    contributions[i].push(share);
                }
            }
            Advance::Exhausted => {
                tracing::debug!(token = %token.text, "token runs past the last chunk");
                break;
            }
        }
    }

    contributions
}

/// Mean of every chunk's contributions; `None` for a chunk that got nothing
pub fn chunk_means(contributions: &[Vec<f64>]) -> Vec<Option<f64>> {
    contributions
        .iter()
        .map(|c| mean(c.iter().copied()))
        .collect()
}

// ============================================================================
// Segmentation
// ============================================================================

/// Lexical units of one scored sentence
pub fn segment_sentence(
    scored: &ScoredSentence,
    unit_type: UnitType,
    chunker: &dyn PhraseChunker,
) -> Result<LexicalUnits> {
    let mut units = LexicalUnits::new(unit_type);

    match unit_type {
        UnitType::Sentence => {
            units.push_back(scored.text(), scored.mean_surprisal());
        }
        UnitType::Token => {
            if !scored.head().is_empty() {
                units.push_back(scored.head(), None);
            }
            for token in scored.tokens() {
                units.push_back(token.text.as_str(), Some(token.surprisal));
            }
        }
        UnitType::Phrase => {
            let chunks = chunker.chunk(scored.text());
            let rebuilt = chunks.concat();
            if rebuilt != scored.text() {
                return Err(Error::segmentation(scored.text(), rebuilt));
            }

            let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
            let contributions =
                redistribute(scored.head().chars().count(), scored.tokens(), &lens);

            for (chunk, info) in chunks.into_iter().zip(chunk_means(&contributions)) {
                units.push_back(chunk, info);
            }
        }
    }

    Ok(units)
}

/// Lexical units of a whole input, sentence after sentence.
///
/// For phrase and token granularity the first unit of every sentence but the
/// first gets a leading space, so plain concatenation rebuilds the
/// normalized input.
pub fn split_lexical_units(
    sentences: &[ScoredSentence],
    unit_type: UnitType,
    chunker: &dyn PhraseChunker,
) -> Result<LexicalUnits> {
    let mut all = LexicalUnits::new(unit_type);

    for (idx, scored) in sentences.iter().enumerate() {
        let mut units = segment_sentence(scored, unit_type, chunker)?;

        if idx > 0 && unit_type != UnitType::Sentence {
            if let Some(first) = units.texts.first_mut() {
                first.insert(0, ' ');
            }
        }

        all.append(units)?;
    }

    Ok(all)
}
