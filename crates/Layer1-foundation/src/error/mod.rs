//! Error types for trimctx
//!
//! Every failure of a reduction call is one of these variants. A call either
//! fully succeeds or returns one error; there is no partial output.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// trimctx error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    /// Invalid reduce level or ratio, invalid settings, mismatched unit types.
    /// Detected before any model call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========================================================================
    // Scoring
    // ========================================================================
    /// The language-model scoring service failed for a sentence
    #[error("Scoring error: {0}")]
    Scoring(String),

    // ========================================================================
    // Segmentation
    // ========================================================================
    /// The phrase chunker returned pieces that do not rebuild the sentence
    #[error("Segmentation inconsistency: chunks rebuild {reconstructed:?}, expected {sentence:?}")]
    SegmentationInconsistency {
        sentence: String,
        reconstructed: String,
    },

    // ========================================================================
    // External conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Configuration error helper
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Scoring error helper
    pub fn scoring(message: impl Into<String>) -> Self {
        Error::Scoring(message.into())
    }

    /// Segmentation inconsistency helper
    pub fn segmentation(sentence: impl Into<String>, reconstructed: impl Into<String>) -> Self {
        Error::SegmentationInconsistency {
            sentence: sentence.into(),
            reconstructed: reconstructed.into(),
        }
    }

    /// Whether the caller supplied bad input (as opposed to a collaborator failing)
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::config("reduce_ratio must be within [0, 1], got 1.5");
        assert_eq!(
            err.to_string(),
            "Configuration error: reduce_ratio must be within [0, 1], got 1.5"
        );

        let err = Error::segmentation("a b", "a");
        assert!(err.to_string().contains("\"a b\""));
    }

    #[test]
    fn test_user_facing() {
        assert!(Error::config("bad level").is_user_facing());
        assert!(!Error::scoring("timeout").is_user_facing());
        assert!(!Error::segmentation("x", "y").is_user_facing());
    }
}
