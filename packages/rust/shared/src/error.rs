//! Error types for knoex.
//!
//! Library crates use [`KnoexError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::Sense;

/// Top-level error type for all knoex operations.
#[derive(Debug, thiserror::Error)]
pub enum KnoexError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input (term batches, triples, lexicon JSON).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Lexicon lookup or consistency error (e.g., unknown sense id).
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Similarity was requested between senses of different categories.
    ///
    /// This is a contract violation: partitioning upstream must keep
    /// categories apart, so the whole batch is aborted.
    #[error(
        "cross-category comparison: {left} ({lc}) vs {right} ({rc})",
        lc = .left.category,
        rc = .right.category
    )]
    CrossCategory { left: Sense, right: Sense },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty phrase, bad flag value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KnoexError>;

impl KnoexError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn error_display_formatting() {
        let err = KnoexError::config("unknown strategy");
        assert_eq!(err.to_string(), "config error: unknown strategy");

        let err = KnoexError::validation("empty phrase");
        assert!(err.to_string().contains("empty phrase"));
    }

    #[test]
    fn cross_category_names_both_senses() {
        let err = KnoexError::CrossCategory {
            left: Sense::new("bank.n.01", Category::Noun),
            right: Sense::new("run.v.01", Category::Verb),
        };
        let msg = err.to_string();
        assert!(msg.contains("bank.n.01 (NOUN)"));
        assert!(msg.contains("run.v.01 (VERB)"));
    }
}
