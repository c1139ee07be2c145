//! Error types for animere_core

use thiserror::Error;

/// Errors raised while building a [`Config`](crate::config::Config)
///
/// Everything past construction is best-effort and never fails: a missing
/// attribute excludes an element, it is not an error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The attribute prefix was empty
    #[error("attribute prefix must not be empty")]
    EmptyPrefix,

    /// The attribute prefix cannot be used inside a `data-*` attribute name
    #[error("invalid attribute prefix {0:?}: expected lowercase ASCII letters, digits and inner hyphens")]
    InvalidPrefix(String),

    /// The visibility threshold lies outside `[0, 1]` (or is NaN)
    #[error("visibility threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    /// Options could not be parsed
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Result type for animere_core operations
pub type Result<T> = std::result::Result<T, ConfigError>;
