//! Trail error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("Unsupported parameter source: {kind}")]
    UnsupportedParameterSource { kind: String },

    #[error("Invalid drop pattern '{pattern}': {source}")]
    InvalidDropPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Comparator not found: {0}")]
    ComparatorNotFound(String),

    #[error("Unknown rewind mode: {0}")]
    InvalidRewindMode(String),

    #[error("Trail update failed: {0}")]
    InternalUpdateFailure(String),
}
