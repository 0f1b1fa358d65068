//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session attribute '{key}' holds an unexpected type")]
    AttributeTypeMismatch { key: String },
}
