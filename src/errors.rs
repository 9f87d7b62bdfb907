//! Error types for the resume editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeError {
    #[error("Snapshot store error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Failed to (de)serialize resume snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored value under '{key}' is not a flat mapping of strings: {source}")]
    CorruptSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preview markup selector: {0}")]
    Markup(String),
}

pub type Result<T> = std::result::Result<T, ResumeError>;
