//! Error types for the Steam event feed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("empty event line")]
    Empty,

    #[error("malformed steam event: {0}")]
    Malformed(#[from] serde_json::Error),
}
