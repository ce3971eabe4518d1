use std::io::{Error, ErrorKind};
use thiserror::Error;

/// Failures surfaced by the page retrieval engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    /// The requested page maps to a negative or out-of-bounds sequence window.
    #[error("no such page: page {page} of size {page_size} over {total_count} transactions")]
    InvalidRange {
        page: i64,
        page_size: u64,
        total_count: u64,
    },
    #[error("transport error: {0}")]
    Transport(String),
}

impl PagerError {
    /// An invalid range is a "no such page" condition the view can recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PagerError::InvalidRange { .. })
    }
}

impl From<Error> for PagerError {
    fn from(value: Error) -> Self {
        PagerError::Transport(value.to_string())
    }
}

impl From<PagerError> for Error {
    fn from(value: PagerError) -> Self {
        match value {
            PagerError::InvalidRange { .. } => Error::new(ErrorKind::InvalidInput, value),
            PagerError::Transport(_) => Error::other(value),
        }
    }
}
