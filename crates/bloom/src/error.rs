//! Errors

use std::time::Duration;

use thiserror::Error;

use crate::database;
use crate::garden::EntryId;

/// Bloom Error
#[derive(Debug, Error)]
pub enum Error {
    /// No owner is available to plant the gift for
    #[error("Identity is not available yet")]
    IdentityUnavailable,
    /// The store did not answer in time
    #[error("Persisting the gift timed out after {0:?}")]
    Timeout(Duration),
    /// Persist was requested before the flower bloomed
    #[error("Watering session has not completed")]
    NotCompleted,
    /// Completion event belongs to another session
    #[error("Completion event does not belong to this session")]
    SessionMismatch,
    /// Stored reference points at nothing
    #[error("Garden entry `{0}` not found")]
    EntryNotFound(EntryId),
    /// Database Error
    #[error(transparent)]
    Database(#[from] database::Error),
    /// Custom Error
    #[error("`{0}`")]
    Custom(String),
}

impl Error {
    /// Whether the same operation may succeed if attempted again later.
    ///
    /// Identity and store failures leave the session untouched, so the caller
    /// can retry `persist` with the completion event it already holds.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IdentityUnavailable | Self::Timeout(_) | Self::Database(_)
        )
    }
}
