//! Registry error types.

use thiserror::Error;

use super::manager::MatchKey;
use crate::game::MatchError;

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No live match under the key
    #[error("No match is running in {0}")]
    MatchNotFound(MatchKey),

    /// The key already hosts a live match
    #[error("A match is already running in {0}")]
    MatchAlreadyActive(MatchKey),

    /// Host-only operation attempted by someone else
    #[error("Only the host can do that")]
    NotHost,

    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),

    /// Rejected by the match itself
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
