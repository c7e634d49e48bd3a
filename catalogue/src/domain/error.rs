//! Errors returned by catalogue service operations.

use thiserror::Error;

use super::ports::CatalogueSourceError;
use super::query::UnresolvedReferences;

/// Failure of a catalogue service operation.
///
/// Operations never recover locally: the cache keeps whatever earlier steps
/// stored and the sink is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The request could not be completed.
    #[error("catalogue request failed: {0}")]
    NetworkFailure(#[source] CatalogueSourceError),
    /// The response payload did not match the expected schema.
    #[error("catalogue response could not be decoded: {0}")]
    DecodeFailure(#[source] CatalogueSourceError),
    /// The filter named ids the cache cannot resolve.
    #[error(transparent)]
    UnresolvedReference(#[from] UnresolvedReferences),
    /// Shared catalogue state could not be accessed.
    #[error("catalogue state unavailable: {message}")]
    StateUnavailable {
        /// What was being accessed.
        message: String,
    },
}

impl CatalogueError {
    pub(crate) fn state_unavailable(message: impl Into<String>) -> Self {
        Self::StateUnavailable {
            message: message.into(),
        }
    }
}

impl From<CatalogueSourceError> for CatalogueError {
    fn from(error: CatalogueSourceError) -> Self {
        if error.is_decode() {
            Self::DecodeFailure(error)
        } else {
            Self::NetworkFailure(error)
        }
    }
}
