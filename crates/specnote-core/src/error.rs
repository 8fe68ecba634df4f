//! Error types for specnote core
//!
//! [`StackError`] is what the controller sees. Resolver errors are expected
//! user-facing conditions; backend and serialization errors are fatal.

use specnote_spec::{ReadError, ResolveError};
use specnote_store::{BackendError, StoreError};

/// Main specnote error type
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// A story or scenario query failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Version-control backend failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Metadata store failed
    #[error("metadata error: {0}")]
    Store(#[from] StoreError),

    /// A persisted snapshot could not be (de)serialized
    #[error("malformed snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The specification tree could not be read
    #[error("specification error: {0}")]
    Read(#[from] ReadError),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl StackError {
    /// Query matched nothing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolve(ResolveError::NotFound { .. }))
    }

    /// Query matched two things equally well
    #[inline]
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Resolve(ResolveError::Ambiguous { .. }))
    }

    /// Backend failure, directly or through the store
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::Backend(_) | Self::Store(StoreError::Backend(_))
        )
    }
}

/// Result type alias for core operations
pub type StackResult<T> = Result<T, StackError>;
