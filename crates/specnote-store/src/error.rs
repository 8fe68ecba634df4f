//! Error types for the metadata store
//!
//! - [`BackendError`]: the version-control backend failed or is unreachable
//! - [`StoreError`]: metadata operations (backend failures, malformed payloads)

use specnote_artifact::Address;

/// Errors raised by a [`VersionControlBackend`](crate::VersionControlBackend)
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend tool could not be started
    #[error("failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend tool exited unsuccessfully
    #[error("git {args} failed (exit code {exit_code:?}): {stderr}")]
    Command {
        args: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The backend produced output that could not be interpreted
    #[error("unexpected output from git {args}: {message}")]
    InvalidOutput { args: String, message: String },

    /// The backend refused the operation
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Create a command failure error
    pub fn command(args: &[&str], exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Command {
            args: args.join(" "),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

/// Errors during metadata store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend failure (always fatal)
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A stored payload could not be (de)serialized
    #[error("malformed metadata payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Delete matched nothing at the address
    #[error("no matching metadata entry at {address}")]
    NoMatchingEntry { address: Address },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
