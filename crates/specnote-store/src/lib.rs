//! specnote metadata store
//!
//! Append-only key/value annotations keyed by content address, persisted
//! through a version-control backend.
//!
//! # Core Concepts
//!
//! - [`VersionControlBackend`]: hashing, notes and history primitives
//! - [`GitBackend`]: backend that shells out to `git` and stores notes under a ref
//! - [`MemoryBackend`]: in-process backend for tests and scoped stores
//! - [`MetadataStore`]: read-append-write store with history-aware reads
//! - [`MetadataEntry`]: one appended `name = value` record (or tombstone)
//!
//! # Example
//!
//! ```rust
//! use specnote_store::{MemoryBackend, MetadataStore};
//!
//! let store = MetadataStore::new(MemoryBackend::new());
//! let address = store.content_hash(b"Scenario: Login fails").unwrap();
//!
//! store.write(&address, "owner", "alice").unwrap();
//! store.write(&address, "owner", "bob").unwrap();
//!
//! let entries = store.read_all(&address).unwrap();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].value, "bob");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod entry;
mod error;
mod git;
mod memory;
mod printer;
mod store;

pub use backend::VersionControlBackend;
pub use entry::{EntryStatus, MetadataEntry};
pub use error::{BackendError, StoreError, StoreResult};
pub use git::{GitBackend, DEFAULT_NOTES_REF};
pub use memory::MemoryBackend;
pub use printer::{PlaintextPrinter, LINE_LENGTH};
pub use store::MetadataStore;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        GitBackend, MemoryBackend, MetadataEntry, MetadataStore, StoreError, StoreResult,
        VersionControlBackend,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
