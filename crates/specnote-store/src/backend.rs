//! Version-control backend seam
//!
//! The metadata store and the snapshotter only ever talk to version control
//! through [`VersionControlBackend`]. [`GitBackend`](crate::GitBackend) shells
//! out to `git`; [`MemoryBackend`](crate::MemoryBackend) keeps everything
//! in-process for tests and scoped stores.

use crate::error::BackendError;
use specnote_artifact::Address;
use std::rc::Rc;
use std::sync::Arc;

/// Primitives the metadata store needs from a version-control system
///
/// All calls are blocking. Raw note entries are opaque strings, one per
/// appended metadata entry, in append order.
pub trait VersionControlBackend {
    /// Canonical content hash of `bytes`
    ///
    /// # Errors
    /// Returns error if the backend cannot be invoked
    fn content_hash(&self, bytes: &[u8]) -> Result<Address, BackendError>;

    /// Raw entries attached directly to `address` (empty if none)
    ///
    /// # Errors
    /// Returns error if the backend cannot be invoked
    fn read_notes(&self, address: &Address) -> Result<Vec<String>, BackendError>;

    /// Replace the raw entries attached to `address`
    ///
    /// A single call is atomic; read-then-write sequences are not.
    ///
    /// # Errors
    /// Returns error if the backend cannot be invoked
    fn write_notes(&self, address: &Address, entries: &[String]) -> Result<(), BackendError>;

    /// Other addresses related to `address` through committed history
    ///
    /// # Errors
    /// Returns error if the backend cannot be invoked
    fn referenced_addresses(&self, address: &Address) -> Result<Vec<Address>, BackendError>;

    /// Historical content stored under `address`, if the backend has it
    ///
    /// # Errors
    /// Returns error if the backend cannot be invoked
    fn read_object(&self, address: &Address) -> Result<Option<Vec<u8>>, BackendError>;
}

macro_rules! forward_backend {
    ($($ptr:ty),*) => {$(
        impl<T: VersionControlBackend + ?Sized> VersionControlBackend for $ptr {
            fn content_hash(&self, bytes: &[u8]) -> Result<Address, BackendError> {
                (**self).content_hash(bytes)
            }

            fn read_notes(&self, address: &Address) -> Result<Vec<String>, BackendError> {
                (**self).read_notes(address)
            }

            fn write_notes(
                &self,
                address: &Address,
                entries: &[String],
            ) -> Result<(), BackendError> {
                (**self).write_notes(address, entries)
            }

            fn referenced_addresses(
                &self,
                address: &Address,
            ) -> Result<Vec<Address>, BackendError> {
                (**self).referenced_addresses(address)
            }

            fn read_object(&self, address: &Address) -> Result<Option<Vec<u8>>, BackendError> {
                (**self).read_object(address)
            }
        }
    )*};
}

forward_backend!(&T, Box<T>, Rc<T>, Arc<T>);
