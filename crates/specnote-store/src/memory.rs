//! In-process version-control backend
//!
//! Keeps objects, notes and history relations in memory behind a mutex.
//! Addresses are git-compatible blob ids, so data written here lines up
//! with what [`GitBackend`](crate::GitBackend) would produce.

use crate::backend::VersionControlBackend;
use crate::error::BackendError;
use parking_lot::Mutex;
use specnote_artifact::Address;
use std::collections::HashMap;

/// Scoped, in-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: HashMap<Address, Vec<u8>>,
    notes: HashMap<Address, Vec<String>>,
    relations: HashMap<Address, Vec<Address>>,
    /// Remaining successful note writes before writes start failing
    write_budget: Option<usize>,
    note_writes: usize,
}

impl MemoryBackend {
    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` as an object and return its address
    pub fn insert_object(&self, bytes: &[u8]) -> Address {
        let address = Address::of_blob(bytes);
        self.state.lock().objects.insert(address, bytes.to_vec());
        address
    }

    /// Drop a stored object, as if history no longer had it
    pub fn forget_object(&self, address: &Address) {
        self.state.lock().objects.remove(address);
    }

    /// Record that `a` and `b` appear together in history
    pub fn relate(&self, a: Address, b: Address) {
        let mut state = self.state.lock();
        state.relations.entry(a).or_default().push(b);
        state.relations.entry(b).or_default().push(a);
    }

    /// Raw note lines at `address`, bypassing any relations
    #[must_use]
    pub fn raw_notes(&self, address: &Address) -> Vec<String> {
        self.state
            .lock()
            .notes
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrite the raw note lines at `address`
    pub fn set_raw_notes(&self, address: Address, lines: Vec<String>) {
        self.state.lock().notes.insert(address, lines);
    }

    /// Allow `count` more note writes, then fail every write
    pub fn fail_writes_after(&self, count: usize) {
        self.state.lock().write_budget = Some(count);
    }

    /// Number of successful note writes so far
    #[must_use]
    pub fn note_writes(&self) -> usize {
        self.state.lock().note_writes
    }
}

impl VersionControlBackend for MemoryBackend {
    fn content_hash(&self, bytes: &[u8]) -> Result<Address, BackendError> {
        Ok(self.insert_object(bytes))
    }

    fn read_notes(&self, address: &Address) -> Result<Vec<String>, BackendError> {
        Ok(self.raw_notes(address))
    }

    fn write_notes(&self, address: &Address, entries: &[String]) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if let Some(budget) = state.write_budget.as_mut() {
            if *budget == 0 {
                return Err(BackendError::Unavailable(format!(
                    "note write to {address} refused"
                )));
            }
            *budget -= 1;
        }
        state.notes.insert(*address, entries.to_vec());
        state.note_writes += 1;
        Ok(())
    }

    fn referenced_addresses(&self, address: &Address) -> Result<Vec<Address>, BackendError> {
        Ok(self
            .state
            .lock()
            .relations
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    fn read_object(&self, address: &Address) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.state.lock().objects.get(address).cloned())
    }
}
