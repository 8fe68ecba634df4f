//! Content-addressed metadata store
//!
//! Attaches named values to content addresses through a
//! [`VersionControlBackend`]. Writes are read-append-write against the
//! backend; reads aggregate every address reachable through history and
//! collapse the result to the latest entry per name.
//!
//! There is no locking: two processes writing the same address can lose an
//! update (last writer wins).

use crate::backend::VersionControlBackend;
use crate::entry::MetadataEntry;
use crate::error::{StoreError, StoreResult};
use specnote_artifact::Address;
use std::collections::{BTreeMap, HashSet};

/// Append-only metadata store over a backend
#[derive(Debug, Clone)]
pub struct MetadataStore<B> {
    backend: B,
}

impl<B: VersionControlBackend> MetadataStore<B> {
    /// Create store over `backend`
    #[inline]
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Underlying backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Content address of `bytes`
    ///
    /// # Errors
    /// Returns error if the backend cannot hash
    pub fn content_hash(&self, bytes: &[u8]) -> StoreResult<Address> {
        Ok(self.backend.content_hash(bytes)?)
    }

    /// Append `name = value` at `address`
    ///
    /// # Errors
    /// Returns error on backend failure or if the existing payload is malformed
    pub fn write(
        &self,
        address: &Address,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<MetadataEntry> {
        let entry = MetadataEntry::new(name, value);
        self.append(address, &entry)?;
        Ok(entry)
    }

    /// Append a prepared entry at `address`
    ///
    /// # Errors
    /// Returns error on backend failure or if the existing payload is malformed
    pub fn append(&self, address: &Address, entry: &MetadataEntry) -> StoreResult<()> {
        let mut entries = self.entries_at(address)?;
        entries.push(entry.clone());

        let raw = entries
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;

        self.backend.write_notes(address, &raw)?;
        tracing::debug!("appended '{}' at {}", entry.name, address.short());
        Ok(())
    }

    /// Visible entries for `address`, one per name, sorted by name
    ///
    /// Includes entries attached to any address the backend relates to
    /// `address` through history. The latest entry per name wins; names whose
    /// latest entry is a tombstone are omitted.
    ///
    /// # Errors
    /// Returns error on backend failure or malformed payloads
    pub fn read_all(&self, address: &Address) -> StoreResult<Vec<MetadataEntry>> {
        let mut latest: BTreeMap<String, MetadataEntry> = BTreeMap::new();
        for entry in self.history(address)? {
            latest.insert(entry.name.clone(), entry);
        }

        Ok(latest
            .into_values()
            .filter(|entry| !entry.is_deleted())
            .collect())
    }

    /// Tombstone every visible entry at `address` matching `predicate`
    ///
    /// Returns the number of entries deleted. History is never removed.
    ///
    /// # Errors
    /// Returns [`StoreError::NoMatchingEntry`] if nothing matched
    pub fn delete<P>(&self, address: &Address, predicate: P) -> StoreResult<usize>
    where
        P: Fn(&MetadataEntry) -> bool,
    {
        let matching: Vec<MetadataEntry> = self
            .read_all(address)?
            .into_iter()
            .filter(|entry| predicate(entry))
            .collect();

        if matching.is_empty() {
            return Err(StoreError::NoMatchingEntry { address: *address });
        }

        for entry in &matching {
            self.append(address, &entry.tombstone())?;
        }
        Ok(matching.len())
    }

    /// Entries attached directly to `address`, in append order
    fn entries_at(&self, address: &Address) -> StoreResult<Vec<MetadataEntry>> {
        self.backend
            .read_notes(address)?
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(StoreError::from))
            .collect()
    }

    /// Direct and history-related entries, oldest first
    ///
    /// Each address keeps its own append order; logs are interleaved by
    /// timestamp only across addresses, so a skewed clock never reorders
    /// one address's log.
    fn history(&self, address: &Address) -> StoreResult<Vec<MetadataEntry>> {
        let mut logs = vec![self.entries_at(address)?];

        let mut visited = HashSet::from([*address]);
        for related in self.backend.referenced_addresses(address)? {
            if visited.insert(related) {
                logs.push(self.entries_at(&related)?);
            }
        }

        Ok(merge_logs(logs))
    }
}

/// Merge append logs by timestamp, preserving the order within each log
///
/// Heads with equal timestamps are taken from the earlier log first.
fn merge_logs(logs: Vec<Vec<MetadataEntry>>) -> Vec<MetadataEntry> {
    let total = logs.iter().map(Vec::len).sum();
    let mut heads: Vec<_> = logs.into_iter().map(|log| log.into_iter().peekable()).collect();
    let mut merged = Vec::with_capacity(total);

    loop {
        let next = heads
            .iter_mut()
            .enumerate()
            .filter_map(|(index, log)| log.peek().map(|entry| (entry.created_at, index)))
            .min();
        let Some((_, index)) = next else {
            break;
        };
        if let Some(entry) = heads[index].next() {
            merged.push(entry);
        }
    }
    merged
}
