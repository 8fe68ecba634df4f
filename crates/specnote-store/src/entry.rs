//! Metadata entries
//!
//! Entries are appended, never edited. A later entry with the same name
//! shadows earlier ones on read; a tombstone is an entry whose status is
//! [`EntryStatus::Deleted`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Normal,
    Deleted,
}

/// A named value attached to a content address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataEntry {
    /// Identity shared by an entry and its tombstones
    pub id: Uuid,
    /// When this record was appended
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: EntryStatus,
    pub name: String,
    pub value: String,
}

impl MetadataEntry {
    /// Fresh entry created now
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            status: EntryStatus::Normal,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Tombstone for this entry, created now
    #[must_use]
    pub fn tombstone(&self) -> Self {
        Self {
            id: self.id,
            created_at: Utc::now(),
            status: EntryStatus::Deleted,
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.status == EntryStatus::Deleted
    }
}
