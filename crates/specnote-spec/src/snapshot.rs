//! Structural snapshots of a specification
//!
//! A [`Snapshot`] records, for every scenario, the address of its story's
//! full text, the address of its canonical text and its line number. Two
//! snapshots can be compared cheaply ([`Snapshot::equal`]) or diffed into
//! removed and added scenarios ([`Snapshot::diff`]).
//!
//! Serialized form:
//! `{"Scenarios":[{"StoryID":"<hex>","ScenarioID":"<hex>","LineNumber":3}]}`

use crate::model::{Source, Specification, StoryId};
use serde::{Deserialize, Deserializer, Serialize};
use specnote_artifact::Address;
use specnote_store::{BackendError, VersionControlBackend};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Fingerprint of one scenario
///
/// Equality and hashing cover the two addresses and the line number only;
/// the recorded story source is a retrieval hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSnapshot {
    #[serde(rename = "StoryID")]
    pub story_id: Address,
    #[serde(rename = "ScenarioID")]
    pub scenario_id: Address,
    #[serde(rename = "LineNumber")]
    pub line_number: usize,
    #[serde(
        rename = "StorySource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub story_source: Option<Source>,
}

impl PartialEq for ScenarioSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.story_id == other.story_id
            && self.scenario_id == other.scenario_id
            && self.line_number == other.line_number
    }
}

impl Eq for ScenarioSnapshot {}

impl Hash for ScenarioSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.story_id.hash(state);
        self.scenario_id.hash(state);
        self.line_number.hash(state);
    }
}

/// Ordered fingerprint of every scenario in a specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "Scenarios", default, deserialize_with = "null_as_empty")]
    pub scenarios: Vec<ScenarioSnapshot>,
}

/// Scenarios that disappeared and appeared between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub removed: Vec<ScenarioSnapshot>,
    pub added: Vec<ScenarioSnapshot>,
}

impl SnapshotDiff {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl Snapshot {
    /// Exact ordered equality
    #[inline]
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.scenarios == other.scenarios
    }

    /// Order-independent difference from `self` to `other`
    #[must_use]
    pub fn diff(&self, other: &Self) -> SnapshotDiff {
        SnapshotDiff {
            removed: missing_from(&self.scenarios, &other.scenarios),
            added: missing_from(&other.scenarios, &self.scenarios),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn missing_from(a: &[ScenarioSnapshot], b: &[ScenarioSnapshot]) -> Vec<ScenarioSnapshot> {
    let present: HashSet<&ScenarioSnapshot> = b.iter().collect();
    a.iter().filter(|s| !present.contains(s)).cloned().collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ScenarioSnapshot>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ScenarioSnapshot>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Takes snapshots using a backend's content hashing
#[derive(Debug)]
pub struct Snapshotter<'a, B> {
    backend: &'a B,
}

impl<'a, B: VersionControlBackend> Snapshotter<'a, B> {
    #[must_use]
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Fingerprint every scenario of `spec`, in story then declaration order
    ///
    /// # Errors
    /// Returns error if the backend cannot hash
    pub fn take(&self, spec: &Specification) -> Result<Snapshot, BackendError> {
        let mut story_ids: HashMap<StoryId, Address> = HashMap::new();
        let mut scenarios = Vec::new();

        for story in spec.stories() {
            for scenario in &story.scenarios {
                let story_id = match story_ids.get(&story.id) {
                    Some(id) => *id,
                    None => {
                        let id = self.backend.content_hash(story.text.as_bytes())?;
                        story_ids.insert(story.id, id);
                        id
                    }
                };
                let scenario_id = self
                    .backend
                    .content_hash(scenario.canonical_text().as_bytes())?;

                scenarios.push(ScenarioSnapshot {
                    story_id,
                    scenario_id,
                    line_number: scenario.line,
                    story_source: Some(story.source.clone()),
                });
            }
        }

        Ok(Snapshot { scenarios })
    }
}
