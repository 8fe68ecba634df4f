//! Scenario identity migration
//!
//! Carries metadata forward when scenarios are edited, renamed or moved.
//! A pass compares the current snapshot with the last persisted one,
//! rebuilds every removed and added scenario from stored story text, and
//! copies metadata from each removed scenario to the most similar added one.
//!
//! The new snapshot is persisted before any metadata is copied, so a pass
//! that fails halfway is not repeated on the next run.

use crate::error::StackResult;
use indexmap::IndexMap;
use specnote_artifact::{Address, RELATEDNESS_THRESHOLD};
use specnote_spec::{
    scenario_distance, FilesystemReader, ParseError, Scenario, ScenarioSnapshot, Snapshot,
    Snapshotter, Source, Specification, StoryParser,
};
use specnote_store::{MetadataStore, VersionControlBackend};

/// Why a scenario took no part in a migration pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// Story text is neither in the backend nor at its recorded source
    #[error("story content {story_id} is unavailable")]
    ContentUnavailable { story_id: Address },

    /// Story text was found but does not parse
    #[error("story text does not parse: {0}")]
    Unparsable(ParseError),

    /// Story parsed but has no scenario at the recorded line
    #[error("no scenario at line {line}")]
    NoScenarioAtLine { line: usize },

    /// Removed scenario has nothing to carry forward
    #[error("no metadata attached")]
    NoMetadata,
}

/// How a migration pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No earlier snapshot; the current one was stored as the baseline
    Baseline,
    /// Structure unchanged since the last snapshot
    Unchanged,
    /// Snapshot advanced, but nothing was both removed and added
    NothingToMigrate,
    /// Snapshot advanced and candidates were compared
    Migrated,
}

/// A scenario left out of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub scenario: ScenarioSnapshot,
    pub reason: SkipReason,
}

/// Metadata copied from a removed scenario to an added one
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    /// Scenario similarity that selected the parent
    pub score: f64,
    /// Number of entries copied
    pub entries: usize,
}

/// Result of one migration pass
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub outcome: MigrationOutcome,
    pub removed: usize,
    pub added: usize,
    pub skipped: Vec<Skipped>,
    pub transfers: Vec<Transfer>,
}

impl MigrationReport {
    fn new(outcome: MigrationOutcome) -> Self {
        Self {
            outcome,
            removed: 0,
            added: 0,
            skipped: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Total entries copied in this pass
    #[must_use]
    pub fn copied_entries(&self) -> usize {
        self.transfers.iter().map(|t| t.entries).sum()
    }
}

/// Where persisted snapshots live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotKey {
    /// Literal whose content address holds the snapshots
    pub key: String,
    /// Metadata name of each snapshot entry
    pub entry: String,
}

/// Drives a migration pass over a store and a reader
#[derive(Debug)]
pub struct ScenarioMigrator<'a, B, P> {
    store: &'a MetadataStore<B>,
    reader: &'a FilesystemReader<P>,
    snapshots: &'a SnapshotKey,
}

impl<'a, B, P> ScenarioMigrator<'a, B, P>
where
    B: VersionControlBackend,
    P: StoryParser,
{
    #[must_use]
    pub fn new(
        store: &'a MetadataStore<B>,
        reader: &'a FilesystemReader<P>,
        snapshots: &'a SnapshotKey,
    ) -> Self {
        Self {
            store,
            reader,
            snapshots,
        }
    }

    /// Run one pass against the current specification
    ///
    /// # Errors
    /// Backend and serialization errors abort the pass. Scenarios that cannot
    /// be rebuilt are skipped and reported, never errors.
    pub fn migrate(&self, spec: &Specification) -> StackResult<MigrationReport> {
        let current = Snapshotter::new(self.store.backend()).take(spec)?;
        let snapshot_address = self.store.content_hash(self.snapshots.key.as_bytes())?;

        let Some(previous) = self.previous_snapshot(&snapshot_address)? else {
            self.persist(&snapshot_address, &current)?;
            tracing::info!("stored baseline snapshot of {} scenarios", current.len());
            return Ok(MigrationReport::new(MigrationOutcome::Baseline));
        };

        if previous.equal(&current) {
            tracing::debug!("specification structure unchanged");
            return Ok(MigrationReport::new(MigrationOutcome::Unchanged));
        }

        self.persist(&snapshot_address, &current)?;

        let diff = previous.diff(&current);
        let mut report = MigrationReport::new(MigrationOutcome::NothingToMigrate);
        report.removed = diff.removed.len();
        report.added = diff.added.len();
        tracing::info!(
            "snapshot advanced: {} scenarios removed, {} added",
            report.removed,
            report.added
        );

        if diff.removed.is_empty() || diff.added.is_empty() {
            return Ok(report);
        }
        report.outcome = MigrationOutcome::Migrated;

        let parents = self.parent_pool(&diff.removed, &mut report)?;

        for added in &diff.added {
            let scenario = match self.materialize(added) {
                Ok(scenario) => scenario,
                Err(reason) => {
                    skip(&mut report, added, reason);
                    continue;
                }
            };

            let Some((parent, score)) = best_parent(&scenario, &parents) else {
                tracing::debug!("no related parent for '{}'", scenario.name);
                continue;
            };

            // Unchanged scenario in an edited story: its entries are already there
            if parent == added.scenario_id {
                tracing::debug!("'{}' kept its address", scenario.name);
                continue;
            }

            let entries = self.copy_metadata(&parent, &added.scenario_id)?;
            tracing::info!(
                "migrated {} metadata entries to '{}' ({:.2})",
                entries,
                scenario.name,
                score
            );
            report.transfers.push(Transfer {
                from: parent,
                to: added.scenario_id,
                score,
                entries,
            });
        }

        Ok(report)
    }

    /// Most recently persisted snapshot, if any
    fn previous_snapshot(&self, address: &Address) -> StackResult<Option<Snapshot>> {
        let latest = self
            .store
            .read_all(address)?
            .into_iter()
            .find(|entry| entry.name == self.snapshots.entry);

        match latest {
            Some(entry) => Ok(Some(serde_json::from_str(&entry.value)?)),
            None => Ok(None),
        }
    }

    fn persist(&self, address: &Address, snapshot: &Snapshot) -> StackResult<()> {
        let value = serde_json::to_string(snapshot)?;
        self.store
            .write(address, self.snapshots.entry.as_str(), value)?;
        Ok(())
    }

    /// Removed scenarios that still rebuild and carry metadata
    fn parent_pool(
        &self,
        removed: &[ScenarioSnapshot],
        report: &mut MigrationReport,
    ) -> StackResult<IndexMap<Address, Scenario>> {
        let mut pool = IndexMap::new();
        for snapshot in removed {
            let scenario = match self.materialize(snapshot) {
                Ok(scenario) => scenario,
                Err(reason) => {
                    skip(report, snapshot, reason);
                    continue;
                }
            };

            if self.store.read_all(&snapshot.scenario_id)?.is_empty() {
                skip(report, snapshot, SkipReason::NoMetadata);
                continue;
            }

            pool.entry(snapshot.scenario_id).or_insert(scenario);
        }
        Ok(pool)
    }

    /// Rebuild the scenario a snapshot entry describes
    ///
    /// Story text comes from the backend by address, falling back to the
    /// recorded source.
    fn materialize(&self, snapshot: &ScenarioSnapshot) -> Result<Scenario, SkipReason> {
        let text = self
            .stored_text(&snapshot.story_id)
            .or_else(|| source_text(snapshot.story_source.as_ref()?))
            .ok_or(SkipReason::ContentUnavailable {
                story_id: snapshot.story_id,
            })?;

        let source = snapshot
            .story_source
            .clone()
            .unwrap_or_else(|| Source::Text(snapshot.story_id.to_string()));

        let (spec, _) = self
            .reader
            .read_story(source, text)
            .map_err(SkipReason::Unparsable)?;

        spec.scenario_at_line(snapshot.line_number)
            .cloned()
            .ok_or(SkipReason::NoScenarioAtLine {
                line: snapshot.line_number,
            })
    }

    fn stored_text(&self, address: &Address) -> Option<String> {
        match self.store.backend().read_object(address) {
            Ok(Some(bytes)) => String::from_utf8(bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("object {} not readable: {}", address.short(), e);
                None
            }
        }
    }

    /// Additive copy of every visible entry
    fn copy_metadata(&self, from: &Address, to: &Address) -> StackResult<usize> {
        let entries = self.store.read_all(from)?;
        for entry in &entries {
            self.store.write(to, entry.name.as_str(), entry.value.as_str())?;
        }
        Ok(entries.len())
    }
}

fn source_text(source: &Source) -> Option<String> {
    match source {
        Source::File(path) => std::fs::read_to_string(path).ok(),
        Source::Text(body) => Some(body.clone()),
    }
}

fn skip(report: &mut MigrationReport, snapshot: &ScenarioSnapshot, reason: SkipReason) {
    tracing::debug!(
        "skipping scenario {} at line {}: {}",
        snapshot.scenario_id.short(),
        snapshot.line_number,
        reason
    );
    report.skipped.push(Skipped {
        scenario: snapshot.clone(),
        reason,
    });
}

/// Related pool member with the highest score
///
/// The first qualifying member wins unless a strictly higher one follows.
fn best_parent(scenario: &Scenario, pool: &IndexMap<Address, Scenario>) -> Option<(Address, f64)> {
    let mut best: Option<(Address, f64)> = None;
    for (address, candidate) in pool {
        let score = scenario_distance(scenario, candidate);
        if score >= RELATEDNESS_THRESHOLD && best.map_or(true, |(_, top)| score > top) {
            best = Some((*address, score));
        }
    }
    best
}
