//! Controller-facing facade
//!
//! [`SpecStack`] ties a metadata store, a specification reader and the
//! snapshot settings together. Every call re-reads the specification tree;
//! nothing about earlier resolutions is cached.

use crate::config::StackConfig;
use crate::error::{StackError, StackResult};
use crate::migration::{MigrationReport, ScenarioMigrator, SnapshotKey};
use specnote_artifact::Address;
use specnote_spec::{
    FilesystemReader, GherkinParser, ResolveError, Scenario, Specification, Story, StoryParser,
    Target,
};
use specnote_store::{
    BackendError, GitBackend, MetadataEntry, MetadataStore, VersionControlBackend,
};
use std::fmt;
use std::path::PathBuf;

/// Version-control events that trigger a migration pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    PostCommit,
    PostUpdate,
    PostMerge,
    PrePush,
}

impl Hook {
    /// All hooks that run a migration pass
    pub const ALL: [Hook; 4] = [
        Hook::PostCommit,
        Hook::PostUpdate,
        Hook::PostMerge,
        Hook::PrePush,
    ];

    /// Git hook file name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PostCommit => "post-commit",
            Self::PostUpdate => "post-update",
            Self::PostMerge => "post-merge",
            Self::PrePush => "pre-push",
        }
    }

    /// Hook for a git hook file name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|hook| hook.name() == name)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved scenario with its owning story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    pub story: Story,
    pub scenario: Scenario,
}

/// Metadata stack over a backend and a specification tree
#[derive(Debug)]
pub struct SpecStack<B = GitBackend, P = GherkinParser> {
    config: StackConfig,
    store: MetadataStore<B>,
    reader: FilesystemReader<P>,
    snapshots: SnapshotKey,
}

impl SpecStack<GitBackend, GherkinParser> {
    /// Stack over the git repository at `workdir`
    ///
    /// A relative `features_dir` is taken relative to `workdir`.
    ///
    /// # Errors
    /// Returns error if `workdir` is not inside a git repository
    pub fn open(workdir: impl Into<PathBuf>, config: StackConfig) -> StackResult<Self> {
        let workdir = workdir.into();
        let backend = GitBackend::new(&workdir).with_notes_ref(config.notes_ref.as_str());
        if !backend.is_repository() {
            return Err(StackError::Backend(BackendError::Unavailable(format!(
                "{} is not a git repository",
                workdir.display()
            ))));
        }

        let features_dir = workdir.join(&config.features_dir);
        tracing::debug!("opening stack over {}", features_dir.display());
        Ok(Self::with_parts(
            backend,
            FilesystemReader::new(features_dir),
            config,
        ))
    }
}

impl<B: VersionControlBackend> SpecStack<B, GherkinParser> {
    /// Stack over any backend, reading `config.features_dir` as given
    #[must_use]
    pub fn with_backend(backend: B, config: StackConfig) -> Self {
        let reader = FilesystemReader::new(config.features_dir.clone());
        Self::with_parts(backend, reader, config)
    }
}

impl<B, P> SpecStack<B, P>
where
    B: VersionControlBackend,
    P: StoryParser,
{
    #[must_use]
    pub fn with_parts(backend: B, reader: FilesystemReader<P>, config: StackConfig) -> Self {
        let snapshots = SnapshotKey {
            key: config.snapshot_key.clone(),
            entry: config.snapshot_entry.clone(),
        };
        Self {
            config,
            store: MetadataStore::new(backend),
            reader,
            snapshots,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &MetadataStore<B> {
        &self.store
    }

    /// Read the specification tree, logging any warnings
    ///
    /// # Errors
    /// Returns error if the tree cannot be walked
    pub fn specification(&self) -> StackResult<Specification> {
        let (spec, warnings) = self.reader.read()?;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        Ok(spec)
    }

    /// Story best matching `query`
    ///
    /// # Errors
    /// Returns error if the tree cannot be read or the query fails
    pub fn resolve_story(&self, query: &str) -> StackResult<Story> {
        let spec = self.specification()?;
        Ok(spec.resolve_story(query)?.clone())
    }

    /// Scenario best matching `query`, optionally within a story
    ///
    /// # Errors
    /// Returns error if the tree cannot be read or either query fails
    pub fn resolve_scenario(
        &self,
        query: &str,
        story_query: Option<&str>,
    ) -> StackResult<ResolvedScenario> {
        let spec = self.specification()?;
        let scenario = spec.resolve_scenario(query, story_query)?;
        let story = spec.story_of(scenario).ok_or_else(|| ResolveError::NotFound {
            target: Target::Story,
            query: story_query.unwrap_or(query).to_string(),
        })?;
        Ok(ResolvedScenario {
            story: story.clone(),
            scenario: scenario.clone(),
        })
    }

    /// Content address of a story's full text
    ///
    /// # Errors
    /// Returns error if the backend cannot hash
    pub fn story_address(&self, story: &Story) -> StackResult<Address> {
        Ok(self.store.content_hash(story.text.as_bytes())?)
    }

    /// Content address of a scenario's canonical text
    ///
    /// # Errors
    /// Returns error if the backend cannot hash
    pub fn scenario_address(&self, scenario: &Scenario) -> StackResult<Address> {
        Ok(self
            .store
            .content_hash(scenario.canonical_text().as_bytes())?)
    }

    /// Visible metadata at `address`, sorted by name
    ///
    /// # Errors
    /// Returns error on backend failure or malformed payloads
    pub fn read_metadata(&self, address: &Address) -> StackResult<Vec<MetadataEntry>> {
        Ok(self.store.read_all(address)?)
    }

    /// Append `name = value` at `address`
    ///
    /// # Errors
    /// Returns error on backend failure or malformed payloads
    pub fn write_metadata(
        &self,
        address: &Address,
        name: &str,
        value: &str,
    ) -> StackResult<MetadataEntry> {
        Ok(self.store.write(address, name, value)?)
    }

    /// Tombstone the entry called `name` at `address`
    ///
    /// # Errors
    /// Returns error if no visible entry has that name
    pub fn delete_metadata(&self, address: &Address, name: &str) -> StackResult<usize> {
        Ok(self.store.delete(address, |entry| entry.name == name)?)
    }

    /// Attach `name = value` to a story
    ///
    /// # Errors
    /// Returns error if the story does not resolve or the write fails
    pub fn add_story_metadata(
        &self,
        story_query: &str,
        name: &str,
        value: &str,
    ) -> StackResult<MetadataEntry> {
        let story = self.resolve_story(story_query)?;
        let address = self.story_address(&story)?;
        self.write_metadata(&address, name, value)
    }

    /// Metadata attached to a story
    ///
    /// # Errors
    /// Returns error if the story does not resolve or the read fails
    pub fn story_metadata(&self, story_query: &str) -> StackResult<Vec<MetadataEntry>> {
        let story = self.resolve_story(story_query)?;
        let address = self.story_address(&story)?;
        self.read_metadata(&address)
    }

    /// Attach `name = value` to a scenario
    ///
    /// # Errors
    /// Returns error if the scenario does not resolve or the write fails
    pub fn add_scenario_metadata(
        &self,
        query: &str,
        story_query: Option<&str>,
        name: &str,
        value: &str,
    ) -> StackResult<MetadataEntry> {
        let resolved = self.resolve_scenario(query, story_query)?;
        let address = self.scenario_address(&resolved.scenario)?;
        self.write_metadata(&address, name, value)
    }

    /// Metadata attached to a scenario
    ///
    /// # Errors
    /// Returns error if the scenario does not resolve or the read fails
    pub fn scenario_metadata(
        &self,
        query: &str,
        story_query: Option<&str>,
    ) -> StackResult<Vec<MetadataEntry>> {
        let resolved = self.resolve_scenario(query, story_query)?;
        let address = self.scenario_address(&resolved.scenario)?;
        self.read_metadata(&address)
    }

    /// Carry metadata forward across structural changes
    ///
    /// # Errors
    /// Returns error on read, backend or serialization failure
    pub fn migrate(&self) -> StackResult<MigrationReport> {
        let spec = self.specification()?;
        ScenarioMigrator::new(&self.store, &self.reader, &self.snapshots).migrate(&spec)
    }

    /// Entry point for version-control hooks
    ///
    /// # Errors
    /// Returns error if the migration pass fails
    pub fn run_hook(&self, hook: Hook) -> StackResult<MigrationReport> {
        tracing::info!("running {hook} hook");
        self.migrate()
    }
}
