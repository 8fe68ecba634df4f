//! specnote specification model
//!
//! Parses story sources into a [`Specification`], resolves fuzzy queries
//! against it and takes structural [`Snapshot`]s.
//!
//! # Core Concepts
//!
//! - [`Specification`]: stories ordered by source, each owning its scenarios
//! - [`StoryParser`] / [`GherkinParser`]: text to story/scenario tree
//! - [`FilesystemReader`]: walks a directory for `.feature` and `.story` files
//! - [`Specification::resolve_story`] / [`Specification::resolve_scenario`]:
//!   fuzzy and positional lookup
//! - [`Snapshotter`] / [`Snapshot`]: per-scenario fingerprints and their diff
//!
//! # Example
//!
//! ```rust
//! use specnote_spec::{FilesystemReader, Source};
//!
//! let reader = FilesystemReader::new("features");
//! let (spec, _warnings) = reader
//!     .read_story(
//!         Source::Text("inline".into()),
//!         "Feature: Login\n\nScenario: Login fails\n  Given a user\n".into(),
//!     )
//!     .unwrap();
//!
//! let scenario = spec.resolve_scenario("login fail", None).unwrap();
//! assert_eq!(scenario.name, "Login fails");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod model;
pub mod parser;
mod reader;
mod resolver;
mod snapshot;

pub use error::{ParseError, ReadError, ResolveError, Target, Warning, Warnings};
pub use model::{
    scenario_distance, scenarios_related, Document, Scenario, Source, Specification, Story,
    StoryId, FILE_EXT_FEATURE, FILE_EXT_STORY,
};
pub use parser::{GherkinParser, ParsedScenario, ParsedStory, StoryParser};
pub use reader::FilesystemReader;
pub use snapshot::{ScenarioSnapshot, Snapshot, SnapshotDiff, Snapshotter};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        FilesystemReader, GherkinParser, ResolveError, Scenario, Snapshot, Snapshotter, Source,
        Specification, Story, StoryParser,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use specnote_store::MemoryBackend;

    const LOGIN: &str = "Feature: Login\n\n  Scenario: Login fails\n    Given a user\n    When the password is wrong\n    Then access is denied\n";

    #[test]
    fn parse_resolve_and_snapshot() {
        let reader = FilesystemReader::new("features");
        let (spec, warnings) = reader
            .read_story(
                Source::File("features/login.feature".into()),
                LOGIN.to_string(),
            )
            .unwrap();
        assert!(warnings.is_empty());

        let story = spec.resolve_story("login").unwrap();
        let scenario = spec.resolve_scenario("1", Some("login")).unwrap();
        assert_eq!(scenario.line, 3);

        let backend = MemoryBackend::new();
        let snapshot = Snapshotter::new(&backend).take(&spec).unwrap();
        assert_eq!(snapshot.len(), 1);

        let entry = &snapshot.scenarios[0];
        assert_eq!(
            entry.story_id,
            specnote_artifact::Address::of_blob(story.text.as_bytes())
        );
        assert_eq!(
            entry.scenario_id,
            specnote_artifact::Address::of_blob(scenario.canonical_text().as_bytes())
        );
        assert_eq!(entry.line_number, 3);
    }
}
