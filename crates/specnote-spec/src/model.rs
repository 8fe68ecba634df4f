//! Specification object model
//!
//! A [`Specification`] owns its [`Story`] values; each story owns its
//! [`Scenario`] values. Scenarios point back at their story through a plain
//! [`StoryId`] index into the specification, never a shared pointer.
//!
//! The graph is rebuilt on every read and never mutated afterwards.

use crate::parser::ParsedStory;
use serde::{Deserialize, Serialize};
use specnote_artifact::{fuzzy, RELATEDNESS_THRESHOLD};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of feature files
pub const FILE_EXT_FEATURE: &str = "feature";
/// File extension of story files
pub const FILE_EXT_STORY: &str = "story";

/// Where a story's bytes can be re-read from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Body", rename_all = "lowercase")]
pub enum Source {
    /// A file on disk
    File(PathBuf),
    /// An in-memory body
    Text(String),
}

impl Source {
    /// Path of a file-backed source
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Text(_) => f.write_str("<text>"),
        }
    }
}

/// Index of a story within its specification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoryId(pub(crate) usize);

impl StoryId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One parsed unit of specification text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: StoryId,
    /// Declared title
    pub name: String,
    pub source: Source,
    /// Full source text, as hashed for the story's address
    pub text: String,
    pub scenarios: Vec<Scenario>,
}

/// A named sequence of steps inside a story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Declared name, possibly blank
    pub name: String,
    /// Step text without keywords
    pub steps: Vec<String>,
    /// 1-based line of the scenario header
    pub line: usize,
    /// Owning story
    pub story: StoryId,
}

impl Scenario {
    /// Name followed by the steps, newline separated
    #[must_use]
    pub fn canonical_text(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.steps.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn steps_text(&self) -> String {
        self.steps.join("\n")
    }
}

/// Similarity of two scenarios in `[0, 1]`
///
/// Blank names compare steps only; step-less scenarios compare names only;
/// otherwise the canonical texts are compared.
#[must_use]
pub fn scenario_distance(a: &Scenario, b: &Scenario) -> f64 {
    if a.name.is_empty() || b.name.is_empty() {
        fuzzy::strcmp(&a.steps_text(), &b.steps_text())
    } else if a.steps.is_empty() || b.steps.is_empty() {
        fuzzy::strcmp(&a.name, &b.name)
    } else {
        fuzzy::strcmp(&a.canonical_text(), &b.canonical_text())
    }
}

/// Whether two scenarios are the same logical scenario after an edit
#[inline]
#[must_use]
pub fn scenarios_related(a: &Scenario, b: &Scenario) -> bool {
    scenario_distance(a, b) >= RELATEDNESS_THRESHOLD
}

/// A parsed story not yet placed in a specification
#[derive(Debug, Clone)]
pub struct Document {
    pub source: Source,
    pub text: String,
    pub parsed: ParsedStory,
}

/// Root aggregate of stories, ordered by source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    base: PathBuf,
    stories: Vec<Story>,
}

impl Specification {
    /// Build a specification rooted at `base` from parsed documents
    ///
    /// Stories are ordered by source; scenarios keep declaration order.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>, mut documents: Vec<Document>) -> Self {
        documents.sort_by(|a, b| a.source.cmp(&b.source));

        let stories = documents
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                let id = StoryId(index);
                let scenarios = doc
                    .parsed
                    .scenarios
                    .into_iter()
                    .map(|s| Scenario {
                        name: s.name,
                        steps: s.steps,
                        line: s.line,
                        story: id,
                    })
                    .collect();
                Story {
                    id,
                    name: doc.parsed.name,
                    source: doc.source,
                    text: doc.text,
                    scenarios,
                }
            })
            .collect();

        Self {
            base: base.into(),
            stories,
        }
    }

    /// Directory the specification was read from
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Stories in source order
    #[inline]
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    #[inline]
    #[must_use]
    pub fn story(&self, id: StoryId) -> Option<&Story> {
        self.stories.get(id.0)
    }

    /// Owning story of `scenario`
    #[must_use]
    pub fn story_of(&self, scenario: &Scenario) -> Option<&Story> {
        self.story(scenario.story)
    }

    /// Every scenario, grouped by story in source order
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.stories.iter().flat_map(|story| story.scenarios.iter())
    }

    /// Scenario declared at `line` in any story
    #[must_use]
    pub fn scenario_at_line(&self, line: usize) -> Option<&Scenario> {
        self.scenarios().find(|scenario| scenario.line == line)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Resolver key for a story source
    ///
    /// The base directory and a known file extension are stripped; in-memory
    /// sources have no key.
    pub(crate) fn trimmed_source(&self, source: &Source) -> Option<String> {
        let path = source.path()?;
        let relative = path.strip_prefix(&self.base).unwrap_or(path);
        let mut trimmed = relative.to_string_lossy().into_owned();
        for ext in [FILE_EXT_FEATURE, FILE_EXT_STORY] {
            if let Some(stem) = trimmed.strip_suffix(&format!(".{ext}")) {
                trimmed = stem.to_string();
                break;
            }
        }
        Some(trimmed)
    }
}
