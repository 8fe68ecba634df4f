//! Story text parsers
//!
//! [`StoryParser`] turns the text of one source into a [`ParsedStory`].
//! [`GherkinParser`] is backed by the `gherkin` crate and keeps what stories
//! need from a feature:
//!
//! - the `Feature:` name is the story name
//! - every scenario, including those under `Rule:` blocks, in declaration
//!   order
//! - step text without its keyword; `Background:` steps are not attached
//!
//! Localised keywords are accepted through a `# language:` header.

use crate::error::ParseError;
use crate::model::{FILE_EXT_FEATURE, FILE_EXT_STORY};
use gherkin::GherkinEnv;
use std::path::Path;

/// Parser output for one story
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStory {
    pub name: String,
    pub scenarios: Vec<ParsedScenario>,
    /// Non-fatal problems, by line
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScenario {
    pub name: String,
    pub steps: Vec<String>,
    /// 1-based line of the header
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

/// Structured-text parser for story sources
pub trait StoryParser: Send + Sync {
    /// Parse the full text of one source
    ///
    /// # Errors
    /// Returns error if the text is not a valid story
    fn parse(&self, text: &str) -> Result<ParsedStory, ParseError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser handles the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

/// Parser for `.feature` and `.story` files
#[derive(Debug, Clone, Copy, Default)]
pub struct GherkinParser;

impl GherkinParser {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StoryParser for GherkinParser {
    fn parse(&self, text: &str) -> Result<ParsedStory, ParseError> {
        if is_blank(text) {
            return Err(ParseError::MissingFeature);
        }

        let feature = gherkin::Feature::parse(text, GherkinEnv::default())
            .map_err(|e| ParseError::Gherkin(e.to_string()))?;

        let mut scenarios: Vec<&gherkin::Scenario> = feature
            .scenarios
            .iter()
            .chain(feature.rules.iter().flat_map(|rule| rule.scenarios.iter()))
            .collect();
        scenarios.sort_by_key(|scenario| scenario.position.line);

        let mut warnings = Vec::new();
        let scenarios: Vec<ParsedScenario> = scenarios
            .into_iter()
            .map(|scenario| {
                if scenario.steps.is_empty() {
                    warnings.push(ParseWarning {
                        line: scenario.position.line,
                        message: format!("scenario '{}' has no steps", scenario.name),
                    });
                }
                ParsedScenario {
                    name: scenario.name.trim().to_string(),
                    steps: scenario
                        .steps
                        .iter()
                        .map(|step| step.value.trim().to_string())
                        .collect(),
                    line: scenario.position.line,
                }
            })
            .collect();

        Ok(ParsedStory {
            name: feature.name.trim().to_string(),
            scenarios,
            warnings,
        })
    }

    fn extensions(&self) -> &[&str] {
        &[FILE_EXT_FEATURE, FILE_EXT_STORY]
    }
}

/// Nothing but whitespace and comments
fn is_blank(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}
