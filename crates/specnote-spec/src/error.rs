//! Error types for specification handling
//!
//! - [`ParseError`]: a story's text could not be parsed (fatal for that story)
//! - [`ReadError`]: the specification tree could not be walked
//! - [`ResolveError`]: a query matched nothing, or matched two things equally
//! - [`Warning`]: non-fatal problems collected while reading

use std::fmt;
use std::path::PathBuf;

/// Errors while parsing story text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Text is blank or holds only comments
    #[error("no 'Feature:' declaration found")]
    MissingFeature,

    /// Text rejected by the Gherkin grammar
    #[error("invalid gherkin: {0}")]
    Gherkin(String),
}

/// Errors while reading a specification tree
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Directory could not be walked
    #[error("failed to read directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Kind of object a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Story,
    Scenario,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story => f.write_str("story"),
            Self::Scenario => f.write_str("scenario"),
        }
    }
}

/// Query resolution failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Nothing scored above the negligible threshold, or position out of range
    #[error("no {target} matching '{query}'")]
    NotFound { target: Target, query: String },

    /// The two best candidates are tied
    #[error(
        "{target} query is ambiguous: the most similar {target} names are '{first}' and '{second}'"
    )]
    Ambiguous {
        target: Target,
        first: String,
        second: String,
    },
}

impl ResolveError {
    pub(crate) fn not_found(target: Target, query: &str) -> Self {
        Self::NotFound {
            target,
            query: query.to_string(),
        }
    }
}

/// Non-fatal problem found while reading a specification
#[derive(Debug, thiserror::Error)]
pub enum Warning {
    /// A source file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be parsed and was left out
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A line was not understood but parsing continued
    #[error("{path}:{line}: {message}")]
    Line {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Warnings collected by a single read
pub type Warnings = Vec<Warning>;
