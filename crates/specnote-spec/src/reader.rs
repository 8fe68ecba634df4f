//! Specification readers
//!
//! [`FilesystemReader`] walks a directory for story sources and parses each
//! one. Files that cannot be read or parsed become [`Warning`]s and are left
//! out; only a failure to walk the tree itself is fatal.

use crate::error::{ParseError, ReadError, Warning, Warnings};
use crate::model::{Document, Source, Specification};
use crate::parser::{GherkinParser, StoryParser};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads a specification tree from disk
#[derive(Debug, Clone)]
pub struct FilesystemReader<P = GherkinParser> {
    root: PathBuf,
    parser: P,
}

impl FilesystemReader<GherkinParser> {
    /// Reader for `root` using the Gherkin parser
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_parser(root, GherkinParser::new())
    }
}

impl<P: StoryParser> FilesystemReader<P> {
    #[must_use]
    pub fn with_parser(root: impl Into<PathBuf>, parser: P) -> Self {
        Self {
            root: root.into(),
            parser,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    #[must_use]
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Read every story source under the root
    ///
    /// # Errors
    /// Returns error if the directory tree cannot be walked
    pub fn read(&self) -> Result<(Specification, Warnings), ReadError> {
        let mut documents = Vec::new();
        let mut warnings = Warnings::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| ReadError::Walk {
                path: self.root.clone(),
                source,
            })?;

            if !entry.file_type().is_file() || !self.parser.can_parse(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(source) => {
                    warnings.push(Warning::Io { path, source });
                    continue;
                }
            };

            match self.document(Source::File(path.clone()), text) {
                Ok((document, line_warnings)) => {
                    warnings.extend(line_warnings);
                    documents.push(document);
                }
                Err(source) => warnings.push(Warning::Parse { path, source }),
            }
        }

        tracing::debug!(
            "read {} stories from {} ({} warnings)",
            documents.len(),
            self.root.display(),
            warnings.len()
        );
        Ok((Specification::new(&self.root, documents), warnings))
    }

    /// Parse one isolated text as a single-story specification
    ///
    /// # Errors
    /// Returns error if the text does not parse
    pub fn read_story(
        &self,
        source: Source,
        text: String,
    ) -> Result<(Specification, Warnings), ParseError> {
        let (document, warnings) = self.document(source, text)?;
        Ok((Specification::new(&self.root, vec![document]), warnings))
    }

    fn document(&self, source: Source, text: String) -> Result<(Document, Warnings), ParseError> {
        let parsed = self.parser.parse(&text)?;

        let path = match &source {
            Source::File(path) => path.clone(),
            Source::Text(_) => PathBuf::from("<text>"),
        };
        let warnings = parsed
            .warnings
            .iter()
            .map(|w| Warning::Line {
                path: path.clone(),
                line: w.line,
                message: w.message.clone(),
            })
            .collect();

        Ok((
            Document {
                source,
                text,
                parsed,
            },
            warnings,
        ))
    }
}
