//! Git-backed version-control backend
//!
//! Every operation is a blocking `git` subprocess run in the working
//! directory. Metadata lives in git notes under a dedicated ref, one JSON
//! entry per line of the note.

use crate::backend::VersionControlBackend;
use crate::error::BackendError;
use specnote_artifact::Address;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Notes ref used when none is configured
pub const DEFAULT_NOTES_REF: &str = "refs/notes/specnote";

const NO_NOTE_FOUND: &str = "no note found for object";

/// Backend that shells out to the `git` executable
#[derive(Debug, Clone)]
pub struct GitBackend {
    workdir: PathBuf,
    notes_ref: String,
}

/// Captured output of one git invocation
#[derive(Debug)]
struct GitOutput {
    success: bool,
    exit_code: Option<i32>,
    stdout: Vec<u8>,
    stderr: String,
}

impl GitBackend {
    /// Backend for the repository containing `workdir`
    ///
    /// Does not check that the path is a repository.
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            notes_ref: DEFAULT_NOTES_REF.to_string(),
        }
    }

    /// Use a different notes ref
    #[must_use]
    pub fn with_notes_ref(mut self, notes_ref: impl Into<String>) -> Self {
        self.notes_ref = notes_ref.into();
        self
    }

    /// Working directory git runs in
    #[inline]
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Notes ref metadata is stored under
    #[inline]
    #[must_use]
    pub fn notes_ref(&self) -> &str {
        &self.notes_ref
    }

    /// Whether `workdir` is inside a git repository
    #[must_use]
    pub fn is_repository(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"], None)
            .map(|out| out.success)
            .unwrap_or(false)
    }

    /// Initialise a repository in `workdir`
    ///
    /// # Errors
    /// Returns error if `git init` fails
    pub fn init(&self) -> Result<(), BackendError> {
        self.run_checked(&["init", "--quiet"], None).map(|_| ())
    }

    fn run(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<GitOutput, BackendError> {
        tracing::debug!("git {}", args.join(" "));

        let spawn_err = |source| BackendError::Spawn {
            args: args.join(" "),
            source,
        };

        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input).map_err(spawn_err)?;
            }
        }

        let output = child.wait_with_output().map_err(spawn_err)?;

        Ok(GitOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn run_checked(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<String, BackendError> {
        let out = self.run(args, stdin)?;
        if !out.success {
            return Err(BackendError::command(args, out.exit_code, out.stderr));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn parse_address(args: &[&str], text: &str) -> Result<Address, BackendError> {
        text.parse().map_err(|e| BackendError::InvalidOutput {
            args: args.join(" "),
            message: format!("'{text}' is not an object id: {e}"),
        })
    }
}

impl VersionControlBackend for GitBackend {
    fn content_hash(&self, bytes: &[u8]) -> Result<Address, BackendError> {
        // -w keeps the blob retrievable by read_object before it is committed
        let args = ["hash-object", "-w", "--stdin"];
        let stdout = self.run_checked(&args, Some(bytes))?;
        Self::parse_address(&args, &stdout)
    }

    fn read_notes(&self, address: &Address) -> Result<Vec<String>, BackendError> {
        let id = address.to_string();
        let args = ["notes", "--ref", self.notes_ref.as_str(), "show", id.as_str()];
        let out = self.run(&args, None)?;

        if !out.success {
            if out.stderr.contains(NO_NOTE_FOUND) {
                return Ok(Vec::new());
            }
            return Err(BackendError::command(&args, out.exit_code, out.stderr));
        }

        Ok(String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn write_notes(&self, address: &Address, entries: &[String]) -> Result<(), BackendError> {
        let id = address.to_string();
        let mut payload = entries.join("\n");
        payload.push('\n');
        self.run_checked(
            &[
                "notes",
                "--ref",
                self.notes_ref.as_str(),
                "add",
                "-f",
                "-F",
                "-",
                id.as_str(),
            ],
            Some(payload.as_bytes()),
        )
        .map(|_| ())
    }

    fn referenced_addresses(&self, address: &Address) -> Result<Vec<Address>, BackendError> {
        let args = ["rev-list", "--all", "--objects"];
        let listing = self.run_checked(&args, None)?;
        let id = address.to_string();

        // Each object line is "<id> <path>"; commits carry no path.
        let objects: Vec<(&str, &str)> = listing
            .lines()
            .filter_map(|line| line.trim().split_once(' '))
            .collect();

        let paths: HashSet<&str> = objects
            .iter()
            .filter(|(object, _)| *object == id)
            .map(|(_, path)| *path)
            .collect();

        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut related = Vec::new();
        for (object, path) in objects {
            if object == id || !paths.contains(path) || !seen.insert(object) {
                continue;
            }
            related.push(Self::parse_address(&args, object)?);
        }
        Ok(related)
    }

    fn read_object(&self, address: &Address) -> Result<Option<Vec<u8>>, BackendError> {
        let id = address.to_string();
        let out = self.run(&["cat-file", "blob", id.as_str()], None)?;
        Ok(out.success.then_some(out.stdout))
    }
}
