//! Testing utilities for the specnote workspace
//!
//! Shared fixtures: feature text builders, temporary feature trees, in-memory
//! stacks and throwaway git repositories.

#![allow(missing_docs)]

use specnote_core::{SpecStack, StackConfig};
use specnote_store::MemoryBackend;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

/// Gherkin text for one story
///
/// Each scenario is `(name, steps)`; steps are written as `Given` lines.
pub fn feature_text(story: &str, scenarios: &[(&str, &[&str])]) -> String {
    let mut text = format!("Feature: {story}\n");
    for (name, steps) in scenarios {
        let _ = write!(text, "\n  Scenario: {name}\n");
        for step in *steps {
            let _ = writeln!(text, "    Given {step}");
        }
    }
    text
}

/// Temporary directory of story sources
#[derive(Debug)]
pub struct FeatureTree {
    dir: TempDir,
}

impl FeatureTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `body` to `relative`, creating parent directories
    pub fn write(&self, relative: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    pub fn write_feature(
        &self,
        relative: &str,
        story: &str,
        scenarios: &[(&str, &[&str])],
    ) -> PathBuf {
        self.write(relative, &feature_text(story, scenarios))
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).unwrap();
    }
}

impl Default for FeatureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory stack reading `tree`
///
/// The backend handle is returned separately so tests can inspect notes or
/// inject failures.
pub fn memory_stack(tree: &FeatureTree) -> (Arc<MemoryBackend>, SpecStack<Arc<MemoryBackend>>) {
    let backend = Arc::new(MemoryBackend::new());
    let config = StackConfig::new().with_features_dir(tree.path());
    let stack = SpecStack::with_backend(Arc::clone(&backend), config);
    (backend, stack)
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Fresh repository with a local identity, or `None` without git
pub fn git_repository() -> Option<TempDir> {
    if !git_available() {
        eprintln!("git not found, skipping");
        return None;
    }
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["config", "user.name", "Spec Writer"]);
    git(dir.path(), &["config", "user.email", "writer@example.com"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    Some(dir)
}

/// Stage everything and commit
pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "--all"]);
    git(dir, &["commit", "--quiet", "--allow-empty", "-m", message]);
}
