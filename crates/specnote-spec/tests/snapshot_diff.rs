use pretty_assertions::assert_eq;
use specnote_spec::{FilesystemReader, Snapshotter};
use specnote_store::MemoryBackend;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn feature(dir: &Path, file: &str, story: &str, scenario: &str) {
    fs::write(
        dir.join(file),
        format!("Feature: {story}\n\n  Scenario: {scenario}\n    Given {scenario} holds\n"),
    )
    .unwrap();
}

#[test]
fn diff_of_two_reads() {
    let dir = TempDir::new().unwrap();
    feature(dir.path(), "a.feature", "Alpha", "Scenario A");
    feature(dir.path(), "b.feature", "Beta", "Scenario B");

    let backend = MemoryBackend::new();
    let reader = FilesystemReader::new(dir.path());
    let snapshotter = Snapshotter::new(&backend);

    let (v1, _) = reader.read().unwrap();
    let before = snapshotter.take(&v1).unwrap();

    fs::remove_file(dir.path().join("a.feature")).unwrap();
    feature(dir.path(), "c.feature", "Gamma", "Scenario C");

    let (v2, _) = reader.read().unwrap();
    let after = snapshotter.take(&v2).unwrap();

    assert!(!before.equal(&after));
    let diff = before.diff(&after);
    assert_eq!(diff.removed, vec![before.scenarios[0].clone()]);
    assert_eq!(diff.added, vec![after.scenarios[1].clone()]);

    // B is unchanged in both.
    assert_eq!(before.scenarios[1], after.scenarios[0]);
}

#[test]
fn rereading_unchanged_tree_is_equal() {
    let dir = TempDir::new().unwrap();
    feature(dir.path(), "login.feature", "Login", "Login fails");

    let backend = MemoryBackend::new();
    let reader = FilesystemReader::new(dir.path());
    let snapshotter = Snapshotter::new(&backend);

    let first = snapshotter.take(&reader.read().unwrap().0).unwrap();
    let second = snapshotter.take(&reader.read().unwrap().0).unwrap();
    assert!(first.equal(&second));
    assert!(first.diff(&second).is_empty());
}

#[test]
fn moving_a_scenario_changes_its_fingerprint() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("login.feature");
    fs::write(
        &path,
        "Feature: Login\n\n  Scenario: Login fails\n    Given a user\n",
    )
    .unwrap();

    let backend = MemoryBackend::new();
    let reader = FilesystemReader::new(dir.path());
    let snapshotter = Snapshotter::new(&backend);
    let before = snapshotter.take(&reader.read().unwrap().0).unwrap();

    fs::write(
        &path,
        "Feature: Login\n\n\n  Scenario: Login fails\n    Given a user\n",
    )
    .unwrap();
    let after = snapshotter.take(&reader.read().unwrap().0).unwrap();

    let diff = before.diff(&after);
    assert_eq!(diff.removed.len(), 1);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.removed[0].scenario_id, diff.added[0].scenario_id);
    assert_eq!(diff.added[0].line_number, 4);
}
