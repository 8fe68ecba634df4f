//! Migration passes over an in-memory backend and a temporary feature tree

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specnote_core::{MigrationOutcome, SkipReason};
use specnote_test_utils::{memory_stack, FeatureTree};

const LOGIN_STEPS: &[&str] = &["a user", "a bad password"];

#[test]
fn first_pass_stores_baseline() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (_, stack) = memory_stack(&tree);

    let report = stack.migrate().unwrap();
    assert_eq!(report.outcome, MigrationOutcome::Baseline);
    assert!(report.transfers.is_empty());
}

#[test]
fn renamed_scenario_keeps_metadata() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();

    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();
    let old = stack.resolve_scenario("Login fails", None).unwrap();
    let old_address = stack.scenario_address(&old.scenario).unwrap();

    tree.write_feature("login.feature", "Login", &[("Login failure", LOGIN_STEPS)]);
    let report = stack.migrate().unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.transfers.len(), 1);
    assert_eq!(report.transfers[0].from, old_address);
    assert_eq!(report.copied_entries(), 1);

    let carried = stack.scenario_metadata("Login failure", None).unwrap();
    assert_eq!(carried.len(), 1);
    assert_eq!(carried[0].name, "owner");
    assert_eq!(carried[0].value, "alice");

    // The copy is additive
    let untouched = stack.read_metadata(&old_address).unwrap();
    assert_eq!(untouched.len(), 1);
    assert_eq!(untouched[0].value, "alice");
}

#[test]
fn second_pass_is_unchanged() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (backend, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();

    tree.write_feature("login.feature", "Login", &[("Login failure", LOGIN_STEPS)]);
    stack.migrate().unwrap();
    let writes = backend.note_writes();

    let again = stack.migrate().unwrap();
    assert_eq!(again.outcome, MigrationOutcome::Unchanged);
    assert!(again.transfers.is_empty());
    assert_eq!(backend.note_writes(), writes);

    let entries = stack.scenario_metadata("Login failure", None).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn new_story_has_nothing_to_migrate() {
    let tree = FeatureTree::new();
    tree.write_feature("cart.feature", "Cart", &[("Add item", &["an empty cart"])]);
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();

    tree.write_feature("checkout.feature", "Checkout", &[("Pay", &["a full cart"])]);
    let report = stack.migrate().unwrap();
    assert_eq!(report.outcome, MigrationOutcome::NothingToMigrate);
    assert_eq!(report.removed, 0);
    assert_eq!(report.added, 1);
}

#[test]
fn added_scenario_reissues_siblings_of_edited_story() {
    let tree = FeatureTree::new();
    tree.write_feature("cart.feature", "Cart", &[("Add item", &["an empty cart"])]);
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();

    tree.write_feature(
        "cart.feature",
        "Cart",
        &[
            ("Add item", &["an empty cart"]),
            ("Remove item", &["a full cart"]),
        ],
    );
    let report = stack.migrate().unwrap();

    // The story hash changed, so the untouched scenario is removed and re-added
    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 2);
    assert!(report.transfers.is_empty());
}

#[test]
fn unchanged_sibling_is_not_copied_onto_itself() {
    let tree = FeatureTree::new();
    tree.write_feature(
        "login.feature",
        "Login",
        &[("Login fails", LOGIN_STEPS), ("Logout", &["a session"])],
    );
    let (backend, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();
    let resolved = stack.resolve_scenario("Login fails", None).unwrap();
    let address = stack.scenario_address(&resolved.scenario).unwrap();

    tree.write_feature(
        "login.feature",
        "Login",
        &[
            ("Login fails", LOGIN_STEPS),
            ("Logout", &["a session", "the logout button"]),
        ],
    );
    let report = stack.migrate().unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert!(report.transfers.iter().all(|t| t.from != t.to));
    assert!(report.transfers.iter().all(|t| t.to != address));
    assert_eq!(backend.raw_notes(&address).len(), 1);
    assert_eq!(stack.read_metadata(&address).unwrap().len(), 1);
}

#[test]
fn removed_scenario_without_metadata_is_skipped() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();

    tree.write_feature("login.feature", "Login", &[("Login failure", LOGIN_STEPS)]);
    let report = stack.migrate().unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert!(report.transfers.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NoMetadata);
}

#[test]
fn unrecoverable_story_text_is_skipped() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (backend, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();

    let story = stack.resolve_story("login").unwrap();
    let story_address = stack.story_address(&story).unwrap();
    backend.forget_object(&story_address);
    tree.remove("login.feature");
    tree.write_feature("cart.feature", "Cart", &[("Add item", &["an empty cart"])]);

    let report = stack.migrate().unwrap();
    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert!(report.transfers.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::ContentUnavailable {
            story_id: story_address
        }
    );
}

#[test]
fn unrelated_replacement_copies_nothing() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();

    tree.write_feature(
        "login.feature",
        "Login",
        &[("Checkout works", &["a full basket", "payment accepted"])],
    );
    let report = stack.migrate().unwrap();
    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert!(report.transfers.is_empty());
    assert!(stack
        .scenario_metadata("Checkout works", None)
        .unwrap()
        .is_empty());
}

#[test]
fn snapshot_is_persisted_before_metadata_copy() {
    let tree = FeatureTree::new();
    tree.write_feature("login.feature", "Login", &[("Login fails", LOGIN_STEPS)]);
    let (backend, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login fails", None, "owner", "alice")
        .unwrap();

    tree.write_feature("login.feature", "Login", &[("Login failure", LOGIN_STEPS)]);
    backend.fail_writes_after(1);

    let err = stack.migrate().unwrap_err();
    assert!(err.is_backend());

    // The snapshot write went through, so the pass is not repeated
    let report = stack.migrate().unwrap();
    assert_eq!(report.outcome, MigrationOutcome::Unchanged);
    assert!(stack
        .scenario_metadata("Login failure", None)
        .unwrap()
        .is_empty());
}

#[test]
fn moved_scenario_is_handled_as_unchanged_content() {
    let tree = FeatureTree::new();
    tree.write_feature(
        "login.feature",
        "Login",
        &[("Login fails", LOGIN_STEPS), ("Login works", &["a user"])],
    );
    let (_, stack) = memory_stack(&tree);
    stack.migrate().unwrap();
    stack
        .add_scenario_metadata("Login works", None, "owner", "bob")
        .unwrap();

    tree.write_feature(
        "login.feature",
        "Login",
        &[("Login works", &["a user"]), ("Login fails", LOGIN_STEPS)],
    );
    stack.migrate().unwrap();

    let entries = stack.scenario_metadata("Login works", None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, "bob");
}

fn scenario_name() -> impl Strategy<Value = String> {
    "[a-z]{3,8}( [a-z]{3,8})?"
}

fn story_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    proptest::collection::vec(
        (
            scenario_name(),
            proptest::collection::vec("[a-z]{3,8} [a-z]{3,8}", 1..3),
        ),
        1..4,
    )
}

fn write_tree(tree: &FeatureTree, stories: &[Vec<(String, Vec<String>)>]) {
    for (index, scenarios) in stories.iter().enumerate() {
        let steps: Vec<Vec<&str>> = scenarios
            .iter()
            .map(|(_, steps)| steps.iter().map(String::as_str).collect())
            .collect();
        let scenarios: Vec<(&str, &[&str])> = scenarios
            .iter()
            .zip(&steps)
            .map(|((name, _), steps)| (name.as_str(), steps.as_slice()))
            .collect();
        tree.write_feature(
            &format!("story{index}.feature"),
            &format!("Story {index}"),
            &scenarios,
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn repeated_pass_copies_nothing(
        before in proptest::collection::vec(story_strategy(), 1..3),
        after in proptest::collection::vec(story_strategy(), 1..3),
    ) {
        let tree = FeatureTree::new();
        write_tree(&tree, &before);
        let (backend, stack) = memory_stack(&tree);
        stack.migrate().unwrap();

        for story in 0..before.len() {
            tree.remove(&format!("story{story}.feature"));
        }
        write_tree(&tree, &after);
        stack.migrate().unwrap();
        let writes = backend.note_writes();

        let again = stack.migrate().unwrap();
        prop_assert_eq!(again.outcome, MigrationOutcome::Unchanged);
        prop_assert_eq!(again.copied_entries(), 0);
        prop_assert_eq!(backend.note_writes(), writes);
    }
}
