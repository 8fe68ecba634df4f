//! Controller operations on [`SpecStack`]

use pretty_assertions::assert_eq;
use specnote_core::{Hook, MigrationOutcome, SpecStack, StackConfig, StackError};
use specnote_store::StoreError;
use specnote_test_utils::{commit_all, git_repository, memory_stack, FeatureTree};

fn login_tree() -> FeatureTree {
    let tree = FeatureTree::new();
    tree.write_feature(
        "login.feature",
        "Login",
        &[
            ("Login A", &["a user"]),
            ("Login B", &["another user"]),
        ],
    );
    tree.write_feature("shop/cart.feature", "Cart", &[("Add item", &["an empty cart"])]);
    tree
}

#[test]
fn resolves_stories_by_path_and_name() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    assert_eq!(stack.resolve_story("shop/cart").unwrap().name, "Cart");
    assert_eq!(stack.resolve_story("Login").unwrap().name, "Login");
}

#[test]
fn equally_close_scenarios_are_ambiguous() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    let err = stack.resolve_scenario("Login", None).unwrap_err();
    assert!(err.is_ambiguous(), "{err}");
}

#[test]
fn unrelated_query_is_not_found() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    assert!(stack.resolve_scenario("zzz", None).unwrap_err().is_not_found());
    assert!(stack.resolve_story("zzz").unwrap_err().is_not_found());
}

#[test]
fn positional_scenario_within_story() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    let resolved = stack.resolve_scenario("2", Some("login")).unwrap();
    assert_eq!(resolved.scenario.name, "Login B");
    assert_eq!(resolved.story.name, "Login");
}

#[test]
fn story_metadata_is_tied_to_story_text() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    stack.add_story_metadata("cart", "team", "checkout").unwrap();
    let entries = stack.story_metadata("cart").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, "checkout");

    tree.write_feature(
        "shop/cart.feature",
        "Cart",
        &[("Add item", &["an empty cart", "a new step"])],
    );
    assert!(stack.story_metadata("cart").unwrap().is_empty());
}

#[test]
fn later_writes_replace_earlier_ones() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    stack
        .add_scenario_metadata("Add item", None, "status", "draft")
        .unwrap();
    stack
        .add_scenario_metadata("Add item", None, "status", "done")
        .unwrap();
    stack
        .add_scenario_metadata("Add item", None, "owner", "carol")
        .unwrap();

    let entries = stack.scenario_metadata("Add item", None).unwrap();
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(pairs, [("owner", "carol"), ("status", "done")]);
}

#[test]
fn delete_metadata_hides_entry() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    let resolved = stack.resolve_scenario("Add item", None).unwrap();
    let address = stack.scenario_address(&resolved.scenario).unwrap();
    stack.write_metadata(&address, "owner", "carol").unwrap();
    stack.write_metadata(&address, "status", "done").unwrap();

    assert_eq!(stack.delete_metadata(&address, "owner").unwrap(), 1);
    let names: Vec<String> = stack
        .read_metadata(&address)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["status"]);

    let err = stack.delete_metadata(&address, "owner").unwrap_err();
    assert!(matches!(
        err,
        StackError::Store(StoreError::NoMatchingEntry { .. })
    ));
}

#[test]
fn every_hook_runs_a_pass() {
    let tree = login_tree();
    let (_, stack) = memory_stack(&tree);

    assert_eq!(
        stack.run_hook(Hook::PostCommit).unwrap().outcome,
        MigrationOutcome::Baseline
    );
    assert_eq!(
        stack.run_hook(Hook::PostMerge).unwrap().outcome,
        MigrationOutcome::Unchanged
    );
    assert_eq!(
        stack.run_hook(Hook::PostUpdate).unwrap().outcome,
        MigrationOutcome::Unchanged
    );
    assert_eq!(
        stack.run_hook(Hook::PrePush).unwrap().outcome,
        MigrationOutcome::Unchanged
    );
}

#[test]
fn open_requires_a_repository() {
    let tree = FeatureTree::new();
    if git_repository().is_none() {
        return;
    }
    let err = SpecStack::open(tree.path(), StackConfig::new()).unwrap_err();
    assert!(err.is_backend());
}

#[test]
fn git_stack_migrates_renamed_scenario() {
    let Some(repo) = git_repository() else {
        return;
    };
    let tree_root = repo.path();
    let feature = tree_root.join("features/login.feature");
    std::fs::create_dir_all(feature.parent().unwrap()).unwrap();
    std::fs::write(
        &feature,
        specnote_test_utils::feature_text("Login", &[("Login fails", &["a user", "a bad password"])]),
    )
    .unwrap();
    commit_all(tree_root, "add login");

    let stack = SpecStack::open(tree_root, StackConfig::new()).unwrap();
    assert_eq!(stack.migrate().unwrap().outcome, MigrationOutcome::Baseline);
    stack
        .add_scenario_metadata("Login fails", Some("login"), "owner", "alice")
        .unwrap();

    std::fs::write(
        &feature,
        specnote_test_utils::feature_text(
            "Login",
            &[("Login failure", &["a user", "a bad password"])],
        ),
    )
    .unwrap();
    commit_all(tree_root, "rename scenario");

    let report = stack.run_hook(Hook::PostCommit).unwrap();
    assert_eq!(report.outcome, MigrationOutcome::Migrated);
    assert_eq!(report.copied_entries(), 1);

    let entries = stack.scenario_metadata("Login failure", None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, "alice");
}
