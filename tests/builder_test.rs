//! Fixture files on disk to hierarchies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use a11y_hierarchy::application::{ApplicationError, BuiltHierarchy, HierarchyBuilder};
use a11y_hierarchy::config::Settings;
use a11y_hierarchy::domain::{HierarchyDisplay, HierarchyError, Rect, Role};
use a11y_hierarchy::infrastructure::di::ServiceContainer;
use a11y_hierarchy::infrastructure::traits::RealFileSystem;
use a11y_hierarchy::infrastructure::{FixtureLoader, InfraError};
use a11y_hierarchy::util::testing;
use rstest::rstest;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/fixtures")
}

fn load(name: &str, flatten: bool) -> Result<BuiltHierarchy, ApplicationError> {
    testing::init_test_setup();
    let loader = FixtureLoader::new(Arc::new(RealFileSystem));
    let fixture = loader.load(&fixture_dir().join(name)).expect("fixture loads");
    HierarchyBuilder::new().flatten(flatten).build(&fixture)
}

fn keys_of(built: &BuiltHierarchy, ids: &[a11y_hierarchy::NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| built.key_of(id).unwrap_or("?").to_string())
        .collect()
}

#[test]
fn given_dialog_fixture_when_building_then_shape_matches_file() {
    let built = load("dialog.toml", false).unwrap();
    let h = &built.hierarchy;

    assert_eq!(h.len(), 9);
    assert_eq!(h.depth(), 3);
    assert_eq!(keys_of(&built, h.roots()), ["window", "toolbar"]);

    let window = built.id("window").unwrap();
    assert_eq!(
        keys_of(&built, h.node(window).unwrap().children()),
        ["title", "body", "buttons"]
    );
    let buttons = built.id("buttons").unwrap();
    assert_eq!(
        keys_of(&built, h.node(buttons).unwrap().children()),
        ["ok", "cancel"]
    );
    assert!(h.validate().is_ok());
}

#[test]
fn given_dialog_fixture_when_building_then_attributes_and_frames_applied() {
    let built = load("dialog.toml", false).unwrap();
    let h = &built.hierarchy;

    let search = h.node(built.id("search").unwrap()).unwrap();
    assert_eq!(search.role, Role::SearchField);
    assert_eq!(search.label.as_deref(), Some("Filter"));
    assert_eq!(search.hint.as_deref(), Some("Type to filter files"));
    assert!(search.is_active);
    assert_eq!(search.frame(), Rect::new(20.0, 200.0, 300.0, 30.0));

    let cancel = h.node(built.id("cancel").unwrap()).unwrap();
    assert!(cancel.state.selected);
    assert!(!cancel.state.disabled);

    let body = h.node(built.id("body").unwrap()).unwrap();
    assert_eq!(body.label, None);
}

#[rstest]
#[case::detached_root(100.0, 620.0, Some("toolbar"))]
#[case::first_registered_wins(610.0, 560.0, Some("window"))]
#[case::outside_everything(900.0, 900.0, None)]
#[case::right_edge_exclusive(800.0, 10.0, None)]
fn given_dialog_when_hit_testing_then_returns_first_registered_match(
    #[case] x: f32,
    #[case] y: f32,
    #[case] expected: Option<&str>,
) {
    let built = load("dialog.toml", false).unwrap();
    let hit = built.hierarchy.find_at(x, y);
    assert_eq!(hit.and_then(|id| built.key_of(id)), expected);
}

#[test]
fn given_dialog_when_querying_lca_then_uses_fixture_structure() {
    let built = load("dialog.toml", false).unwrap();
    let h = &built.hierarchy;
    let lca = h.lowest_common_ancestor(built.id("ok"), built.id("search"));
    assert_eq!(lca, built.id("window"));
    let lca = h.lowest_common_ancestor(built.id("ok"), built.id("cancel"));
    assert_eq!(lca, built.id("buttons"));
    let lca = h.lowest_common_ancestor(built.id("ok"), built.id("toolbar"));
    assert_eq!(lca, None);
}

#[test]
fn given_flatten_when_building_then_every_node_is_root_in_pre_order() {
    let built = load("dialog.toml", true).unwrap();
    let h = &built.hierarchy;

    assert_eq!(h.len(), 9);
    assert_eq!(h.depth(), 1);
    assert_eq!(
        keys_of(&built, h.roots()),
        ["window", "title", "body", "message", "search", "buttons", "ok", "cancel", "toolbar"]
    );
    assert_eq!(h.lowest_common_ancestor(built.id("ok"), built.id("cancel")), None);
}

#[test]
fn given_dialog_when_rendering_then_tree_lists_roles_and_labels() {
    let built = load("dialog.toml", false).unwrap();
    let rendered = built.hierarchy.to_tree_string(false).to_string();
    assert!(rendered.contains("Confirm [Container]"));
    assert!(rendered.contains("OK [Button]"));
    assert!(!rendered.contains(" @ "));
}

#[rstest]
#[case::cycle("cycle.toml")]
#[case::duplicate_key("duplicate.toml")]
#[case::unknown_parent("unknown_parent.toml")]
fn given_broken_fixture_when_building_then_domain_error(#[case] name: &str) {
    let domain = match load(name, false).unwrap_err() {
        ApplicationError::Domain(domain) => domain,
        other => panic!("expected domain error, got {other:?}"),
    };
    match name {
        "cycle.toml" => assert!(matches!(domain, HierarchyError::InvalidOperation { .. })),
        _ => assert!(matches!(domain, HierarchyError::InvalidArgument(_))),
    }
}

#[test]
fn given_settings_fixture_dir_when_loading_relative_path_then_resolves_against_it() {
    testing::init_test_setup();
    let settings = Settings {
        fixture_dir: Some(fixture_dir()),
        flatten: true,
        ..Default::default()
    };
    let container = ServiceContainer::with_deps(settings, Arc::new(RealFileSystem));

    let fixture = container.loader().load(Path::new("dialog.toml")).unwrap();
    let built = container.builder().build(&fixture).unwrap();
    assert_eq!(built.hierarchy.roots().len(), 9);
}

#[test]
fn given_missing_fixture_when_loading_then_not_found() {
    let loader = FixtureLoader::new(Arc::new(RealFileSystem));
    let err = loader
        .load(&fixture_dir().join("does_not_exist.toml"))
        .unwrap_err();
    assert!(matches!(err, InfraError::FixtureNotFound(_)));
}
