//! Native-side lifecycle: every node the hierarchy drops is released once.

use a11y_hierarchy::domain::{Hierarchy, NodeId};
use a11y_hierarchy::infrastructure::StaticProjection;
use a11y_hierarchy::Rect;
use rstest::{fixture, rstest};

/// root
/// ├── a
/// │   ├── a1
/// │   └── a2
/// │       └── deep
/// └── b
pub struct Tree {
    h: Hierarchy<StaticProjection>,
    root: NodeId,
    a: NodeId,
    a1: NodeId,
    a2: NodeId,
    deep: NodeId,
    b: NodeId,
}

#[fixture]
fn tree() -> Tree {
    let mut h = Hierarchy::with_projection(StaticProjection::new());
    let root = h.add(None, Some("root")).unwrap();
    let a = h.add(Some(root), Some("a")).unwrap();
    let a1 = h.add(Some(a), Some("a1")).unwrap();
    let a2 = h.add(Some(a), Some("a2")).unwrap();
    let deep = h.add(Some(a2), Some("deep")).unwrap();
    let b = h.add(Some(root), Some("b")).unwrap();
    Tree {
        h,
        root,
        a,
        a1,
        a2,
        deep,
        b,
    }
}

fn sorted(ids: &[NodeId]) -> Vec<NodeId> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids
}

#[rstest]
fn given_tree_when_built_then_every_node_allocated_and_live(tree: Tree) {
    let projection = tree.h.projection();
    assert_eq!(projection.allocations(), 6);
    assert_eq!(projection.live_count(), 6);
    assert!(projection.freed().is_empty());
}

#[rstest]
fn given_subtree_removal_when_removing_then_each_descendant_freed_once(mut tree: Tree) {
    tree.h.remove(tree.a, true).unwrap();

    let freed = sorted(tree.h.projection().freed());
    assert_eq!(freed, sorted(&[tree.a, tree.a1, tree.a2, tree.deep]));
    assert_eq!(tree.h.projection().live_count(), 2);
    assert!(tree.h.projection().is_live(tree.root));
    assert!(tree.h.projection().is_live(tree.b));
}

#[rstest]
fn given_graft_removal_when_removing_then_only_node_freed(mut tree: Tree) {
    tree.h.remove(tree.a2, false).unwrap();

    assert_eq!(tree.h.projection().freed(), &[tree.a2]);
    assert!(tree.h.projection().is_live(tree.deep));
    assert_eq!(tree.h.parent_of(tree.deep), Ok(Some(tree.a)));
}

#[rstest]
fn given_mixed_removals_when_clearing_then_nothing_freed_twice(mut tree: Tree) {
    tree.h.remove(tree.a2, false).unwrap();
    tree.h.remove(tree.b, true).unwrap();
    tree.h.clear();

    let freed = tree.h.projection().freed();
    assert_eq!(freed.len(), 6);
    assert_eq!(
        sorted(freed),
        sorted(&[tree.root, tree.a, tree.a1, tree.a2, tree.deep, tree.b])
    );
    assert_eq!(tree.h.projection().live_count(), 0);
}

#[rstest]
fn given_freed_node_when_refreshing_then_frame_table_entry_dropped(mut tree: Tree) {
    tree.h
        .projection_mut()
        .set_frame(tree.a1, Rect::new(0.0, 0.0, 10.0, 10.0));
    tree.h.remove(tree.a1, true).unwrap();

    let replacement = tree.h.add(Some(tree.a), Some("a1'")).unwrap();
    tree.h.refresh_frames();

    assert_eq!(tree.h.node(replacement).unwrap().frame(), Rect::default());
    assert_eq!(tree.h.find_at(5.0, 5.0), None);
}

#[rstest]
fn given_moves_when_reparenting_then_native_side_untouched(mut tree: Tree) {
    tree.h.move_node(tree.a2, Some(tree.b), 0).unwrap();
    tree.h.move_node(tree.a, None, 0).unwrap();

    assert_eq!(tree.h.projection().allocations(), 6);
    assert!(tree.h.projection().freed().is_empty());
}
