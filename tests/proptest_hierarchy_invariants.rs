//! Property-based invariant tests for hierarchy mutation.
//!
//! Random sequences of insert / move / remove must keep:
//!
//! 1. Parent links and child lists in agreement, with no cycles or orphans.
//! 2. A failed move leaving the structure untouched.
//! 3. Every registered node freed exactly once on its way out.
//! 4. LCA of a node with its own descendant being the node itself (non-roots).

use std::collections::BTreeSet;

use a11y_hierarchy::domain::{Hierarchy, NodeId};
use a11y_hierarchy::infrastructure::StaticProjection;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Node references are indices into the live node list, taken modulo its length.
#[derive(Debug, Clone)]
enum Op {
    Insert { parent: Option<usize>, index: usize },
    Move { node: usize, parent: Option<usize>, index: usize },
    Remove { node: usize, children: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (proptest::option::of(0usize..64), 0usize..8)
            .prop_map(|(parent, index)| Op::Insert { parent, index }),
        2 => (0usize..64, proptest::option::of(0usize..64), 0usize..8)
            .prop_map(|(node, parent, index)| Op::Move { node, parent, index }),
        1 => (0usize..64, any::<bool>())
            .prop_map(|(node, children)| Op::Remove { node, children }),
    ]
}

fn live(h: &Hierarchy<StaticProjection>) -> Vec<NodeId> {
    h.iter().map(|n| n.id()).collect()
}

fn pick(ids: &[NodeId], at: usize) -> Option<NodeId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[at % ids.len()])
    }
}

fn snapshot(h: &Hierarchy<StaticProjection>) -> Vec<(NodeId, Option<NodeId>)> {
    h.iter().map(|n| (n.id(), n.parent())).collect()
}

/// Apply `op`; failures are allowed but must not alter the structure.
fn apply(h: &mut Hierarchy<StaticProjection>, op: &Op) -> Result<(), TestCaseError> {
    let ids = live(h);
    match *op {
        Op::Insert { parent, index } => {
            let parent = parent.and_then(|p| pick(&ids, p));
            h.insert(parent, None, index)
                .map_err(|e| TestCaseError::fail(format!("insert failed: {e}")))?;
        }
        Op::Move { node, parent, index } => {
            let Some(node) = pick(&ids, node) else {
                return Ok(());
            };
            let parent = parent.and_then(|p| pick(&ids, p));
            let before = snapshot(h);
            if h.move_node(node, parent, index).is_err() {
                prop_assert_eq!(before, snapshot(h), "failed move changed the structure");
            }
        }
        Op::Remove { node, children } => {
            if let Some(node) = pick(&ids, node) {
                h.remove(node, children)
                    .map_err(|e| TestCaseError::fail(format!("remove failed: {e}")))?;
            }
        }
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Structure stays valid; failed moves are atomic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn random_mutations_keep_structure_valid(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut h = Hierarchy::with_projection(StaticProjection::new());
        for op in &ops {
            apply(&mut h, op)?;
            prop_assert!(h.validate().is_ok(), "invalid after {:?}: {:?}", op, h.validate());
        }
        prop_assert_eq!(h.len(), live(&h).len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Every node freed exactly once
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_node_freed_exactly_once(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut h = Hierarchy::with_projection(StaticProjection::new());
        for op in &ops {
            apply(&mut h, op)?;
        }
        let allocated = h.projection().allocations();
        h.clear();

        let freed = h.projection().freed();
        let unique: BTreeSet<NodeId> = freed.iter().copied().collect();
        prop_assert_eq!(unique.len(), freed.len(), "a node was freed twice");
        prop_assert_eq!(freed.len(), allocated);
        prop_assert_eq!(h.projection().live_count(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. LCA with a descendant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lca_with_descendant_is_ancestor(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut h = Hierarchy::with_projection(StaticProjection::new());
        for op in &ops {
            apply(&mut h, op)?;
        }
        for id in live(&h) {
            for ancestor in h.ancestors(id).collect::<Vec<_>>() {
                let expected = if h.node(ancestor).map_or(true, |n| n.is_root()) {
                    None
                } else {
                    Some(ancestor)
                };
                prop_assert_eq!(h.lowest_common_ancestor(Some(id), Some(ancestor)), expected);
            }
        }
    }
}
