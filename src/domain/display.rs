/*
Rendering of a hierarchy as a termtree. One subtree per root, hung under a
synthetic "<hierarchy>" node so that forests print as a single tree.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::hierarchy::Hierarchy;
use crate::domain::id::NodeId;
use crate::domain::node::{Node, Role};
use crate::domain::projection::NativeProjection;

pub const HIERARCHY_ROOT_LABEL: &str = "<hierarchy>";

pub trait HierarchyDisplay {
    fn to_tree_string(&self, with_frames: bool) -> Tree<String>;
}

fn describe(node: &Node, with_frames: bool) -> String {
    let mut text = node.to_string();
    if node.role != Role::None {
        text.push_str(&format!(" [{:?}]", node.role));
    }
    if with_frames {
        text.push_str(&format!(" @ {}", node.frame()));
    }
    text
}

impl<P: NativeProjection> HierarchyDisplay for Hierarchy<P> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, with_frames: bool) -> Tree<String> {
        fn build<P: NativeProjection>(
            hierarchy: &Hierarchy<P>,
            id: NodeId,
            with_frames: bool,
        ) -> Option<Tree<String>> {
            let node = hierarchy.node(id)?;
            let leaves: Vec<_> = node
                .children()
                .iter()
                .filter_map(|&child| build(hierarchy, child, with_frames))
                .collect();
            Some(Tree::new(describe(node, with_frames)).with_leaves(leaves))
        }

        let leaves: Vec<_> = self
            .roots()
            .iter()
            .filter_map(|&root| build(self, root, with_frames))
            .collect();
        Tree::new(HIERARCHY_ROOT_LABEL.to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_nodes_when_rendering_then_shows_structure() {
        let mut h = Hierarchy::new();
        let root = h.add(None, Some("window")).unwrap();
        let button = h.add(Some(root), Some("ok")).unwrap();
        h.node_mut(button).unwrap().role = Role::Button;

        let rendered = h.to_tree_string(false).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], HIERARCHY_ROOT_LABEL);
        assert!(lines[1].ends_with(&format!("{} window", root)));
        assert!(lines[2].ends_with(&format!("{} ok [Button]", button)));
    }

    #[test]
    fn given_frames_requested_when_rendering_then_appends_frame() {
        let mut h = Hierarchy::new();
        h.add(None, Some("window")).unwrap();
        let rendered = h.to_tree_string(true).to_string();
        assert!(rendered.contains("@ (0, 0) 0x0"));
    }
}
