//! Depth-first traversals over all roots of a hierarchy, left to right.

use tracing::instrument;

use crate::domain::hierarchy::Hierarchy;
use crate::domain::id::NodeId;
use crate::domain::node::Node;
use crate::domain::projection::NativeProjection;

pub struct PreOrderIterator<'a, P: NativeProjection> {
    hierarchy: &'a Hierarchy<P>,
    stack: Vec<NodeId>,
}

impl<'a, P: NativeProjection> PreOrderIterator<'a, P> {
    pub(crate) fn new(hierarchy: &'a Hierarchy<P>) -> Self {
        let stack = hierarchy.roots().iter().rev().copied().collect();
        Self { hierarchy, stack }
    }
}

impl<'a, P: NativeProjection> Iterator for PreOrderIterator<'a, P> {
    type Item = &'a Node;

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.hierarchy.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children().iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, P: NativeProjection> {
    hierarchy: &'a Hierarchy<P>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, P: NativeProjection> PostOrderIterator<'a, P> {
    pub(crate) fn new(hierarchy: &'a Hierarchy<P>) -> Self {
        let stack = hierarchy
            .roots()
            .iter()
            .rev()
            .map(|&root| (root, false))
            .collect();
        Self { hierarchy, stack }
    }
}

impl<'a, P: NativeProjection> Iterator for PostOrderIterator<'a, P> {
    type Item = &'a Node;

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.hierarchy.node(current) {
                if visited {
                    return Some(node);
                }
                self.stack.push((current, true));
                for &child in node.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
