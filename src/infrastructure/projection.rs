//! In-memory native projection.
//!
//! Stands in for a platform accessibility bridge: frames come from a table
//! filled by the caller, and the set of live native handles is tracked so
//! that allocation/release pairing can be inspected.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::domain::{NativeProjection, Node, NodeId, Rect};

#[derive(Debug, Default, Clone)]
pub struct StaticProjection {
    frames: HashMap<NodeId, Rect>,
    live: BTreeSet<NodeId>,
    allocations: usize,
    freed: Vec<NodeId>,
}

impl StaticProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen bounds reported for `node` on the next frame computation.
    pub fn set_frame(&mut self, node: NodeId, frame: Rect) {
        self.frames.insert(node, frame);
    }

    pub fn is_live(&self, node: NodeId) -> bool {
        self.live.contains(&node)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Released nodes, in release order.
    pub fn freed(&self) -> &[NodeId] {
        &self.freed
    }
}

impl NativeProjection for StaticProjection {
    fn allocate(&mut self, node: &Node) {
        trace!(id = %node.id(), "allocate native node");
        self.live.insert(node.id());
        self.allocations += 1;
    }

    fn free(&mut self, node: NodeId) {
        trace!(id = %node, "free native node");
        self.live.remove(&node);
        self.frames.remove(&node);
        self.freed.push(node);
    }

    fn compute_frame(&self, node: &Node) -> Rect {
        if !self.is_live(node.id()) {
            return Rect::default();
        }
        self.frames.get(&node.id()).copied().unwrap_or_default()
    }
}
