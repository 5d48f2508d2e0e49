//! Boundary to the native (platform) side of the hierarchy.
//!
//! The hierarchy owns structure; a projection owns whatever the platform
//! needs to mirror it (native accessibility elements, geometry lookups).
//! Implementations live in `infrastructure::projection`.

use crate::domain::id::NodeId;
use crate::domain::node::{Node, Rect};

/// Native projection of hierarchy nodes.
pub trait NativeProjection {
    /// Materialize the native representation of a freshly inserted node.
    fn allocate(&mut self, node: &Node);

    /// Release the native representation of a node leaving the hierarchy.
    ///
    /// Called exactly once for every removed node, descendants included: the
    /// hierarchy walks removed subtrees itself and frees each node in turn, so
    /// an implementation releases `node` alone and never its descendants.
    fn free(&mut self, node: NodeId);

    /// Current screen bounds of a node.
    fn compute_frame(&self, node: &Node) -> Rect;
}

/// Projection for hierarchies without a native side: nothing to allocate or
/// free, and every frame is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProjection;

impl NativeProjection for NullProjection {
    fn allocate(&mut self, _node: &Node) {}

    fn free(&mut self, _node: NodeId) {}

    fn compute_frame(&self, _node: &Node) -> Rect {
        Rect::default()
    }
}
