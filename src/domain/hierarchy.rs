use std::collections::{BTreeMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::error::{HierarchyError, HierarchyResult};
use crate::domain::id::{NodeId, NodeIdGenerator};
use crate::domain::iter::{PostOrderIterator, PreOrderIterator};
use crate::domain::node::Node;
use crate::domain::projection::{NativeProjection, NullProjection};

/// Callback fired after a batch frame refresh.
pub type ChangeListener<P> = Box<dyn FnMut(&Hierarchy<P>)>;

/// Arena-backed accessibility hierarchy.
///
/// The hierarchy is the only owner of its nodes: `by_id` maps each
/// process-unique [`NodeId`] to an arena slot, and parent/child links are
/// plain IDs into that table. Because IDs are issued monotonically, iterating
/// `by_id` yields nodes in registration order.
///
/// Mutation is single-writer; callers serialize access to one instance.
pub struct Hierarchy<P: NativeProjection = NullProjection> {
    nodes: Arena<Node>,
    by_id: BTreeMap<NodeId, Index>,
    roots: Vec<NodeId>,
    ids: &'static NodeIdGenerator,
    projection: P,
    listeners: Vec<ChangeListener<P>>,
}

impl<P: NativeProjection + fmt::Debug> fmt::Debug for Hierarchy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("nodes", &self.by_id.len())
            .field("roots", &self.roots)
            .field("projection", &self.projection)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Hierarchy<NullProjection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy<NullProjection> {
    /// Hierarchy without a native side.
    pub fn new() -> Self {
        Self::with_projection(NullProjection)
    }
}

/// Out-of-range positions append.
fn clamp_index(index: usize, len: usize) -> usize {
    if index > len {
        trace!(index, len, "index clamped to append position");
    }
    index.min(len)
}

impl<P: NativeProjection> Hierarchy<P> {
    pub fn with_projection(projection: P) -> Self {
        Self::with_generator(NodeIdGenerator::global(), projection)
    }

    /// Hierarchy drawing IDs from `ids` instead of the process-wide generator.
    pub fn with_generator(ids: &'static NodeIdGenerator, projection: P) -> Self {
        Self {
            nodes: Arena::new(),
            by_id: BTreeMap::new(),
            roots: Vec::new(),
            ids,
            projection,
            listeners: Vec::new(),
        }
    }

    // ------------------------------------------------------------
    // lookup
    // ------------------------------------------------------------

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.by_id
            .get(&id)
            .and_then(|&slot| self.nodes.get(slot))
            .filter(|node| node.id() == id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = *self.by_id.get(&id)?;
        self.nodes.get_mut(slot).filter(|node| node.id() == id)
    }

    fn require(&self, id: NodeId) -> HierarchyResult<&Node> {
        self.get(id).ok_or(HierarchyError::InvalidReference(id))
    }

    fn require_mut(&mut self, id: NodeId) -> HierarchyResult<&mut Node> {
        self.get_mut(id).ok_or(HierarchyError::InvalidReference(id))
    }

    /// Child list of `parent`, or the root list when `parent` is `None`.
    fn siblings(&self, parent: Option<NodeId>) -> HierarchyResult<&[NodeId]> {
        match parent {
            Some(p) => Ok(self.require(p)?.children()),
            None => Ok(self.roots.as_slice()),
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> HierarchyResult<&mut Vec<NodeId>> {
        match parent {
            Some(p) => Ok(&mut self.require_mut(p)?.children),
            None => Ok(&mut self.roots),
        }
    }

    /// True iff `id` is registered here and its slot still holds that node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.get(id)
    }

    /// Mutable access for attribute edits (label, role, value, ...).
    /// Structural links stay read-only.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.get_mut(id)
    }

    pub fn set_label(&mut self, id: NodeId, label: Option<&str>) -> HierarchyResult<()> {
        self.require_mut(id)?.label = label.map(str::to_owned);
        Ok(())
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut P {
        &mut self.projection
    }

    pub fn parent_of(&self, id: NodeId) -> HierarchyResult<Option<NodeId>> {
        Ok(self.require(id)?.parent())
    }

    /// Position of `id` within its parent's children, or within the roots.
    pub fn index_of(&self, id: NodeId) -> HierarchyResult<usize> {
        let parent = self.require(id)?.parent();
        self.siblings(parent)?
            .iter()
            .position(|&sibling| sibling == id)
            .ok_or_else(|| {
                HierarchyError::invalid_operation(id, "node missing from its parent's child list")
            })
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(Node::parent), move |&current| {
            self.get(current).and_then(Node::parent)
        })
    }

    /// Path from the root down to `id`, both inclusive.
    pub fn path_to_root(&self, id: NodeId) -> HierarchyResult<Vec<NodeId>> {
        self.require(id)?;
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path.push(id);
        Ok(path)
    }

    pub fn iter(&self) -> PreOrderIterator<'_, P> {
        PreOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, P> {
        PostOrderIterator::new(self)
    }

    /// Node count of the longest root-to-leaf path; 0 when empty.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get(id) {
                stack.extend(node.children().iter().map(|&c| (c, depth + 1)));
            }
        }
        max_depth
    }

    // ------------------------------------------------------------
    // structural mutation
    // ------------------------------------------------------------

    /// Create a node under `parent` (or as a root) at position `index`.
    ///
    /// An `index` past the end appends.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        label: Option<&str>,
        index: usize,
    ) -> HierarchyResult<NodeId> {
        if let Some(p) = parent {
            self.require(p)?;
        }
        let id = self.ids.next()?;
        let node = Node::new(id, label.map(str::to_owned), parent);
        self.projection.allocate(&node);
        let slot = self.nodes.insert(node);
        self.by_id.insert(id, slot);

        let siblings = self.siblings_mut(parent)?;
        let at = clamp_index(index, siblings.len());
        siblings.insert(at, id);
        debug!(%id, ?parent, at, "inserted node");
        Ok(id)
    }

    /// Append a node as the last child of `parent` (or the last root).
    pub fn add(&mut self, parent: Option<NodeId>, label: Option<&str>) -> HierarchyResult<NodeId> {
        self.insert(parent, label, usize::MAX)
    }

    /// Reparent `id` under `new_parent` at `new_index`.
    ///
    /// `new_index` is interpreted after `id` has been detached and is
    /// clamped like in [`insert`](Self::insert). Returns `false` when the
    /// node already sits at the requested place. On error nothing changes.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
        new_index: usize,
    ) -> HierarchyResult<bool> {
        let old_parent = self.require(id)?.parent();
        if new_parent == Some(id) {
            return Err(HierarchyError::invalid_operation(
                id,
                "a node cannot be its own parent",
            ));
        }
        if let Some(p) = new_parent {
            self.require(p)?;
            if self.ancestors(p).any(|ancestor| ancestor == id) {
                return Err(HierarchyError::invalid_operation(
                    id,
                    format!("moving under descendant {} would create a cycle", p),
                ));
            }
        }

        let old_index = self.index_of(id)?;
        if old_parent == new_parent {
            let remaining = self.siblings(old_parent)?.len() - 1;
            if clamp_index(new_index, remaining) == old_index {
                trace!(%id, "move is a no-op");
                return Ok(false);
            }
        }

        self.siblings_mut(old_parent)?.remove(old_index);
        let siblings = self.siblings_mut(new_parent)?;
        let at = clamp_index(new_index, siblings.len());
        siblings.insert(at, id);
        self.require_mut(id)?.parent = new_parent;
        debug!(%id, ?old_parent, ?new_parent, at, "moved node");
        Ok(true)
    }

    /// Remove `id` from the hierarchy.
    ///
    /// With `remove_children` the whole subtree goes. Otherwise the children
    /// take the removed node's place in its parent (or among the roots),
    /// keeping their order.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: NodeId, remove_children: bool) -> HierarchyResult<()> {
        let node = self.require(id)?;
        let parent = node.parent();
        let children = node.children().to_vec();
        let position = self.index_of(id)?;

        let siblings = self.siblings_mut(parent)?;
        siblings.remove(position);

        if remove_children {
            let removed = self.destroy_subtree(id);
            debug!(%id, removed, "removed subtree");
        } else {
            for (offset, &child) in children.iter().enumerate() {
                siblings.insert(position + offset, child);
            }
            for &child in &children {
                self.require_mut(child)?.parent = parent;
            }
            self.unregister(id);
            debug!(%id, grafted = children.len(), ?parent, "removed node, children grafted");
        }
        Ok(())
    }

    /// Remove every root together with its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            self.destroy_subtree(root);
        }
    }

    /// Drop `id` from the table and release its native side.
    fn unregister(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.by_id.remove(&id)?;
        let node = self.nodes.remove(slot)?;
        node.destroy(&mut self.projection);
        trace!(%id, "unregistered node");
        Some(node)
    }

    /// Unregister `root` and all its descendants; returns how many went.
    fn destroy_subtree(&mut self, root: NodeId) -> usize {
        let mut pending = vec![root];
        let mut removed = 0;
        while let Some(id) = pending.pop() {
            if let Some(node) = self.unregister(id) {
                pending.extend(node.children.iter().rev());
                removed += 1;
            }
        }
        removed
    }

    // ------------------------------------------------------------
    // queries
    // ------------------------------------------------------------

    /// First node, in registration order, whose cached frame contains the point.
    #[instrument(level = "trace", skip(self))]
    pub fn find_at(&self, x: f32, y: f32) -> Option<NodeId> {
        self.by_id.iter().find_map(|(&id, &slot)| {
            self.nodes
                .get(slot)
                .filter(|node| node.frame().contains(x, y))
                .map(|_| id)
        })
    }

    /// Deepest node that is an ancestor-or-self of both `a` and `b`.
    ///
    /// Returns `None` when either argument is missing or foreign, and for
    /// any query involving a root node: two roots share nothing above them,
    /// and a root paired with its own descendant also yields `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_common_ancestor(&self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        let (a, b) = (a?, b?);
        let (first, second) = (self.get(a)?, self.get(b)?);
        if first.is_root() || second.is_root() {
            return None;
        }

        let mut first_path = self.root_first_stack(a);
        let mut second_path = self.root_first_stack(b);
        let mut common = None;
        while let (Some(x), Some(y)) = (first_path.pop(), second_path.pop()) {
            if x != y {
                break;
            }
            common = Some(x);
        }
        common
    }

    /// Stack holding `id` and its ancestors, with the root on top.
    fn root_first_stack(&self, id: NodeId) -> Vec<NodeId> {
        let mut stack = vec![id];
        stack.extend(self.ancestors(id));
        stack
    }

    // ------------------------------------------------------------
    // geometry
    // ------------------------------------------------------------

    /// Recompute every node's frame, then notify listeners once.
    #[instrument(level = "debug", skip(self))]
    pub fn refresh_frames(&mut self) {
        let projection = &self.projection;
        for (_, node) in self.nodes.iter_mut() {
            let frame = projection.compute_frame(node);
            node.frame = frame;
        }
        debug!(nodes = self.by_id.len(), "frames refreshed");
        self.notify_changed();
    }

    /// Recompute a single node's frame without notifying.
    pub fn refresh_frame(&mut self, id: NodeId) -> HierarchyResult<()> {
        let frame = self.require(id)?.calculate_frame(&self.projection);
        self.require_mut(id)?.frame = frame;
        Ok(())
    }

    pub fn on_changed(&mut self, listener: impl FnMut(&Hierarchy<P>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify_changed(&mut self) {
        // listeners need `&mut` while the hierarchy is lent out as `&self`
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self);
        }
        self.listeners = listeners;
    }

    // ------------------------------------------------------------
    // invariants
    // ------------------------------------------------------------

    /// Check the structural invariants: every reachable node is registered
    /// under its own ID, parent links mirror child lists, nothing is visited
    /// twice (acyclic, single placement) and nothing registered is orphaned.
    pub fn validate(&self) -> HierarchyResult<()> {
        let mut seen = HashSet::new();
        let mut pending: Vec<(NodeId, Option<NodeId>)> =
            self.roots.iter().map(|&r| (r, None)).collect();

        while let Some((id, expected_parent)) = pending.pop() {
            let node = self.require(id)?;
            if !seen.insert(id) {
                return Err(HierarchyError::invalid_operation(id, "node reachable twice"));
            }
            if node.parent() != expected_parent {
                return Err(HierarchyError::invalid_operation(
                    id,
                    "parent link disagrees with child list",
                ));
            }
            pending.extend(node.children().iter().map(|&c| (c, Some(id))));
        }

        if seen.len() != self.by_id.len() {
            return Err(HierarchyError::invalid_operation(
                "hierarchy",
                format!(
                    "{} registered nodes unreachable from roots",
                    self.by_id.len() - seen.len()
                ),
            ));
        }
        Ok(())
    }
}
