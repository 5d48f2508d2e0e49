//! Builds a hierarchy from a fixture.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, instrument};

use crate::application::fixture::{Fixture, FixtureNode};
use crate::application::ApplicationResult;
use crate::domain::{Hierarchy, HierarchyError, NodeId};
use crate::infrastructure::StaticProjection;

/// Hierarchy plus the fixture keys of its nodes.
#[derive(Debug)]
pub struct BuiltHierarchy {
    pub hierarchy: Hierarchy<StaticProjection>,
    pub keys: BTreeMap<String, NodeId>,
}

impl BuiltHierarchy {
    pub fn id(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    pub fn key_of(&self, id: NodeId) -> Option<&str> {
        self.keys
            .iter()
            .find(|(_, &candidate)| candidate == id)
            .map(|(key, _)| key.as_str())
    }
}

/// Constructs hierarchies from fixtures.
///
/// With `flatten`, every node becomes a root in pre-order: the flat element
/// list some platform bridges expect instead of a nested tree.
#[derive(Debug, Default, Clone)]
pub struct HierarchyBuilder {
    flatten: bool,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    #[instrument(level = "debug", skip(self, fixture))]
    pub fn build(&self, fixture: &Fixture) -> ApplicationResult<BuiltHierarchy> {
        let ordered = pre_order(fixture)?;

        let mut hierarchy = Hierarchy::with_projection(StaticProjection::new());
        let mut keys = BTreeMap::new();
        for spec in ordered {
            let parent = match (&spec.parent, self.flatten) {
                (Some(parent_key), false) => keys.get(parent_key.as_str()).copied(),
                _ => None,
            };
            let id = hierarchy.add(parent, spec.label.as_deref())?;
            if let Some(node) = hierarchy.node_mut(id) {
                node.role = spec.role;
                node.value = spec.value.clone();
                node.hint = spec.hint.clone();
                node.state = spec.state;
                node.is_active = spec.active;
            }
            hierarchy.projection_mut().set_frame(id, spec.frame);
            keys.insert(spec.key.clone(), id);
        }
        hierarchy.refresh_frames();
        debug!(nodes = keys.len(), flatten = self.flatten, "hierarchy built");

        Ok(BuiltHierarchy { hierarchy, keys })
    }
}

/// Fixture nodes ordered parents-first, siblings in fixture order.
///
/// Rejects duplicate keys, unknown parents and parent cycles.
fn pre_order(fixture: &Fixture) -> ApplicationResult<Vec<&FixtureNode>> {
    let mut known = HashSet::new();
    for node in &fixture.nodes {
        if !known.insert(node.key.as_str()) {
            return Err(HierarchyError::InvalidArgument(format!(
                "duplicate node key '{}'",
                node.key
            ))
            .into());
        }
    }

    let mut roots = Vec::new();
    let mut children: HashMap<&str, Vec<&FixtureNode>> = HashMap::new();
    for node in &fixture.nodes {
        match node.parent.as_deref() {
            None => roots.push(node),
            Some(parent) if !known.contains(parent) => {
                return Err(HierarchyError::InvalidArgument(format!(
                    "node '{}' names unknown parent '{}'",
                    node.key, parent
                ))
                .into());
            }
            Some(parent) => children.entry(parent).or_default().push(node),
        }
    }

    let mut ordered = Vec::with_capacity(fixture.nodes.len());
    let mut stack: Vec<&FixtureNode> = roots.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        ordered.push(node);
        if let Some(kids) = children.get(node.key.as_str()) {
            stack.extend(kids.iter().rev());
        }
    }

    // Every node has a known parent, so whatever stays unreached hangs off a cycle
    if ordered.len() != fixture.nodes.len() {
        let reached: HashSet<&str> = ordered.iter().map(|n| n.key.as_str()).collect();
        let stuck = fixture
            .nodes
            .iter()
            .find(|n| !reached.contains(n.key.as_str()))
            .map(|n| n.key.clone())
            .unwrap_or_default();
        return Err(
            HierarchyError::invalid_operation(stuck, "parent chain forms a cycle").into(),
        );
    }
    Ok(ordered)
}
