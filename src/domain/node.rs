use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::id::NodeId;
use crate::domain::projection::NativeProjection;

/// Screen-space rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x_max() && y >= self.y && y < self.y_max()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Semantic role announced by a screen reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    None,
    Button,
    Image,
    StaticText,
    SearchField,
    KeyboardKey,
    Header,
    TabBar,
    Slider,
    Toggle,
    Container,
}

/// Dynamic state flags of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeState {
    pub disabled: bool,
    pub selected: bool,
}

/// Vertex of the accessibility hierarchy.
///
/// Nodes are created and destroyed only by [`Hierarchy`](crate::domain::Hierarchy);
/// structural links are maintained there and are read-only from outside the crate.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    pub label: Option<String>,
    pub role: Role,
    pub value: Option<String>,
    pub hint: Option<String>,
    pub state: NodeState,
    pub is_active: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) frame: Rect,
}

impl Node {
    pub(crate) fn new(id: NodeId, label: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            label,
            role: Role::None,
            value: None,
            hint: None,
            state: NodeState::default(),
            is_active: true,
            parent,
            children: Vec::new(),
            frame: Rect::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Last computed screen bounds; see [`Hierarchy::refresh_frames`](crate::domain::Hierarchy::refresh_frames).
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Ask the projection for the current screen bounds without caching them.
    pub fn calculate_frame(&self, projection: &dyn NativeProjection) -> Rect {
        projection.compute_frame(self)
    }

    /// Release this node's native-side resources.
    pub(crate) fn destroy(&self, projection: &mut dyn NativeProjection) {
        projection.free(self.id);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {}", self.id, label),
            None => write!(f, "{}", self.id),
        }
    }
}
