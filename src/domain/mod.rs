//! Domain layer: the accessibility hierarchy and its nodes
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! The native side is reached only through the [`NativeProjection`] trait.

pub mod display;
pub mod error;
pub mod hierarchy;
pub mod id;
pub mod iter;
pub mod node;
pub mod projection;

pub use display::HierarchyDisplay;
pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::{ChangeListener, Hierarchy};
pub use id::{NodeId, NodeIdGenerator};
pub use node::{Node, NodeState, Rect, Role};
pub use projection::{NativeProjection, NullProjection};
