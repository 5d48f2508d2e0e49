//! Accessibility node hierarchy.
//!
//! A mutation-tracked tree of accessibility nodes as consumed by platform
//! screen reader bridges: insertion at arbitrary positions, re-parenting
//! with cycle detection, subtree removal with optional grafting of children,
//! point hit testing and lowest-common-ancestor queries.
//!
//! The core lives in [`domain`]; the native side is reached through
//! [`domain::NativeProjection`]. Fixture loading, settings and the `a11yh`
//! inspection CLI sit in the outer layers.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{Hierarchy, HierarchyError, HierarchyResult, NativeProjection, Node, NodeId, Rect};
