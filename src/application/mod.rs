//! Application layer: fixtures and hierarchy construction
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod builder;
pub mod error;
pub mod fixture;

pub use builder::{BuiltHierarchy, HierarchyBuilder};
pub use error::{ApplicationError, ApplicationResult};
pub use fixture::{Fixture, FixtureNode};
