//! Process-wide node identifiers.
//!
//! All hierarchies draw from one counter so that IDs never collide across
//! instances. The counter starts at 0 when the process starts and is never
//! reset or wrapped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::domain::error::{HierarchyError, HierarchyResult};

/// Unique identity of a node for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ID source backed by an atomic counter.
#[derive(Debug)]
pub struct NodeIdGenerator {
    next: AtomicU64,
}

static GLOBAL: NodeIdGenerator = NodeIdGenerator::starting_at(0);

impl NodeIdGenerator {
    /// Generator whose first issued ID is `first`.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The generator shared by every hierarchy in the process.
    pub fn global() -> &'static NodeIdGenerator {
        &GLOBAL
    }

    /// Issue the next ID.
    ///
    /// `u64::MAX` is reserved as the exhaustion marker, so the last ID ever
    /// issued is `u64::MAX - 1`. Once exhausted, every call fails.
    pub fn next(&self) -> HierarchyResult<NodeId> {
        let issued = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| HierarchyError::IdSpaceExhausted)?;
        trace!(id = issued, "issued node id");
        Ok(NodeId(issued))
    }
}
