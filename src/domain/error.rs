//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::id::NodeId;

/// Domain errors represent violations of the hierarchy's structural rules.
/// These are independent of projection or I/O concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("node does not belong to this hierarchy: {0}")]
    InvalidReference(NodeId),

    #[error("invalid operation on node {node}: {reason}")]
    InvalidOperation { node: String, reason: String },

    /// Fatal: the process-wide ID counter cannot issue another ID.
    #[error("node id space exhausted")]
    IdSpaceExhausted,
}

impl HierarchyError {
    pub(crate) fn invalid_operation(node: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
