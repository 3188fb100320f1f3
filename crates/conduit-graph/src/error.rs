//! Error types for conduit-graph.

use thiserror::Error;

use crate::NodeId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by graph construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An edge referenced a node that is not in this graph.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
}
