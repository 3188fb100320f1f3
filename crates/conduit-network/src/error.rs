//! Error types for conduit-network.
//!
//! Everything except [`Error::Serialization`] and [`Error::MalformedRecord`]
//! means the caller broke the "connectivity graph matches actual adjacency"
//! invariant. The operation that raised it is aborted before any state
//! changes.

use conduit_topology::Position;
use thiserror::Error;

use crate::{NetworkId, NetworkType, SegmentType};

/// Result type for conduit-network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in network operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A segment already occupies the position.
    #[error("segment at {0} already exists")]
    DuplicateSegment(Position),

    /// No segment occupies the position.
    #[error("segment at {0} was not found")]
    SegmentNotFound(Position),

    /// Two linked same-type segments point at different networks.
    #[error("segment at {position} belongs to {found:?}, expected {expected}")]
    InconsistentNetwork {
        position: Position,
        expected: NetworkId,
        found: Option<NetworkId>,
    },

    /// A linked segment has no network at all.
    #[error("segment at {0} has no network")]
    OrphanSegment(Position),

    /// A network id is referenced but not registered with the manager.
    #[error("network {0} not found")]
    NetworkNotFound(NetworkId),

    /// Two networks that should merge declare different types.
    #[error("cannot merge network of type {found} into network of type {expected}")]
    NetworkTypeMismatch {
        expected: NetworkType,
        found: NetworkType,
    },

    /// No factory registered for a segment type.
    #[error("unknown segment type {0}")]
    UnknownSegmentType(SegmentType),

    /// No factory registered for a network type.
    #[error("unknown network type {0}")]
    UnknownNetworkType(NetworkType),

    /// Position cannot be packed into a persisted key.
    #[error("position {0} is outside the persistable range")]
    PositionOutOfRange(Position),

    /// A persisted record is structurally valid JSON but not a valid record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
