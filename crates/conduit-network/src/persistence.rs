//! Persisted layout.
//!
//! ```json
//! {
//!   "segments": [ { "id": "conduit:item", "pos": 274877906944, "data": ... } ],
//!   "networks": [ { "type": "conduit:item_network", "origin": 0, "id": "k3x9q2ma" } ]
//! }
//! ```
//!
//! Positions are packed keys ([`Position::to_key`]). A segment record without
//! `id` predates typed segments and is read as the baseline segment type.

use conduit_topology::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NetworkId, NetworkType, SegmentType};

/// One persisted segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Segment type; absent in legacy saves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SegmentType>,
    /// Packed position key
    pub pos: i64,
    /// Host-owned payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl SegmentRecord {
    /// Decoded position.
    pub fn position(&self) -> Position {
        Position::from_key(self.pos)
    }
}

/// One persisted network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Factory key
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    /// Packed origin key
    pub origin: i64,
    /// Network id
    pub id: NetworkId,
    /// Family payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl NetworkRecord {
    /// Decoded origin.
    pub fn origin_position(&self) -> Position {
        Position::from_key(self.origin)
    }
}

/// Everything the manager persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedLayout {
    /// Segment records, sorted by position
    pub segments: Vec<SegmentRecord>,
    /// Network records, sorted by id
    pub networks: Vec<NetworkRecord>,
}

/// Loosely-typed layout: records are decoded one at a time so a bad record
/// only costs itself.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLayout {
    #[serde(default)]
    pub segments: Vec<Value>,
    #[serde(default)]
    pub networks: Vec<Value>,
}
