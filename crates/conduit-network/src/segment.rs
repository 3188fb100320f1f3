//! Segments and the position-keyed segment store.

use std::collections::{BTreeSet, HashMap};

use conduit_topology::Position;
use serde_json::Value;

use crate::{NetworkId, NetworkType, SegmentType};

/// One unit of conduit occupying a grid cell.
///
/// A segment never picks its own network: the manager and the scanner assign
/// it through [`SegmentStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    position: Position,
    kind: SegmentType,
    network_type: NetworkType,
    network: Option<NetworkId>,
    data: Value,
}

impl Segment {
    /// Create an unassigned segment.
    pub fn new(position: Position, kind: SegmentType, network_type: NetworkType) -> Self {
        Self {
            position,
            kind,
            network_type,
            network: None,
            data: Value::Null,
        }
    }

    /// Attach a host-owned payload that is persisted with the segment.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Cell this segment occupies.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Registry key of this segment.
    pub fn kind(&self) -> &SegmentType {
        &self.kind
    }

    /// Network family this segment connects within.
    pub fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    /// Network this segment currently belongs to.
    pub fn network(&self) -> Option<&NetworkId> {
        self.network.as_ref()
    }

    /// Persisted payload.
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// All segments of a world plus the network membership index.
///
/// `members` mirrors every segment's `network` field. Keeping it beside the
/// map is what lets a scan enumerate a network's previous members without
/// walking the whole world.
#[derive(Debug, Default)]
pub struct SegmentStore {
    segments: HashMap<Position, Segment>,
    members: HashMap<NetworkId, BTreeSet<Position>>,
}

impl SegmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment at a position.
    pub fn get(&self, pos: Position) -> Option<&Segment> {
        self.segments.get(&pos)
    }

    /// Whether a segment occupies `pos`.
    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains_key(&pos)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// All occupied positions, sorted.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<_> = self.segments.keys().copied().collect();
        positions.sort();
        positions
    }

    /// Positions currently assigned to `network`, sorted.
    pub fn members(&self, network: &NetworkId) -> impl Iterator<Item = Position> + '_ {
        self.members.get(network).into_iter().flatten().copied()
    }

    /// Number of segments assigned to `network`.
    pub fn member_count(&self, network: &NetworkId) -> usize {
        self.members.get(network).map_or(0, BTreeSet::len)
    }

    /// Insert a new segment, unassigned. Returns `false` if the cell is taken.
    pub(crate) fn insert(&mut self, mut segment: Segment) -> bool {
        if self.segments.contains_key(&segment.position) {
            return false;
        }
        segment.network = None;
        self.segments.insert(segment.position, segment);
        true
    }

    /// Remove a segment and drop it from its network's membership.
    pub(crate) fn remove(&mut self, pos: Position) -> Option<Segment> {
        let segment = self.segments.remove(&pos)?;
        if let Some(network) = &segment.network {
            self.detach(network, pos);
        }
        Some(segment)
    }

    /// Point the segment at `pos` to `network`.
    ///
    /// Returns the network it was taken from, if it belonged to another one.
    pub(crate) fn assign(&mut self, pos: Position, network: &NetworkId) -> Option<NetworkId> {
        let segment = self.segments.get_mut(&pos)?;
        if segment.network.as_ref() == Some(network) {
            return None;
        }
        let previous = segment.network.replace(network.clone());
        if let Some(old) = &previous {
            self.detach(old, pos);
        }
        self.members.entry(network.clone()).or_default().insert(pos);
        previous
    }

    /// Clear the network of the segment at `pos`.
    pub(crate) fn unassign(&mut self, pos: Position) -> Option<NetworkId> {
        let previous = self.segments.get_mut(&pos)?.network.take();
        if let Some(old) = &previous {
            self.detach(old, pos);
        }
        previous
    }

    /// Unassign every member of `network` and forget it.
    ///
    /// Returns the released positions, sorted.
    pub(crate) fn release(&mut self, network: &NetworkId) -> Vec<Position> {
        let released: Vec<Position> = self
            .members
            .remove(network)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for pos in &released {
            if let Some(segment) = self.segments.get_mut(pos) {
                segment.network = None;
            }
        }
        released
    }

    /// Replace the persisted payload of a segment.
    pub(crate) fn set_data(&mut self, pos: Position, data: Value) -> bool {
        match self.segments.get_mut(&pos) {
            Some(segment) => {
                segment.data = data;
                true
            }
            None => false,
        }
    }

    /// Drop every segment and membership.
    pub(crate) fn clear(&mut self) {
        self.segments.clear();
        self.members.clear();
    }

    fn detach(&mut self, network: &NetworkId, pos: Position) {
        if let Some(set) = self.members.get_mut(network) {
            set.remove(&pos);
            if set.is_empty() {
                self.members.remove(network);
            }
        }
    }
}
