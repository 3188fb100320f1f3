//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use conduit_network::{
    FluidTier, ItemTier, ManagerConfig, NetworkId, NetworkManager, Position, SegmentType, World,
};

pub fn manager() -> NetworkManager {
    NetworkManager::with_defaults(ManagerConfig::seeded(42))
}

pub fn item() -> SegmentType {
    ItemTier::Basic.segment_type()
}

pub fn fluid(tier: FluidTier) -> SegmentType {
    tier.segment_type()
}

pub fn p(x: i32, y: i32, z: i32) -> Position {
    Position::new(x, y, z)
}

pub fn add_all(manager: &mut NetworkManager, world: &dyn World, kind: &SegmentType, positions: &[Position]) {
    for &pos in positions {
        manager.add_segment(world, pos, kind).unwrap();
    }
}

pub fn network_id(manager: &NetworkManager, pos: Position) -> NetworkId {
    manager.network_of(pos).unwrap().id().clone()
}

/// Membership as a set of position groups, independent of network ids.
pub fn partition(manager: &NetworkManager) -> BTreeSet<BTreeSet<Position>> {
    let mut groups: BTreeMap<NetworkId, BTreeSet<Position>> = BTreeMap::new();
    for segment in manager.segments().iter() {
        let id = segment.network().cloned().unwrap();
        groups.entry(id).or_default().insert(segment.position());
    }
    groups.into_values().collect()
}

pub fn group(positions: &[Position]) -> BTreeSet<Position> {
    positions.iter().copied().collect()
}
