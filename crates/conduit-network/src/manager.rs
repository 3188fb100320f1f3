//! The network manager.
//!
//! Owns every segment and network of a world and keeps membership in step
//! with adjacency as segments come and go:
//!
//! - **add** next to nothing creates a network; next to one network joins it;
//!   next to several merges them into the first one found.
//! - **remove** rescans the network from a neighbor of the hole. Whatever the
//!   rescan no longer reaches is a fragment, and every fragment becomes a new
//!   network.
//!
//! Cascading work (fragments seeding networks, scans claiming segments from
//! other networks) runs off one explicit queue, so deep layouts never grow the
//! stack.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use conduit_topology::{Direction, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ManagerConfig;
use crate::destination::Destination;
use crate::kinds::ItemNetwork;
use crate::network::Network;
use crate::persistence::{NetworkRecord, RawLayout, SavedLayout, SegmentRecord};
use crate::registry::{NetworkRegistry, SegmentRegistry};
use crate::routing::{RoundRobinCursor, RoutingMode};
use crate::scanner::{GraphScanner, ScanResult};
use crate::segment::{Segment, SegmentStore};
use crate::world::World;
use crate::{Error, NetworkId, NetworkType, Result, SegmentType};

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Collisions tolerated before generated ids grow by one character.
const ID_ATTEMPTS_PER_LENGTH: usize = 16;

/// Pending membership work.
#[derive(Debug)]
enum Work {
    /// Rescan a network from a position.
    Scan { network: NetworkId, origin: Position },
    /// Give an unassigned segment a network of its own.
    Seed(Position),
    /// A scan by `by` took segments from `network`.
    Check { network: NetworkId, by: NetworkId },
}

/// Owner of all segment and network state.
pub struct NetworkManager {
    config: ManagerConfig,
    segment_registry: SegmentRegistry,
    network_registry: NetworkRegistry,
    segments: SegmentStore,
    networks: BTreeMap<NetworkId, Network>,
    rng: StdRng,
    dirty: bool,
}

impl NetworkManager {
    /// Create a manager with explicit registries.
    pub fn new(
        config: ManagerConfig,
        segment_registry: SegmentRegistry,
        network_registry: NetworkRegistry,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            segment_registry,
            network_registry,
            segments: SegmentStore::new(),
            networks: BTreeMap::new(),
            rng,
            dirty: false,
        }
    }

    /// Create a manager that knows the built-in conduit kinds.
    pub fn with_defaults(config: ManagerConfig) -> Self {
        Self::new(
            config,
            SegmentRegistry::with_defaults(),
            NetworkRegistry::with_defaults(),
        )
    }

    /// Active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Segment registry.
    pub fn segment_registry(&self) -> &SegmentRegistry {
        &self.segment_registry
    }

    /// Network registry.
    pub fn network_registry(&self) -> &NetworkRegistry {
        &self.network_registry
    }

    /// Place a segment of `segment_type` at `pos`.
    ///
    /// Returns the network the segment ended up in.
    pub fn add_segment(
        &mut self,
        world: &dyn World,
        pos: Position,
        segment_type: &SegmentType,
    ) -> Result<NetworkId> {
        if self.segments.contains(pos) {
            return Err(Error::DuplicateSegment(pos));
        }
        if pos.to_key().is_none() {
            return Err(Error::PositionOutOfRange(pos));
        }
        let segment = self
            .segment_registry
            .get(segment_type)
            .ok_or_else(|| Error::UnknownSegmentType(segment_type.clone()))?
            .create(pos);
        let network_type = segment.network_type().clone();
        if !self.network_registry.contains(&network_type) {
            return Err(Error::UnknownNetworkType(network_type));
        }

        let candidates = self.neighbor_networks(world, pos, &network_type)?;
        for candidate in &candidates {
            let found = self.network_type_of(candidate)?;
            if found != &network_type {
                return Err(Error::NetworkTypeMismatch {
                    expected: network_type,
                    found: found.clone(),
                });
            }
        }

        self.segments.insert(segment);
        self.dirty = true;

        match candidates.split_first() {
            None => self.settle(world, [Work::Seed(pos)]),
            Some((primary, losers)) => {
                let mut work = vec![Work::Scan {
                    network: primary.clone(),
                    origin: pos,
                }];
                for loser in losers {
                    let released = self.absorb(loser, primary);
                    work.extend(released.into_iter().map(Work::Seed));
                }
                self.settle(world, work);
            }
        }

        self.segments
            .get(pos)
            .and_then(Segment::network)
            .cloned()
            .ok_or(Error::OrphanSegment(pos))
    }

    /// Remove the segment at `pos`, splitting its network if it was a connector.
    pub fn remove_segment(&mut self, world: &dyn World, pos: Position) -> Result<Segment> {
        let segment = self.segments.get(pos).ok_or(Error::SegmentNotFound(pos))?;

        let Some(network) = segment.network().cloned() else {
            warn!(%pos, "Removed segment had no network");
            self.dirty = true;
            return self.segments.remove(pos).ok_or(Error::SegmentNotFound(pos));
        };

        let network_type = segment.network_type().clone();
        let mut linked = Vec::new();
        for dir in Direction::ALL {
            let next = pos.offset(dir);
            let Some(neighbor) = self.segments.get(next) else {
                continue;
            };
            if neighbor.network_type() != &network_type || !world.is_linked(pos, dir) {
                continue;
            }
            if neighbor.network() != Some(&network) {
                return Err(Error::InconsistentNetwork {
                    position: next,
                    expected: network,
                    found: neighbor.network().cloned(),
                });
            }
            linked.push(next);
        }

        let removed = self
            .segments
            .remove(pos)
            .ok_or(Error::SegmentNotFound(pos))?;
        self.dirty = true;

        let anchor = match linked.first() {
            Some(&first) => Some(first),
            None => {
                let fallback = self.segments.members(&network).next();
                if let Some(fallback) = fallback {
                    warn!(%pos, network = %network, %fallback, "Removed segment was not linked to the rest of its network");
                }
                fallback
            }
        };

        match anchor {
            Some(anchor) => {
                if let Some(entry) = self.networks.get_mut(&network) {
                    entry.set_origin(anchor);
                }
                self.settle(
                    world,
                    [Work::Scan {
                        network,
                        origin: anchor,
                    }],
                );
            }
            None => self.delete_network(&network),
        }

        Ok(removed)
    }

    /// Re-evaluate connectivity around `pos` after the host changed a face
    /// (blocked, unblocked, attached or detached an interface).
    pub fn refresh(&mut self, world: &dyn World, pos: Position) -> Result<()> {
        let segment = self.segments.get(pos).ok_or(Error::SegmentNotFound(pos))?;

        let work = match segment.network() {
            Some(id) => {
                let network = self
                    .networks
                    .get(id)
                    .ok_or_else(|| Error::NetworkNotFound(id.clone()))?;
                let origin = network.origin();
                let origin = if self.segments.get(origin).and_then(Segment::network) == Some(id) {
                    origin
                } else {
                    pos
                };
                Work::Scan {
                    network: id.clone(),
                    origin,
                }
            }
            None => Work::Seed(pos),
        };

        self.dirty = true;
        self.settle(world, [work]);
        Ok(())
    }

    /// Segment at `pos`.
    pub fn segment(&self, pos: Position) -> Option<&Segment> {
        self.segments.get(pos)
    }

    /// All segments.
    pub fn segments(&self) -> &SegmentStore {
        &self.segments
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Replace the persisted payload of the segment at `pos`.
    pub fn set_segment_data(&mut self, pos: Position, data: Value) -> Result<()> {
        if !self.segments.set_data(pos, data) {
            return Err(Error::SegmentNotFound(pos));
        }
        self.dirty = true;
        Ok(())
    }

    /// Network by id.
    pub fn network(&self, id: &NetworkId) -> Option<&Network> {
        self.networks.get(id)
    }

    /// Network by id, mutable (for family state such as buffered fluid).
    pub fn network_mut(&mut self, id: &NetworkId) -> Option<&mut Network> {
        self.networks.get_mut(id)
    }

    /// All networks, sorted by id.
    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    /// Number of networks.
    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Network of the segment at `pos`.
    pub fn network_of(&self, pos: Position) -> Option<&Network> {
        let id = self.segments.get(pos)?.network()?;
        self.networks.get(id)
    }

    /// Positions assigned to a network, sorted.
    pub fn members(&self, id: &NetworkId) -> Vec<Position> {
        self.segments.members(id).collect()
    }

    /// Pick a destination for something entering the network at `from`.
    ///
    /// `None` if `from` is not part of an item network or nothing is reachable.
    pub fn select_destination(
        &self,
        world: &dyn World,
        from: Position,
        mode: RoutingMode,
        cursor: &mut RoundRobinCursor,
        exclude: Option<&Destination>,
    ) -> Option<Destination> {
        self.network_of(from)?
            .downcast_ref::<ItemNetwork>()?
            .select_destination(from, mode, cursor, world, exclude)
    }

    /// Whether anything changed since the flag was last taken.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Persisted form of the current state.
    pub fn save(&self) -> Result<SavedLayout> {
        let segments = self
            .segments
            .positions()
            .into_iter()
            .filter_map(|pos| self.segments.get(pos))
            .map(|segment| -> Result<SegmentRecord> {
                let pos = segment.position();
                Ok(SegmentRecord {
                    id: Some(segment.kind().clone()),
                    pos: pos.to_key().ok_or(Error::PositionOutOfRange(pos))?,
                    data: segment.data().clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let networks = self
            .networks
            .values()
            .map(Network::to_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(SavedLayout { segments, networks })
    }

    /// [`save`](Self::save) as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.save()?)?)
    }

    /// Replace all state with a persisted layout.
    ///
    /// Bad records are skipped with a warning. Every restored network is
    /// rescanned, which rebuilds membership and derived state; networks whose
    /// origin no longer fits are dropped and any segment left over seeds a new
    /// network. The dirty flag is raised only if something had to be repaired.
    pub fn load(&mut self, world: &dyn World, layout: Value) -> Result<()> {
        let raw: RawLayout = serde_json::from_value(layout)?;

        self.segments.clear();
        self.networks.clear();
        let mut repaired = false;

        for entry in raw.segments {
            if let Err(err) = self.restore_segment(entry) {
                warn!(%err, "Skipping segment record");
                repaired = true;
            }
        }

        let mut work = Vec::new();
        for entry in raw.networks {
            match self.restore_network(entry) {
                Ok((network, origin)) => work.push(Work::Scan { network, origin }),
                Err(err) => {
                    warn!(%err, "Skipping network record");
                    repaired = true;
                }
            }
        }

        let restored: BTreeSet<NetworkId> = self.networks.keys().cloned().collect();
        work.extend(self.segments.positions().into_iter().map(Work::Seed));
        self.settle(world, work);

        let settled: BTreeSet<NetworkId> = self.networks.keys().cloned().collect();
        if restored != settled {
            warn!(
                restored = restored.len(),
                settled = settled.len(),
                "Loaded networks did not match the segment layout"
            );
            repaired = true;
        }

        debug!(
            segments = self.segments.len(),
            networks = self.networks.len(),
            "Loaded layout"
        );
        self.dirty = repaired;
        Ok(())
    }

    /// [`load`](Self::load) from a JSON string.
    pub fn from_json(&mut self, world: &dyn World, json: &str) -> Result<()> {
        let layout: Value = serde_json::from_str(json)?;
        self.load(world, layout)
    }

    fn restore_segment(&mut self, entry: Value) -> Result<()> {
        let record: SegmentRecord = serde_json::from_value(entry)
            .map_err(|err| Error::MalformedRecord(format!("segment: {err}")))?;
        let segment_type = record
            .id
            .clone()
            .unwrap_or_else(|| self.config.baseline_segment_type.clone());

        let segment = self
            .segment_registry
            .get(&segment_type)
            .ok_or(Error::UnknownSegmentType(segment_type))?
            .restore(&record)?;
        if !self.network_registry.contains(segment.network_type()) {
            return Err(Error::UnknownNetworkType(segment.network_type().clone()));
        }

        let pos = segment.position();
        if !self.segments.insert(segment) {
            return Err(Error::DuplicateSegment(pos));
        }
        Ok(())
    }

    fn restore_network(&mut self, entry: Value) -> Result<(NetworkId, Position)> {
        let record: NetworkRecord = serde_json::from_value(entry)
            .map_err(|err| Error::MalformedRecord(format!("network: {err}")))?;
        if self.networks.contains_key(&record.id) {
            return Err(Error::MalformedRecord(format!("duplicate network id {}", record.id)));
        }

        let network = self
            .network_registry
            .get(&record.network_type)
            .ok_or_else(|| Error::UnknownNetworkType(record.network_type.clone()))?
            .restore(&record)?;

        let origin = network.origin();
        let origin_type = self
            .segments
            .get(origin)
            .map(Segment::network_type)
            .ok_or(Error::SegmentNotFound(origin))?;
        if origin_type != network.network_type() {
            return Err(Error::NetworkTypeMismatch {
                expected: origin_type.clone(),
                found: network.network_type().clone(),
            });
        }

        let id = network.id().clone();
        self.networks.insert(id.clone(), network);
        Ok((id, origin))
    }

    /// Distinct networks of linked same-type neighbors, in direction order.
    fn neighbor_networks(
        &self,
        world: &dyn World,
        pos: Position,
        network_type: &NetworkType,
    ) -> Result<Vec<NetworkId>> {
        let mut found: Vec<NetworkId> = Vec::new();
        for dir in Direction::ALL {
            let next = pos.offset(dir);
            let Some(neighbor) = self.segments.get(next) else {
                continue;
            };
            if neighbor.network_type() != network_type || !world.is_linked(pos, dir) {
                continue;
            }
            let id = neighbor.network().ok_or(Error::OrphanSegment(next))?;
            if !self.networks.contains_key(id) {
                return Err(Error::NetworkNotFound(id.clone()));
            }
            if !found.contains(id) {
                found.push(id.clone());
            }
        }
        Ok(found)
    }

    fn network_type_of(&self, id: &NetworkId) -> Result<&NetworkType> {
        self.networks
            .get(id)
            .map(Network::network_type)
            .ok_or_else(|| Error::NetworkNotFound(id.clone()))
    }

    /// Run queued membership work until nothing is left.
    fn settle(&mut self, world: &dyn World, work: impl IntoIterator<Item = Work>) {
        let mut queue: VecDeque<Work> = work.into_iter().collect();

        while let Some(item) = queue.pop_front() {
            match item {
                Work::Scan { network, origin } => {
                    let Some(result) = self.scan_network(world, &network, origin) else {
                        // Members of a network that no longer exists start over
                        let released = self.segments.release(&network);
                        queue.extend(released.into_iter().map(Work::Seed));
                        continue;
                    };
                    if result.found.is_empty() {
                        self.delete_network(&network);
                    } else if let Some(entry) = self.networks.get_mut(&network) {
                        // Keep the origin inside the network it roots
                        let owner = self.segments.get(entry.origin()).and_then(Segment::network);
                        if owner != Some(&network) {
                            entry.set_origin(origin);
                        }
                    }
                    queue.extend(result.removed.iter().copied().map(Work::Seed));
                    for victim in result.claimed_from {
                        queue.push_back(Work::Check {
                            network: victim,
                            by: network.clone(),
                        });
                    }
                }
                Work::Seed(pos) => {
                    let Some(segment) = self.segments.get(pos) else {
                        continue;
                    };
                    if segment.network().is_some() {
                        continue;
                    }
                    let network_type = segment.network_type().clone();
                    if !self.network_registry.contains(&network_type) {
                        warn!(%pos, %network_type, "No factory for segment's network type");
                        continue;
                    }

                    let id = self.fresh_id();
                    let Some(factory) = self.network_registry.get(&network_type) else {
                        continue;
                    };
                    let network = factory.create(id.clone(), pos);
                    self.networks.insert(id.clone(), network);
                    debug!(network = %id, %network_type, origin = %pos, "Created network");

                    queue.push_front(Work::Scan {
                        network: id,
                        origin: pos,
                    });
                }
                Work::Check { network, by } => {
                    if !self.networks.contains_key(&network) {
                        continue;
                    }
                    if self.segments.member_count(&network) == 0 {
                        self.absorb(&network, &by);
                        continue;
                    }
                    let origin = self.networks.get(&network).map(Network::origin);
                    let still_member = origin
                        .and_then(|origin| self.segments.get(origin))
                        .and_then(Segment::network)
                        == Some(&network);
                    let origin = match origin {
                        Some(origin) if still_member => Some(origin),
                        _ => self.segments.members(&network).next(),
                    };
                    if let Some(origin) = origin {
                        if let Some(entry) = self.networks.get_mut(&network) {
                            entry.set_origin(origin);
                        }
                        queue.push_back(Work::Scan { network, origin });
                    }
                }
            }
        }
    }

    fn scan_network(
        &mut self,
        world: &dyn World,
        id: &NetworkId,
        origin: Position,
    ) -> Option<ScanResult> {
        let network_type = self.networks.get(id)?.network_type().clone();
        let result = GraphScanner::new(world, id.clone(), network_type).scan(&mut self.segments, origin);

        if let Some(network) = self.networks.get_mut(id) {
            network.behavior_mut().on_scanned(&result);
        }
        debug!(
            network = %id,
            %origin,
            found = result.found.len(),
            removed = result.removed.len(),
            destinations = result.destinations.len(),
            "Scanned network"
        );
        Some(result)
    }

    /// Merge `loser` into `primary` and delete it. Returns the loser's former members.
    fn absorb(&mut self, loser: &NetworkId, primary: &NetworkId) -> Vec<Position> {
        let Some(mut network) = self.networks.remove(loser) else {
            return Vec::new();
        };
        let released = self.segments.release(loser);
        match self.networks.get_mut(primary) {
            Some(target) => network.behavior_mut().on_absorbed_into(target.behavior_mut()),
            None => warn!(%loser, %primary, "Absorbing network does not exist"),
        }
        debug!(%loser, %primary, segments = released.len(), "Merged network");
        released
    }

    fn delete_network(&mut self, id: &NetworkId) {
        self.segments.release(id);
        if self.networks.remove(id).is_some() {
            debug!(network = %id, "Removed network");
        }
    }

    /// A network id not used by any current network.
    fn fresh_id(&mut self) -> NetworkId {
        let mut len = self.config.id_length.max(1);
        let mut attempts = 0;
        loop {
            let id: String = (0..len)
                .map(|_| char::from(ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())]))
                .collect();
            let id = NetworkId::new(id);
            if !self.networks.contains_key(&id) {
                return id;
            }
            attempts += 1;
            if attempts % ID_ATTEMPTS_PER_LENGTH == 0 {
                len += 1;
            }
        }
    }
}

impl std::fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkManager")
            .field("segments", &self.segments.len())
            .field("networks", &self.networks.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}
