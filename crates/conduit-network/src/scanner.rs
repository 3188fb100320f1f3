//! Breadth-first connectivity scans.
//!
//! A scan starts at one origin and walks linked same-type segments, claiming
//! each one for the scanning network. Segments the network owned before the
//! scan but did not reach this time are released; they are the candidates
//! for new fragment networks.
//!
//! Each position is visited at most once, so cycles in the layout are
//! harmless. Neighbors are queued in direction index order, which makes the
//! visit order (and everything derived from it) reproducible.

use std::collections::{BTreeSet, HashSet, VecDeque};

use conduit_topology::{Direction, Position};
use tracing::trace;

use crate::destination::Destination;
use crate::segment::SegmentStore;
use crate::world::World;
use crate::{NetworkId, NetworkType};

/// One attempted step of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Cell the scan tried to enter
    pub position: Position,
    /// Cell it came from; `None` for the origin
    pub parent: Option<Position>,
    /// Face of `parent` it crossed
    pub direction: Option<Direction>,
    /// Whether the step entered a new segment of the network
    pub successful: bool,
}

impl ScanRequest {
    fn root(position: Position) -> Self {
        Self {
            position,
            parent: None,
            direction: None,
            successful: false,
        }
    }
}

/// What a scan found.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Origin the scan started at
    pub origin: Position,
    /// Segments reached, in visit order
    pub found: Vec<Position>,
    /// Former members not reached, sorted; now unassigned
    pub removed: Vec<Position>,
    /// Every step attempted, in processing order
    pub requests: Vec<ScanRequest>,
    /// Interfaces found on faces of reached segments
    pub destinations: Vec<Destination>,
    /// Other networks that lost segments to this scan
    pub claimed_from: BTreeSet<NetworkId>,
}

impl ScanResult {
    /// Successful steps that have a parent: the links of the BFS tree.
    pub fn links(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.requests
            .iter()
            .filter(|r| r.successful)
            .filter_map(|r| r.parent.map(|parent| (parent, r.position)))
    }
}

/// Scans on behalf of one network.
pub struct GraphScanner<'w> {
    world: &'w dyn World,
    network: NetworkId,
    network_type: NetworkType,
}

impl<'w> GraphScanner<'w> {
    /// Create a scanner for `network`, which only crosses into `network_type` segments.
    pub fn new(world: &'w dyn World, network: NetworkId, network_type: NetworkType) -> Self {
        Self {
            world,
            network,
            network_type,
        }
    }

    /// Scan from `origin`, updating segment assignments in `store`.
    pub fn scan(&self, store: &mut SegmentStore, origin: Position) -> ScanResult {
        let previous: Vec<Position> = store.members(&self.network).collect();

        let mut result = ScanResult {
            origin,
            ..ScanResult::default()
        };
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([ScanRequest::root(origin)]);

        while let Some(mut request) = queue.pop_front() {
            request.successful = self.visit(store, &request, &mut visited, &mut queue, &mut result);
            result.requests.push(request);
        }

        for pos in previous {
            if !visited.contains(&pos) {
                store.unassign(pos);
                result.removed.push(pos);
            }
        }

        trace!(
            network = %self.network,
            %origin,
            found = result.found.len(),
            removed = result.removed.len(),
            "Scan finished"
        );
        result
    }

    fn visit(
        &self,
        store: &mut SegmentStore,
        request: &ScanRequest,
        visited: &mut HashSet<Position>,
        queue: &mut VecDeque<ScanRequest>,
        result: &mut ScanResult,
    ) -> bool {
        let pos = request.position;
        if visited.contains(&pos) {
            return false;
        }
        let same_type = store
            .get(pos)
            .is_some_and(|segment| segment.network_type() == &self.network_type);
        if !same_type {
            return false;
        }

        visited.insert(pos);
        if let Some(previous) = store.assign(pos, &self.network) {
            result.claimed_from.insert(previous);
        }
        result.found.push(pos);

        for dir in Direction::ALL {
            let next = pos.offset(dir);
            match store.get(next) {
                Some(neighbor) if neighbor.network_type() == &self.network_type => {
                    if !visited.contains(&next) && self.world.is_linked(pos, dir) {
                        queue.push_back(ScanRequest {
                            position: next,
                            parent: Some(pos),
                            direction: Some(dir),
                            successful: false,
                        });
                    }
                }
                // Another family's segment is neither a link nor an interface
                Some(_) => {}
                None => {
                    if self.world.has_capability(pos, dir) {
                        result.destinations.push(Destination::new(pos, dir));
                    }
                }
            }
        }
        true
    }
}
