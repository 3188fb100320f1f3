//! Routing-capable item networks.

use std::any::Any;

use conduit_graph::Path;
use conduit_topology::Position;
use tracing::debug;

use super::ITEM_NETWORK;
use crate::destination::Destination;
use crate::network::{Network, NetworkBehavior};
use crate::persistence::NetworkRecord;
use crate::registry::NetworkFactory;
use crate::routing::{self, build_graph, DestinationPathCache, DestinationPathCacheBuilder, RoundRobinCursor, RoutingMode};
use crate::scanner::ScanResult;
use crate::world::World;
use crate::{NetworkId, NetworkType, Result};

/// Destinations and shortest paths of one item network.
///
/// Both are derived from the latest scan and replaced wholesale on the next.
/// Nothing here is persisted: a loaded network is rescanned, which rebuilds it.
#[derive(Debug, Default)]
pub struct ItemNetwork {
    destinations: Vec<Destination>,
    cache: DestinationPathCache,
}

impl ItemNetwork {
    /// Create a network that has not been scanned yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations found by the latest scan, sorted.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Path cache of the latest scan.
    pub fn path_cache(&self) -> &DestinationPathCache {
        &self.cache
    }

    /// Cached shortest path from `from` to `destination`.
    pub fn path(&self, from: Position, destination: &Destination) -> Option<&Path<Position>> {
        self.cache.path(from, destination)
    }

    /// Pick where something entering at `from` should go.
    pub fn select_destination(
        &self,
        from: Position,
        mode: RoutingMode,
        cursor: &mut RoundRobinCursor,
        world: &dyn World,
        exclude: Option<&Destination>,
    ) -> Option<Destination> {
        routing::select(&self.cache, &self.destinations, from, mode, cursor, world, exclude)
    }
}

impl NetworkBehavior for ItemNetwork {
    fn on_scanned(&mut self, scan: &ScanResult) {
        let mut destinations = scan.destinations.clone();
        destinations.sort();
        destinations.dedup();

        let graph = build_graph(scan);
        self.cache = DestinationPathCacheBuilder::new(&graph, &destinations).build();
        self.destinations = destinations;

        debug!(
            origin = %scan.origin,
            nodes = graph.node_count(),
            destinations = self.destinations.len(),
            paths = self.cache.len(),
            "Rebuilt path cache"
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory for [`ItemNetwork`]s.
#[derive(Debug, Clone)]
pub struct ItemNetworkFactory {
    network_type: NetworkType,
}

impl ItemNetworkFactory {
    /// Create the factory.
    pub fn new() -> Self {
        Self {
            network_type: NetworkType::new(ITEM_NETWORK),
        }
    }
}

impl Default for ItemNetworkFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkFactory for ItemNetworkFactory {
    fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    fn create(&self, id: NetworkId, origin: Position) -> Network {
        Network::new(id, self.network_type.clone(), origin, Box::new(ItemNetwork::new()))
    }

    fn restore(&self, record: &NetworkRecord) -> Result<Network> {
        debug!(id = %record.id, "Deserialized item network");
        Ok(self.create(record.id.clone(), record.origin_position()))
    }
}
