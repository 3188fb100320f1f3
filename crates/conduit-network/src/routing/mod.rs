//! Destination routing for routing-capable networks.
//!
//! After every scan the network turns the scan's BFS tree into a unit-weight
//! graph ([`build_graph`]), runs the solver once from every node, and stores
//! the resulting paths in a [`DestinationPathCache`]. The cache is a snapshot
//! of one topology: it is thrown away and rebuilt on the next scan, never
//! patched.
//!
//! Routing decisions ([`select`]) only read the cache, re-checking with the
//! world that a destination is still usable.

mod cache;
mod edges;
mod mode;

pub use cache::{DestinationPathCache, DestinationPathCacheBuilder};
pub use edges::{build_graph, LINK_LABEL};
pub use mode::{select, RoundRobinCursor, RoutingMode};
