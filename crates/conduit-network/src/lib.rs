//! Conduit Network - Incremental Connectivity and Routing
//!
//! Segments of conduit sit on a 3D grid. Same-type segments that touch (and
//! whose facing sides both allow a link) form one network. This crate keeps
//! that partition correct one placement or removal at a time, without ever
//! rescanning the whole world, and keeps shortest paths to every routing
//! destination ready for the hot path.
//!
//! # Overview
//!
//! ## Membership
//!
//! The [`NetworkManager`] owns every [`Segment`] (in a [`SegmentStore`]) and
//! every [`Network`] (in an arena keyed by [`NetworkId`]). Segments refer to
//! their network by id only.
//!
//! - **Add**: join the neighbor network, merge several neighbors into one, or
//!   start a new network
//! - **Remove**: rescan from a neighbor of the hole; every fragment the rescan
//!   no longer reaches becomes a network of its own
//! - **Refresh**: rescan after the host opened or closed a face
//!
//! ## Routing
//!
//! Item networks rebuild a [`DestinationPathCache`] after every scan: the
//! scan's links become a unit-weight graph, and the solver runs once from every
//! node. Choosing a destination is then a cache read
//! ([`NetworkManager::select_destination`]).
//!
//! ## World
//!
//! The host answers adjacency and capability questions through [`World`];
//! nothing here knows about terrain.
//!
//! # Example
//!
//! ```rust
//! use conduit_network::{ManagerConfig, NetworkManager, OpenWorld, Position, SegmentType};
//!
//! let mut manager = NetworkManager::with_defaults(ManagerConfig::seeded(7));
//! let item = SegmentType::new("conduit:item");
//!
//! for x in 0..3 {
//!     manager.add_segment(&OpenWorld, Position::new(x, 0, 0), &item).unwrap();
//! }
//! assert_eq!(manager.network_count(), 1);
//!
//! manager.remove_segment(&OpenWorld, Position::new(1, 0, 0)).unwrap();
//! assert_eq!(manager.network_count(), 2);
//! ```

pub mod config;
pub mod destination;
pub mod error;
pub mod ids;
pub mod kinds;
pub mod manager;
pub mod network;
pub mod persistence;
pub mod registry;
pub mod routing;
pub mod scanner;
pub mod segment;
pub mod world;

pub use config::ManagerConfig;
pub use destination::Destination;
pub use error::{Error, Result};
pub use ids::{NetworkId, NetworkType, SegmentType};
pub use kinds::{FluidNetwork, FluidTier, ItemNetwork, ItemTier};
pub use manager::NetworkManager;
pub use network::{Network, NetworkBehavior};
pub use persistence::{NetworkRecord, SavedLayout, SegmentRecord};
pub use registry::{NetworkFactory, NetworkRegistry, SegmentFactory, SegmentRegistry};
pub use routing::{DestinationPathCache, RoundRobinCursor, RoutingMode};
pub use scanner::{GraphScanner, ScanRequest, ScanResult};
pub use segment::{Segment, SegmentStore};
pub use world::{OpenWorld, StaticWorld, World};

pub use conduit_topology::{Direction, Position};
