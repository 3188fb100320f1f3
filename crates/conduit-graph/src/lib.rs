//! Conduit Graph Primitives
//!
//! A small weighted directed graph keyed by an opaque node value, plus a
//! single-source shortest-path solver over it.
//!
//! # Model
//!
//! - [`Graph`] owns every [`Node`] of one connectivity snapshot in an arena
//!   addressed by [`NodeId`], and resolves node values through its
//!   [`NodeIndex`].
//! - [`Edge`]s are directed and carry a non-negative integer weight and a
//!   label. An undirected link is two opposite edges.
//! - [`Dijkstra`] runs from one source and can then reconstruct the
//!   [`Path`] to any reachable node.
//!
//! Node values only need `Clone + Eq + Hash`; nothing here knows about grid
//! positions.

mod dijkstra;
mod error;
mod graph;
mod path;

pub use dijkstra::Dijkstra;
pub use error::{GraphError, Result};
pub use graph::{Edge, Graph, Node, NodeId, NodeIndex};
pub use path::Path;
