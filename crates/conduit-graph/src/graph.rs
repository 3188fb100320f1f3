//! Graph storage.

use std::collections::HashMap;
use std::hash::Hash;

use crate::{GraphError, Result};

/// Handle to a node inside one [`Graph`].
///
/// Handles are dense arena indices and are only meaningful for the graph
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Arena slot of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A graph node wrapping its identifying value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
    id: NodeId,
    value: T,
}

impl<T> Node<T> {
    /// Arena handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The identifying value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// A directed, weighted, labelled edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Free-form label (kind of link)
    pub label: String,
    /// Tail of the edge
    pub from: NodeId,
    /// Head of the edge
    pub to: NodeId,
    /// Non-negative traversal cost
    pub weight: u64,
}

/// Lookup from node value to node handle.
#[derive(Debug, Clone)]
pub struct NodeIndex<T> {
    ids: HashMap<T, NodeId>,
}

impl<T: Eq + Hash> NodeIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { ids: HashMap::new() }
    }

    /// Handle of the node holding `value`.
    pub fn get(&self, value: &T) -> Option<NodeId> {
        self.ids.get(value).copied()
    }

    /// Whether `value` has a node.
    pub fn contains(&self, value: &T) -> bool {
        self.ids.contains_key(value)
    }

    /// Number of indexed values.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn insert(&mut self, value: T, id: NodeId) {
        self.ids.insert(value, id);
    }
}

impl<T: Eq + Hash> Default for NodeIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed weighted graph.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
    /// node slot → indices into `edges`
    outgoing: Vec<Vec<usize>>,
    index: NodeIndex<T>,
}

impl<T: Clone + Eq + Hash> Graph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            index: NodeIndex::new(),
        }
    }

    /// Add a node for `value`, or return the existing one.
    pub fn add_node(&mut self, value: T) -> NodeId {
        if let Some(id) = self.index.get(&value) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(value.clone(), id);
        self.nodes.push(Node { id, value });
        self.outgoing.push(Vec::new());
        id
    }

    /// Add a directed edge.
    pub fn add_edge(&mut self, label: impl Into<String>, from: NodeId, to: NodeId, weight: u64) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        self.outgoing[from.index()].push(self.edges.len());
        self.edges.push(Edge {
            label: label.into(),
            from,
            to,
            weight,
        });
        Ok(())
    }

    /// Add two opposite directed edges with the same label and weight.
    pub fn add_link(&mut self, label: &str, a: NodeId, b: NodeId, weight: u64) -> Result<()> {
        self.add_edge(label, a, b, weight)?;
        self.add_edge(label, b, a, weight)
    }

    /// Node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Value of a node.
    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(Node::value)
    }

    /// Handle of the node holding `value`.
    pub fn node_id(&self, value: &T) -> Option<NodeId> {
        self.index.get(value)
    }

    /// The value → handle index.
    pub fn index(&self) -> &NodeIndex<T> {
        &self.index
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `id`.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |&e| &self.edges[e])
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

impl<T: Clone + Eq + Hash> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}
