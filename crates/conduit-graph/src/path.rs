//! Reconstructed shortest paths.

/// An ordered sequence of node values from a source to a target, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<T> {
    nodes: Vec<T>,
}

impl<T: PartialEq> Path<T> {
    /// Build a path from its node values.
    ///
    /// A path always contains at least its source.
    pub fn new(nodes: Vec<T>) -> Option<Self> {
        if nodes.is_empty() {
            None
        } else {
            Some(Self { nodes })
        }
    }

    /// The single-node path from a node to itself.
    pub fn trivial(node: T) -> Self {
        Self { nodes: vec![node] }
    }

    /// Node values in travel order.
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    /// First node.
    pub fn source(&self) -> &T {
        &self.nodes[0]
    }

    /// Last node.
    pub fn target(&self) -> &T {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Number of nodes (hops + 1).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges travelled.
    pub fn hops(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The node following `value` on this path.
    pub fn next_after(&self, value: &T) -> Option<&T> {
        let at = self.nodes.iter().position(|n| n == value)?;
        self.nodes.get(at + 1)
    }

    /// Iterate node values.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.nodes.iter()
    }
}

impl<'a, T> IntoIterator for &'a Path<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
