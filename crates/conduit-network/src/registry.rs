//! Type registries.
//!
//! Segment and network families are looked up by type id, both when the host
//! places a segment and when a saved layout is read back. Registries are
//! plain values handed to the manager at construction.

use std::collections::BTreeMap;

use conduit_topology::Position;

use crate::network::Network;
use crate::persistence::{NetworkRecord, SegmentRecord};
use crate::segment::Segment;
use crate::{NetworkId, NetworkType, Result, SegmentType};

/// Constructor pair for one segment type.
pub trait SegmentFactory: Send + Sync {
    /// Type this factory builds.
    fn segment_type(&self) -> &SegmentType;

    /// Network family of the segments it builds.
    fn network_type(&self) -> &NetworkType;

    /// Fresh segment at `position`.
    fn create(&self, position: Position) -> Segment;

    /// Segment from a persisted record.
    fn restore(&self, record: &SegmentRecord) -> Result<Segment>;
}

/// Constructor pair for one network type.
pub trait NetworkFactory: Send + Sync {
    /// Type this factory builds.
    fn network_type(&self) -> &NetworkType;

    /// Fresh network rooted at `origin`.
    fn create(&self, id: NetworkId, origin: Position) -> Network;

    /// Network from a persisted record.
    fn restore(&self, record: &NetworkRecord) -> Result<Network>;
}

/// Segment type → factory.
#[derive(Default)]
pub struct SegmentRegistry {
    factories: BTreeMap<SegmentType, Box<dyn SegmentFactory>>,
}

impl SegmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in conduit kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::kinds::register_segments(&mut registry);
        registry
    }

    /// Register a factory, replacing any previous one for the same type.
    pub fn register(&mut self, factory: impl SegmentFactory + 'static) -> &mut Self {
        self.factories
            .insert(factory.segment_type().clone(), Box::new(factory));
        self
    }

    /// Factory for a type.
    pub fn get(&self, segment_type: &SegmentType) -> Option<&dyn SegmentFactory> {
        self.factories.get(segment_type).map(|factory| &**factory)
    }

    /// Whether a type is registered.
    pub fn contains(&self, segment_type: &SegmentType) -> bool {
        self.factories.contains_key(segment_type)
    }

    /// Registered types, sorted.
    pub fn types(&self) -> impl Iterator<Item = &SegmentType> {
        self.factories.keys()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for SegmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

/// Network type → factory.
#[derive(Default)]
pub struct NetworkRegistry {
    factories: BTreeMap<NetworkType, Box<dyn NetworkFactory>>,
}

impl NetworkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in network families.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::kinds::register_networks(&mut registry);
        registry
    }

    /// Register a factory, replacing any previous one for the same type.
    pub fn register(&mut self, factory: impl NetworkFactory + 'static) -> &mut Self {
        self.factories
            .insert(factory.network_type().clone(), Box::new(factory));
        self
    }

    /// Factory for a type.
    pub fn get(&self, network_type: &NetworkType) -> Option<&dyn NetworkFactory> {
        self.factories.get(network_type).map(|factory| &**factory)
    }

    /// Whether a type is registered.
    pub fn contains(&self, network_type: &NetworkType) -> bool {
        self.factories.contains_key(network_type)
    }

    /// Registered types, sorted.
    pub fn types(&self) -> impl Iterator<Item = &NetworkType> {
        self.factories.keys()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for NetworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
