//! Built-in conduit kinds.
//!
//! Item conduits come in three tiers that all join the same routing-capable
//! network family. Fluid conduits come in five tiers, each with a network
//! family of its own, so tiers never connect to each other.

mod fluid;
mod item;

pub use fluid::{FluidNetwork, FluidNetworkFactory};
pub use item::{ItemNetwork, ItemNetworkFactory};

use conduit_topology::Position;

use crate::persistence::SegmentRecord;
use crate::registry::{NetworkRegistry, SegmentFactory, SegmentRegistry};
use crate::segment::Segment;
use crate::{NetworkType, Result, SegmentType};

/// Network family shared by every item tier.
pub const ITEM_NETWORK: &str = "conduit:item_network";

/// Segment type of saves that predate typed segments.
pub const BASELINE_SEGMENT: &str = "conduit:item";

/// Item conduit tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTier {
    Basic,
    Improved,
    Advanced,
}

impl ItemTier {
    /// All tiers, lowest first.
    pub const ALL: [ItemTier; 3] = [Self::Basic, Self::Improved, Self::Advanced];

    /// Registry key of segments of this tier.
    pub fn segment_type(self) -> SegmentType {
        match self {
            Self::Basic => SegmentType::new(BASELINE_SEGMENT),
            Self::Improved => SegmentType::new("conduit:improved_item"),
            Self::Advanced => SegmentType::new("conduit:advanced_item"),
        }
    }

    /// Network family of this tier.
    pub fn network_type(self) -> NetworkType {
        NetworkType::new(ITEM_NETWORK)
    }
}

/// Fluid conduit tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FluidTier {
    Basic,
    Improved,
    Advanced,
    Elite,
    Ultimate,
}

impl FluidTier {
    /// All tiers, lowest first.
    pub const ALL: [FluidTier; 5] = [
        Self::Basic,
        Self::Improved,
        Self::Advanced,
        Self::Elite,
        Self::Ultimate,
    ];

    /// Tier from a host-supplied index; out of range reads as `Basic`.
    pub fn from_index(index: u8) -> Self {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .unwrap_or(Self::Basic)
    }

    /// Zero-based index.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// One-based tier number.
    pub fn tier(self) -> u8 {
        self.index() + 1
    }

    /// Lowercase tier name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Improved => "improved",
            Self::Advanced => "advanced",
            Self::Elite => "elite",
            Self::Ultimate => "ultimate",
        }
    }

    /// Registry key of segments of this tier.
    pub fn segment_type(self) -> SegmentType {
        SegmentType::new(format!("conduit:{}_fluid", self.name()))
    }

    /// Network family of this tier.
    pub fn network_type(self) -> NetworkType {
        NetworkType::new(format!("conduit:{}_fluid_network", self.name()))
    }
}

/// Segment factory for conduits without per-segment state.
#[derive(Debug, Clone)]
pub struct ConduitFactory {
    segment_type: SegmentType,
    network_type: NetworkType,
}

impl ConduitFactory {
    /// Create a factory for one segment type.
    pub fn new(segment_type: SegmentType, network_type: NetworkType) -> Self {
        Self {
            segment_type,
            network_type,
        }
    }
}

impl SegmentFactory for ConduitFactory {
    fn segment_type(&self) -> &SegmentType {
        &self.segment_type
    }

    fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    fn create(&self, position: Position) -> Segment {
        Segment::new(position, self.segment_type.clone(), self.network_type.clone())
    }

    fn restore(&self, record: &SegmentRecord) -> Result<Segment> {
        Ok(self.create(record.position()).with_data(record.data.clone()))
    }
}

/// Register every built-in segment type.
pub fn register_segments(registry: &mut SegmentRegistry) {
    for tier in ItemTier::ALL {
        registry.register(ConduitFactory::new(tier.segment_type(), tier.network_type()));
    }
    for tier in FluidTier::ALL {
        registry.register(ConduitFactory::new(tier.segment_type(), tier.network_type()));
    }
}

/// Register every built-in network family.
pub fn register_networks(registry: &mut NetworkRegistry) {
    registry.register(ItemNetworkFactory::new());
    for tier in FluidTier::ALL {
        registry.register(FluidNetworkFactory::new(tier));
    }
}
