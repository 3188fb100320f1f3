//! Buffered fluid networks.

use std::any::Any;

use conduit_topology::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::FluidTier;
use crate::network::{Network, NetworkBehavior};
use crate::persistence::NetworkRecord;
use crate::registry::NetworkFactory;
use crate::{Error, NetworkId, NetworkType, Result};

/// Fluid held by one network.
///
/// The amount is shared by the whole network. On a merge the absorbed
/// network's amount moves into the primary; fragments left by a split start
/// empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidNetwork {
    #[serde(default)]
    amount: u64,
}

impl FluidNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered amount.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Add fluid.
    pub fn fill(&mut self, amount: u64) {
        self.amount = self.amount.saturating_add(amount);
    }

    /// Take up to `amount`; returns how much was taken.
    pub fn drain(&mut self, amount: u64) -> u64 {
        let taken = amount.min(self.amount);
        self.amount -= taken;
        taken
    }
}

impl NetworkBehavior for FluidNetwork {
    fn on_absorbed_into(&mut self, primary: &mut dyn NetworkBehavior) {
        match primary.as_any_mut().downcast_mut::<FluidNetwork>() {
            Some(primary) => primary.fill(std::mem::take(&mut self.amount)),
            None => warn!(amount = self.amount, "Absorbing network is not a fluid network, fluid lost"),
        }
    }

    fn save(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory for the [`FluidNetwork`]s of one tier.
#[derive(Debug, Clone)]
pub struct FluidNetworkFactory {
    tier: FluidTier,
    network_type: NetworkType,
}

impl FluidNetworkFactory {
    /// Create the factory for `tier`.
    pub fn new(tier: FluidTier) -> Self {
        Self {
            tier,
            network_type: tier.network_type(),
        }
    }

    /// Tier this factory builds.
    pub fn tier(&self) -> FluidTier {
        self.tier
    }
}

impl NetworkFactory for FluidNetworkFactory {
    fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    fn create(&self, id: NetworkId, origin: Position) -> Network {
        Network::new(id, self.network_type.clone(), origin, Box::new(FluidNetwork::new()))
    }

    fn restore(&self, record: &NetworkRecord) -> Result<Network> {
        let state = if record.data.is_null() {
            FluidNetwork::new()
        } else {
            serde_json::from_value::<FluidNetwork>(record.data.clone())
                .map_err(|err| Error::MalformedRecord(format!("fluid network {}: {err}", record.id)))?
        };
        debug!(id = %record.id, tier = self.tier.tier(), amount = state.amount, "Deserialized fluid network");
        Ok(Network::new(
            record.id.clone(),
            self.network_type.clone(),
            record.origin_position(),
            Box::new(state),
        ))
    }
}
