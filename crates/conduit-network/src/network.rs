//! Network entities.
//!
//! A network is one connected component of same-type segments. Its identity,
//! type and origin are common to every family; what a family does on top
//! (route items, buffer fluid) lives behind [`NetworkBehavior`].

use std::any::Any;

use conduit_topology::Position;
use serde_json::Value;

use crate::persistence::NetworkRecord;
use crate::scanner::ScanResult;
use crate::{Error, NetworkId, NetworkType, Result};

/// Family-specific state and hooks of a network.
pub trait NetworkBehavior: std::fmt::Debug + Send + Sync + 'static {
    /// Called after every scan of the network, with the scan's findings.
    ///
    /// Anything derived from the topology must be rebuilt here from scratch.
    fn on_scanned(&mut self, scan: &ScanResult) {
        let _ = scan;
    }

    /// Called on a network that is being merged into `primary` and will be
    /// deleted right after.
    fn on_absorbed_into(&mut self, primary: &mut dyn NetworkBehavior) {
        let _ = primary;
    }

    /// Payload persisted with the network record.
    fn save(&self) -> Value {
        Value::Null
    }

    /// Typed access for hosts.
    fn as_any(&self) -> &dyn Any;

    /// Typed mutable access for hosts.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A connected component of segments.
#[derive(Debug)]
pub struct Network {
    id: NetworkId,
    network_type: NetworkType,
    origin: Position,
    behavior: Box<dyn NetworkBehavior>,
}

impl Network {
    /// Create a network.
    pub fn new(
        id: NetworkId,
        network_type: NetworkType,
        origin: Position,
        behavior: Box<dyn NetworkBehavior>,
    ) -> Self {
        Self {
            id,
            network_type,
            origin,
            behavior,
        }
    }

    /// Unique id.
    pub fn id(&self) -> &NetworkId {
        &self.id
    }

    /// Factory key.
    pub fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    /// Position scans are rooted at.
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Position) {
        self.origin = origin;
    }

    /// Family behavior.
    pub fn behavior(&self) -> &dyn NetworkBehavior {
        self.behavior.as_ref()
    }

    /// Family behavior, mutable.
    pub fn behavior_mut(&mut self) -> &mut dyn NetworkBehavior {
        self.behavior.as_mut()
    }

    /// Typed view of the behavior.
    pub fn downcast_ref<B: NetworkBehavior>(&self) -> Option<&B> {
        self.behavior.as_any().downcast_ref::<B>()
    }

    /// Typed mutable view of the behavior.
    pub fn downcast_mut<B: NetworkBehavior>(&mut self) -> Option<&mut B> {
        self.behavior.as_any_mut().downcast_mut::<B>()
    }

    /// Persisted form of this network.
    pub fn to_record(&self) -> Result<NetworkRecord> {
        let origin = self
            .origin
            .to_key()
            .ok_or(Error::PositionOutOfRange(self.origin))?;
        Ok(NetworkRecord {
            network_type: self.network_type.clone(),
            origin,
            id: self.id.clone(),
            data: self.behavior.save(),
        })
    }
}
