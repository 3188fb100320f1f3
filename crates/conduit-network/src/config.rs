//! Manager configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kinds::BASELINE_SEGMENT;
use crate::SegmentType;

/// Default length of generated network ids.
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Configuration for a [`NetworkManager`](crate::NetworkManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Seed for network id generation; `None` seeds from the OS
    pub seed: Option<u64>,

    /// Length of generated network ids
    pub id_length: usize,

    /// Segment type assumed for persisted segments without one
    pub baseline_segment_type: SegmentType,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            id_length: DEFAULT_ID_LENGTH,
            baseline_segment_type: SegmentType::new(BASELINE_SEGMENT),
        }
    }
}

impl ManagerConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// Reads `CONDUIT_SEED` and `CONDUIT_ID_LENGTH`. Unparseable values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("CONDUIT_SEED") {
            match raw.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => warn!(value = %raw, "Invalid CONDUIT_SEED, using a random seed"),
            }
        }

        if let Ok(raw) = std::env::var("CONDUIT_ID_LENGTH") {
            match raw.trim().parse::<usize>() {
                Ok(len) if len > 0 => config.id_length = len,
                _ => warn!(value = %raw, default = DEFAULT_ID_LENGTH, "Invalid CONDUIT_ID_LENGTH"),
            }
        }

        config
    }

    /// Default config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
