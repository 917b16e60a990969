#![warn(missing_docs)]
//! Core primitives shared across the footfall workspace.

pub mod config;
mod key;

use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use config::{DictionaryMapping, EngineConfig, VariatorConfig};
pub use key::{ResourceKey, ResourceKeyError, DEFAULT_NAMESPACE};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Signed tick distance from `mark` to `self`.
    ///
    /// Negative while `self` has not yet reached `mark`.
    pub fn age_since(self, mark: SimTick) -> i64 {
        self.0 as i64 - mark.0 as i64
    }
}

/// Persistent entity identity supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Helper to derive a reproducible per-entity RNG.
///
/// Two engines built with the same world seed produce identical random
/// streams for the same entity, which is what makes recorded motion traces
/// replayable in tests.
pub fn entity_rng(world_seed: u64, entity: EntityId) -> SmallRng {
    let seed = world_seed ^ entity.0.rotate_left(17);
    SmallRng::seed_from_u64(seed)
}
