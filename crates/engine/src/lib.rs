//! Footstep acoustics engine.
//!
//! Given a moving entity's position, velocity, and the block it stands on,
//! the engine decides which sounds to play, when, and where, producing
//! spatialised sound descriptors and optional ground footprints. The host
//! game engine stays behind the traits in [`host`]; the engine emits
//! descriptors, never audio.
//!
//! # Architecture
//!
//! - [`AcousticRegistry`] - named acoustic definitions and the composite
//!   compiler
//! - [`BlockMap`] - substrate-aware block-state to acoustic mapping
//! - [`FootstepRegistry`] - orchestration, heuristic seeding, resolution
//! - [`Generator`] - the per-entity step state machine
//! - [`SoundScheduler`] - immediate/delayed dispatch and ambient emitters
//! - [`EffectDispatcher`] - per-entity ambient effects (frost breath)
//! - [`FootstepEngine`] - the facade tying it all together

mod acoustic_registry;
mod acoustics;
mod block_map;
mod effects;
mod engine;
mod error;
mod footprint;
mod footsteps;
mod generator;
pub mod host;
mod scheduler;
mod state;
mod variator;

// Re-export the core records callers pass in, so dependents rarely need
// footfall-core directly.
pub use footfall_core::{DictionaryMapping, EngineConfig, EntityId, ResourceKey, SimTick, VariatorConfig};

pub use acoustic_registry::{AcousticRegistry, PrimitiveVariantSpec, NOT_EMITTER_NAME};
pub use acoustics::{
    Acoustic, AcousticArray, AcousticSpec, Attenuation, BasicAcoustic, EventTag, PlayContext,
    QueuedPlay, SoundDescriptor, WeightedSpec,
};
pub use block_map::{split_substrate, BlockMap, SUBSTRATE_DEFAULT};
pub use effects::{EffectDispatcher, EffectFactory, EffectPredicate, EntityEffect, FrostBreathEffect};
pub use engine::{FootstepEngine, RainState};
pub use error::AcousticError;
pub use footprint::Footprint;
pub use footsteps::FootstepRegistry;
pub use generator::{Generator, StepContext, StepInputs, StepState};
pub use scheduler::{SoundScheduler, SCHEDULER_CADENCE};
pub use state::{
    BlockInfo, BlockState, BlockStateMatcher, BlockTraits, Material, StepSound, UNDEFINED_SOUND,
};
pub use variator::{Variator, VariatorCatalog};
