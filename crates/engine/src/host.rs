//! Host abstraction seams.
//!
//! The engine never talks to a game engine directly; everything it needs
//! from the world, the audio mixer, and the particle layer comes through
//! these traits. Tests drive the engine with the recording implementations
//! from `footfall-testkit`.

use crate::acoustics::SoundDescriptor;
use crate::state::{BlockInfo, BlockState, Material, StepSound};
use footfall_core::{EntityId, ResourceKey};
use glam::Vec3;

/// Opaque handle to a sound started by the host audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundHandle(pub u64);

/// Read-only world and block-registry queries.
pub trait WorldQuery {
    /// Block state at integer world coordinates.
    fn block_state_at(&self, x: i32, y: i32, z: i32) -> BlockState;

    /// Material of a block state.
    fn material_of(&self, state: &BlockState) -> Material;

    /// Whether the state is a liquid.
    fn is_liquid(&self, state: &BlockState) -> bool;

    /// Whether the state is a full (source) water block.
    fn is_full_water_block(&self, state: &BlockState) -> bool;

    /// The built-in step sound of a state, if it has one.
    fn step_sound_of(&self, state: &BlockState) -> Option<StepSound>;

    /// Climate temperature at a world position; below ~0.2 is freezing.
    fn temperature_at(&self, pos: Vec3) -> f32;

    /// Every block the host knows about, in stable order.
    fn blocks(&self) -> Vec<BlockInfo>;

    /// Blocks registered under a dictionary entry (e.g. `plankWood`).
    fn dictionary_blocks(&self, entry: &str) -> Vec<ResourceKey>;
}

/// The host audio mixer.
///
/// `play` may refuse (capacity, distance culling); callers treat a `None`
/// handle as transient and either retry from the pending queue or drop.
pub trait AudioSink {
    /// Start a sound; `None` means the host rejected it.
    fn play(&mut self, sound: &SoundDescriptor) -> Option<SoundHandle>;

    /// Stop one sound.
    fn stop(&mut self, handle: SoundHandle);

    /// Stop everything.
    fn stop_all(&mut self);

    /// Adjust the volume of a playing sound.
    fn set_volume(&mut self, handle: SoundHandle, volume: f32);

    /// Whether a handle is still audible.
    fn is_playing(&self, handle: SoundHandle) -> bool;

    /// Currently playing sound count.
    fn current_count(&self) -> usize;

    /// Host channel capacity.
    fn max_count(&self) -> usize;
}

/// The host particle/decal layer.
pub trait ParticleSink {
    /// Stamp a footprint decal on the ground.
    fn emit_footprint(&mut self, pos: Vec3, yaw: f32, scale: f32, is_right: bool);

    /// Spawn a generic particle.
    fn emit_particle(&mut self, kind: &str, pos: Vec3, vel: Vec3);
}

/// A host entity as observed this tick.
pub trait EntityView {
    /// Persistent entity id.
    fn id(&self) -> EntityId;

    /// World position (feet).
    fn position(&self) -> Vec3;

    /// False once the entity died or despawned.
    fn is_alive(&self) -> bool;

    /// Whether the entity is a child-sized variant.
    fn is_child(&self) -> bool;

    /// Whether the entity is the local player.
    fn is_player(&self) -> bool;

    /// Entity class name used to select a variator (e.g. `villager`).
    fn variator_hint(&self) -> &str;
}
