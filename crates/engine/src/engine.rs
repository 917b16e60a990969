//! The engine facade: owns the registries, the per-entity generators, the
//! scheduler, and the effect dispatcher, and exposes the host-facing
//! lifecycle.

use crate::acoustics::SoundDescriptor;
use crate::effects::EffectDispatcher;
use crate::footsteps::FootstepRegistry;
use crate::generator::{Generator, StepContext, StepInputs};
use crate::host::{AudioSink, EntityView, ParticleSink, SoundHandle, WorldQuery};
use crate::scheduler::SoundScheduler;
use footfall_core::{entity_rng, EngineConfig, EntityId, SimTick};
use glam::Vec3;
use std::collections::HashMap;
use tracing::info;

/// Ambient rain intensity, clamped to `[0, 1]` on every write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RainState {
    intensity: f32,
}

impl RainState {
    /// Minimum intensity.
    pub const MIN_INTENSITY: f32 = 0.0;
    /// Maximum intensity.
    pub const MAX_INTENSITY: f32 = 1.0;

    /// Current intensity.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Set the intensity, clamping out-of-range values.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(Self::MIN_INTENSITY, Self::MAX_INTENSITY);
    }
}

/// The footstep acoustics engine.
///
/// Single-threaded: every method is called from the host's client tick
/// thread, and the registries are read-only once [`bootstrap`] returns.
///
/// [`bootstrap`]: FootstepEngine::bootstrap
pub struct FootstepEngine {
    registry: FootstepRegistry,
    scheduler: SoundScheduler,
    effects: EffectDispatcher,
    generators: HashMap<EntityId, Generator>,
    config: EngineConfig,
    rain: RainState,
    world_seed: u64,
    tick: SimTick,
}

impl FootstepEngine {
    /// Run the full registry lifecycle (pre-init, seed, init, post-init)
    /// and return a ready engine.
    pub fn bootstrap(world: &dyn WorldQuery, config: EngineConfig, world_seed: u64) -> Self {
        let mut registry = FootstepRegistry::new();
        registry.seed(world);
        registry.init(world, &config);
        registry.post_init(world, &config);
        info!("footstep engine ready");

        Self {
            registry,
            scheduler: SoundScheduler::new(config.thunder_volume),
            effects: EffectDispatcher::new(config.special_effect_range, world_seed),
            generators: HashMap::new(),
            config,
            rain: RainState::default(),
            world_seed,
            tick: SimTick::ZERO,
        }
    }

    /// Feed one tick of motion for one entity.
    ///
    /// The first observation of an entity creates its generator, with a
    /// variator chosen from the entity's class and the player flags.
    pub fn tick_entity(
        &mut self,
        world: &dyn WorldQuery,
        audio: &mut dyn AudioSink,
        particles: &mut dyn ParticleSink,
        entity: &dyn EntityView,
        inputs: &StepInputs,
    ) {
        let id = entity.id();
        if !self.generators.contains_key(&id) {
            let variator = self
                .registry
                .variator_for(entity, self.config.footsteps_quadruped)
                .clone();
            let rng = entity_rng(self.world_seed, id);
            self.generators.insert(id, Generator::new(variator, rng));
        }
        let generator = self
            .generators
            .get_mut(&id)
            .expect("generator inserted above");

        let mut ctx = StepContext {
            world,
            registry: &mut self.registry,
            scheduler: &mut self.scheduler,
            audio,
            particles,
            rain_intensity: self.rain.intensity(),
        };
        generator.tick(inputs, &mut ctx);
    }

    /// Per-player-tick housekeeping: scheduler pass, effect handlers, and
    /// pruning of generators whose entities are gone or out of range.
    pub fn tick_player(
        &mut self,
        tick: SimTick,
        world: &dyn WorldQuery,
        audio: &mut dyn AudioSink,
        particles: &mut dyn ParticleSink,
        player_pos: Vec3,
        entities: &[&dyn EntityView],
    ) {
        self.tick = tick;
        self.scheduler.tick(tick, audio);
        self.effects
            .tick(tick, world, particles, player_pos, entities);

        let range_sq = self.config.special_effect_range * self.config.special_effect_range;
        let live: HashMap<EntityId, Vec3> = entities
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| (e.id(), e.position()))
            .collect();
        self.generators.retain(|id, _| {
            live.get(id)
                .map(|pos| pos.distance_squared(player_pos) <= range_sq)
                .unwrap_or(false)
        });
    }

    /// Immediate or delayed positioned play.
    pub fn play_at(
        &mut self,
        audio: &mut dyn AudioSink,
        descriptor: SoundDescriptor,
        delay_ticks: u32,
    ) -> Option<SoundHandle> {
        self.scheduler.play_at(audio, descriptor, delay_ticks)
    }

    /// Diff-merge the ambient sound set (see [`SoundScheduler::queue_ambient`]).
    pub fn queue_ambient(&mut self, sounds: &std::collections::BTreeMap<String, f32>) {
        self.scheduler.queue_ambient(sounds);
    }

    /// Drop all sounds, emitters, pending plays, and generator state.
    ///
    /// Called on world disconnect, dimension change, registry reload, or
    /// when the player joins a remote world. Idempotent.
    pub fn clear_all(&mut self, audio: &mut dyn AudioSink) {
        self.scheduler.clear_all(audio);
        self.generators.clear();
        self.effects.clear();
    }

    /// Append diagnostic lines (sound counts, emitters, pending queue).
    pub fn gather(&self, audio: &dyn AudioSink, output: &mut Vec<String>) {
        self.scheduler.gather(audio, output);
    }

    /// Update the ambient rain-intensity signal.
    pub fn set_rain_intensity(&mut self, intensity: f32) {
        self.rain.set_intensity(intensity);
    }

    /// Current rain intensity.
    pub fn rain_intensity(&self) -> f32 {
        self.rain.intensity()
    }

    /// The footstep registry.
    pub fn registry(&self) -> &FootstepRegistry {
        &self.registry
    }

    /// Mutable registry access (tests and diagnostics).
    pub fn registry_mut(&mut self) -> &mut FootstepRegistry {
        &mut self.registry
    }

    /// The sound scheduler.
    pub fn scheduler(&self) -> &SoundScheduler {
        &self.scheduler
    }

    /// The effect dispatcher.
    pub fn effects(&self) -> &EffectDispatcher {
        &self.effects
    }

    /// Number of live generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_state_clamps() {
        let mut rain = RainState::default();
        rain.set_intensity(2.0);
        assert_eq!(rain.intensity(), 1.0);
        rain.set_intensity(-0.5);
        assert_eq!(rain.intensity(), 0.0);
        rain.set_intensity(0.4);
        assert!((rain.intensity() - 0.4).abs() < 1e-6);
    }
}
