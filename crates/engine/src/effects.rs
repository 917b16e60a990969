//! Per-entity ambient effect lifecycle.
//!
//! The dispatcher tracks one handler set per nearby entity, keyed by the
//! host's persistent id. Handlers are built by the first matching
//! `(predicate, factory)` pair when an entity is first seen in range, and
//! dropped when the entity dies, despawns, or leaves the effect radius.

use crate::host::{EntityView, ParticleSink, WorldQuery};
use footfall_core::{EntityId, SimTick};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// One live ambient effect attached to an entity.
pub trait EntityEffect {
    /// Advance the effect one tick.
    fn update(
        &mut self,
        entity: &dyn EntityView,
        world: &dyn WorldQuery,
        particles: &mut dyn ParticleSink,
        tick: SimTick,
    );

    /// False once the effect wants to be removed.
    fn is_alive(&self) -> bool;
}

/// Decides whether a factory applies to an entity.
pub type EffectPredicate = fn(&dyn EntityView, &dyn WorldQuery) -> bool;
/// Builds the handler for a matched entity.
pub type EffectFactory = fn(&dyn EntityView, SmallRng) -> Box<dyn EntityEffect>;

/// Tracks ambient effect handlers for entities near the player.
pub struct EffectDispatcher {
    library: Vec<(EffectPredicate, EffectFactory)>,
    handlers: HashMap<EntityId, Box<dyn EntityEffect>>,
    range: f32,
    world_seed: u64,
}

impl EffectDispatcher {
    /// A dispatcher with the built-in effect library.
    pub fn new(range: f32, world_seed: u64) -> Self {
        let mut dispatcher = Self {
            library: Vec::new(),
            handlers: HashMap::new(),
            range,
            world_seed,
        };
        dispatcher.register(FrostBreathEffect::applies, FrostBreathEffect::build);
        dispatcher
    }

    /// Append a `(predicate, factory)` pair. First match wins.
    pub fn register(&mut self, predicate: EffectPredicate, factory: EffectFactory) {
        self.library.push((predicate, factory));
    }

    /// Process one player tick over the currently visible entities.
    ///
    /// Tracked entities missing from `entities` are treated as despawned.
    pub fn tick(
        &mut self,
        tick: SimTick,
        world: &dyn WorldQuery,
        particles: &mut dyn ParticleSink,
        player_pos: Vec3,
        entities: &[&dyn EntityView],
    ) {
        let range_sq = self.range * self.range;
        let by_id: HashMap<EntityId, &dyn EntityView> =
            entities.iter().map(|&e| (e.id(), e)).collect();

        let mut dead = Vec::new();
        for (id, handler) in self.handlers.iter_mut() {
            let Some(entity) = by_id.get(id) else {
                dead.push(*id);
                continue;
            };
            handler.update(*entity, world, particles, tick);
            if !handler.is_alive()
                || !entity.is_alive()
                || entity.position().distance_squared(player_pos) > range_sq
            {
                dead.push(*id);
            }
        }
        for id in dead {
            debug!("dropping effect handler for entity {id:?}");
            self.handlers.remove(&id);
        }

        for entity in entities {
            self.on_entity_seen(*entity, world, player_pos);
        }
    }

    /// Consider attaching a handler to a newly observed entity.
    pub fn on_entity_seen(
        &mut self,
        entity: &dyn EntityView,
        world: &dyn WorldQuery,
        player_pos: Vec3,
    ) {
        if self.handlers.contains_key(&entity.id()) || !entity.is_alive() {
            return;
        }
        if entity.position().distance_squared(player_pos) > self.range * self.range {
            return;
        }
        for (predicate, factory) in &self.library {
            if predicate(entity, world) {
                let rng = footfall_core::entity_rng(self.world_seed, entity.id());
                self.handlers.insert(entity.id(), factory(entity, rng));
                return;
            }
        }
    }

    /// Drop every handler (connect, disconnect, dimension change).
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of tracked handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Breath puffs for entities in freezing climates.
pub struct FrostBreathEffect {
    rng: SmallRng,
    next_puff: SimTick,
}

const BREATH_HEIGHT: f32 = 1.6;
const PUFF_INTERVAL_MIN: u64 = 40;
const PUFF_INTERVAL_MAX: u64 = 80;
const FREEZING_TEMPERATURE: f32 = 0.2;

impl FrostBreathEffect {
    /// Predicate: the entity stands somewhere freezing.
    pub fn applies(entity: &dyn EntityView, world: &dyn WorldQuery) -> bool {
        world.temperature_at(entity.position()) < FREEZING_TEMPERATURE
    }

    /// Factory for the dispatcher library.
    pub fn build(_entity: &dyn EntityView, rng: SmallRng) -> Box<dyn EntityEffect> {
        Box::new(Self {
            rng,
            next_puff: SimTick::ZERO,
        })
    }
}

impl EntityEffect for FrostBreathEffect {
    fn update(
        &mut self,
        entity: &dyn EntityView,
        world: &dyn WorldQuery,
        particles: &mut dyn ParticleSink,
        tick: SimTick,
    ) {
        if tick < self.next_puff {
            return;
        }
        // Re-check the climate each puff so wandering out of the cold
        // simply pauses the effect.
        if Self::applies(entity, world) {
            let mouth = entity.position() + Vec3::new(0.0, BREATH_HEIGHT, 0.0);
            let drift = Vec3::new(
                self.rng.gen_range(-0.01..=0.01),
                0.02,
                self.rng.gen_range(-0.01..=0.01),
            );
            particles.emit_particle("frost_breath", mouth, drift);
        }
        let interval = self.rng.gen_range(PUFF_INTERVAL_MIN..=PUFF_INTERVAL_MAX);
        self.next_puff = tick.advance(interval);
    }

    fn is_alive(&self) -> bool {
        true
    }
}
