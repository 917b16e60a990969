//! The footstep registry: orchestrates the acoustic registry and block map,
//! seeds heuristics from the host block registry, and resolves block states
//! to playable arrays.
//!
//! Build phases follow the host lifecycle: `new` (pre-init), [`seed`],
//! [`init`], [`post_init`]. After post-init the registry is treated as
//! read-only.
//!
//! [`seed`]: FootstepRegistry::seed
//! [`init`]: FootstepRegistry::init
//! [`post_init`]: FootstepRegistry::post_init

use crate::acoustic_registry::AcousticRegistry;
use crate::acoustics::{Acoustic, AcousticArray, AcousticSpec, Attenuation, WeightedSpec};
use crate::block_map::{split_substrate, BlockMap, SUBSTRATE_DEFAULT};
use crate::error::AcousticError;
use crate::host::{EntityView, WorldQuery};
use crate::state::{BlockInfo, BlockState, BlockStateMatcher, BlockTraits, Material};
use crate::variator::{Variator, VariatorCatalog};
use footfall_core::{EngineConfig, ResourceKey};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Step-sound names whose blocks always qualify for footprints.
const FOOTPRINT_SOUND_PROFILE: [&str; 3] = [
    "minecraft:block.sand.step",
    "minecraft:block.gravel.step",
    "minecraft:block.snow.step",
];

/// Orchestrates acoustic resolution for block states.
pub struct FootstepRegistry {
    acoustics: AcousticRegistry,
    block_map: BlockMap,
    variators: VariatorCatalog,
    blocks: BTreeMap<ResourceKey, BlockInfo>,
    footprint_materials: BTreeSet<Material>,
    footprint_states: BTreeSet<BlockState>,
    swim: AcousticArray,
    jump: AcousticArray,
    splash: AcousticArray,
    child_variator: Variator,
    player_variator: Variator,
    player_quad_variator: Variator,
}

impl FootstepRegistry {
    /// Pre-init: empty structures, baseline acoustics, and the known
    /// footprint-bearing materials.
    pub fn new() -> Self {
        let mut acoustics = AcousticRegistry::new();
        install_baseline(&mut acoustics);

        let mut footprint_materials = BTreeSet::new();
        footprint_materials.insert(Material::Clay);
        footprint_materials.insert(Material::Grass);
        footprint_materials.insert(Material::Ground);
        footprint_materials.insert(Material::Ice);
        footprint_materials.insert(Material::PackedIce);
        footprint_materials.insert(Material::Sand);
        footprint_materials.insert(Material::CraftedSnow);
        footprint_materials.insert(Material::Snow);

        Self {
            acoustics,
            block_map: BlockMap::new(),
            variators: VariatorCatalog::new(),
            blocks: BTreeMap::new(),
            footprint_materials,
            footprint_states: BTreeSet::new(),
            swim: AcousticArray::not_emitter(),
            jump: AcousticArray::not_emitter(),
            splash: AcousticArray::not_emitter(),
            child_variator: Variator::child(),
            player_variator: Variator::player(),
            player_quad_variator: Variator::player_quad(),
        }
    }

    /// Seed phase: walk the host block registry and apply the heuristic
    /// class mapping for block shapes the configuration rarely covers.
    pub fn seed(&mut self, world: &dyn WorldQuery) {
        for info in world.blocks() {
            self.blocks.insert(info.key.clone(), info);
        }

        let keys: Vec<ResourceKey> = self.blocks.keys().cloned().collect();
        for key in keys {
            let info = &self.blocks[&key];
            let traits = info.traits;
            let name = key.to_string();
            let class = if traits.contains(BlockTraits::CROP) {
                if info.crop_max_age == Some(3) {
                    "#beets"
                } else if name == "minecraft:wheat" {
                    "#wheat"
                } else if info.crop_max_age == Some(7) {
                    "#crop"
                } else {
                    continue;
                }
            } else if traits.contains(BlockTraits::SAPLING) {
                "#sapling"
            } else if traits.contains(BlockTraits::REED) {
                "#reed"
            } else if traits.contains(BlockTraits::FENCE) {
                "#fence"
            } else if traits.intersects(BlockTraits::FLOWER | BlockTraits::MUSHROOM) {
                "NOT_EMITTER"
            } else if traits.intersects(BlockTraits::LOG | BlockTraits::PLANKS) {
                "wood"
            } else if traits.contains(BlockTraits::DOOR) {
                "bluntwood"
            } else if traits.contains(BlockTraits::LEAVES) {
                "leaves"
            } else if traits.contains(BlockTraits::ORE) {
                "ore"
            } else if traits.contains(BlockTraits::ICE) {
                "ice"
            } else {
                continue;
            };
            if let Err(err) = self.register_class(class, &name) {
                warn!("seed mapping for {name} skipped: {err}");
            }
        }
    }

    /// Init phase: apply parsed configuration. Every failing entry is
    /// logged and skipped so the registry always reaches a working state.
    pub fn init(&mut self, world: &dyn WorldQuery, cfg: &EngineConfig) {
        for mapping in &cfg.forge_mappings {
            for entry in &mapping.dictionary_entries {
                let keys = world.dictionary_blocks(entry);
                if keys.is_empty() {
                    warn!("dictionary entry '{entry}' matches no blocks");
                }
                for key in keys {
                    let pattern = key.to_string();
                    if let Err(err) = self.register_class(&mapping.acoustic_profile, &pattern) {
                        warn!("dictionary mapping for {pattern} skipped: {err}");
                    }
                }
            }
        }

        for (pattern, class) in &cfg.footsteps {
            if let Err(err) = self.register_class(class, pattern) {
                warn!("footstep mapping '{pattern}' -> '{class}' skipped: {err}");
            }
        }

        for entry in &cfg.footprints {
            if let Err(err) = self.register_footprint(world, entry) {
                warn!("footprint entry '{entry}' skipped: {err}");
            }
        }

        for (name, vc) in &cfg.variators {
            self.variators.insert(name.clone(), Variator::from(vc));
        }
    }

    /// Post-init phase: compile the distinguished acoustics, select the
    /// player/child variators, extend footprint states from the sound
    /// profile, and report block states without acoustics.
    pub fn post_init(&mut self, world: &dyn WorldQuery, cfg: &EngineConfig) {
        self.swim = self.compile_or_silence("_SWIM");
        self.jump = self.compile_or_silence("_JUMP");
        let fine = self.compile_or_silence("waterfine");
        self.splash = AcousticArray::from_vec(vec![Arc::new(Acoustic::RainSplash(fine))]);

        self.child_variator = self.variators.get("child").clone();
        let player_name = if cfg.first_person_footstep_cadence {
            "player_slow"
        } else {
            "player"
        };
        self.player_variator = self.variators.get(player_name).clone();
        let quad_name = if cfg.first_person_footstep_cadence {
            "quadruped_slow"
        } else {
            "quadruped"
        };
        self.player_quad_variator = self.variators.get(quad_name).clone();

        // Blocks whose step sound matches the footprint profile get their
        // states registered even without explicit configuration.
        let mut profiled = Vec::new();
        let mut missing = Vec::new();
        for info in self.blocks.values() {
            for state in &info.states {
                if !self.block_map.has_acoustics(state) {
                    missing.push(state.clone());
                }
                let material = world.material_of(state);
                if !material.blocks_movement()
                    || self.footprint_materials.contains(&material)
                    || self.footprint_states.contains(state)
                {
                    continue;
                }
                if let Some(step) = world.step_sound_of(state) {
                    if FOOTPRINT_SOUND_PROFILE.contains(&step.name.as_str()) {
                        profiled.push(state.clone());
                    }
                }
            }
        }
        self.footprint_states.extend(profiled);

        if cfg.enable_debug_logging && !missing.is_empty() {
            info!("          >>>> MISSING ACOUSTIC ENTRIES <<<< ");
            info!("Sounds for these states will default to their step sound");
            info!("========================================================");
            let mut lines: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
            lines.sort();
            for line in lines {
                info!("{line}");
            }
        }
    }

    /// Resolve a block state to the acoustics to play for it.
    ///
    /// Never returns "nothing": a state with no configuration falls back
    /// to its primitive step sound, and the true silences (air, flowers,
    /// explicit non-emitters) come back as the NOT_EMITTER array.
    pub fn resolve(&mut self, world: &dyn WorldQuery, state: &BlockState) -> AcousticArray {
        if let Some(found) = self.block_map.lookup(state, SUBSTRATE_DEFAULT) {
            return found;
        }
        self.resolve_primitive(world, state)
    }

    /// The primitive fallback chain: explicit signature variant, then the
    /// `break_` variant for unnamed sounds, then the generic primitive.
    fn resolve_primitive(&mut self, world: &dyn WorldQuery, state: &BlockState) -> AcousticArray {
        if state.is_air() {
            return AcousticArray::not_emitter();
        }
        let Some(step) = world.step_sound_of(state) else {
            return AcousticArray::not_emitter();
        };
        if let Some(found) = self.acoustics.primitive_variant(&step.name, &step.signature()) {
            return found;
        }
        if step.is_undefined() {
            let substrate = format!("break_{}", step.name);
            if let Some(found) = self.acoustics.primitive_variant(&step.name, &substrate) {
                return found;
            }
        }
        self.acoustics.primitive(&step)
    }

    /// Substrate-specific lookup used by the generator's context checks.
    pub fn lookup_substrate(&self, state: &BlockState, substrate: &str) -> Option<AcousticArray> {
        self.block_map.lookup(state, substrate)
    }

    /// Whether a step on this state should leave a footprint.
    pub fn has_footprint(&self, world: &dyn WorldQuery, state: &BlockState) -> bool {
        self.footprint_materials.contains(&world.material_of(state))
            || self.footprint_states.contains(state)
    }

    /// The swim-stroke acoustics.
    pub fn swim(&self) -> &AcousticArray {
        &self.swim
    }

    /// The jump acoustics.
    pub fn jump(&self) -> &AcousticArray {
        &self.jump
    }

    /// The liquid-entry splash acoustics.
    pub fn splash(&self) -> &AcousticArray {
        &self.splash
    }

    /// The variator catalog.
    pub fn variators(&self) -> &VariatorCatalog {
        &self.variators
    }

    /// Select the variator for an entity.
    pub fn variator_for(&self, entity: &dyn EntityView, footsteps_quadruped: bool) -> &Variator {
        if entity.is_child() {
            &self.child_variator
        } else if entity.is_player() {
            if footsteps_quadruped {
                &self.player_quad_variator
            } else {
                &self.player_variator
            }
        } else {
            self.variators.get(entity.variator_hint())
        }
    }

    /// Direct access to the acoustic registry (compile, primitives).
    pub fn acoustics_mut(&mut self) -> &mut AcousticRegistry {
        &mut self.acoustics
    }

    /// Register `pattern` (optionally `substrate+pattern`) to play the
    /// compiled `class`.
    pub fn register_class(&mut self, class: &str, pattern: &str) -> Result<(), AcousticError> {
        let (substrate, pattern_text) = split_substrate(pattern);
        let matcher = BlockStateMatcher::parse(pattern_text)
            .map_err(|_| AcousticError::UnknownBlockPattern(pattern.to_string()))?;
        if !self.blocks.contains_key(matcher.key()) {
            return Err(AcousticError::UnknownBlockPattern(pattern.to_string()));
        }
        let acoustics = self.acoustics.compile(class)?;
        self.block_map.register(substrate, matcher, acoustics);
        Ok(())
    }

    fn register_footprint(
        &mut self,
        world: &dyn WorldQuery,
        entry: &str,
    ) -> Result<(), AcousticError> {
        let (material_mode, text) = match entry.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, entry),
        };
        let matcher = BlockStateMatcher::parse(text)
            .map_err(|_| AcousticError::UnknownBlockPattern(entry.to_string()))?;
        let info = self
            .blocks
            .get(matcher.key())
            .ok_or_else(|| AcousticError::UnknownBlockPattern(entry.to_string()))?;
        if material_mode {
            let probe = info
                .states
                .first()
                .cloned()
                .unwrap_or_else(|| BlockState::new(matcher.key().clone()));
            self.footprint_materials.insert(world.material_of(&probe));
        } else {
            self.footprint_states
                .extend(info.states.iter().filter(|s| matcher.matches(s)).cloned());
        }
        Ok(())
    }

    fn compile_or_silence(&mut self, reference: &str) -> AcousticArray {
        match self.acoustics.compile(reference) {
            Ok(array) => array,
            Err(err) => {
                warn!("compiling '{reference}' failed, staying silent: {err}");
                AcousticArray::not_emitter()
            }
        }
    }
}

impl Default for FootstepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn leaf(name: &str, vol_min: f32, vol_max: f32) -> AcousticSpec {
    AcousticSpec::Basic {
        name: format!("footfall:{name}"),
        vol_min,
        vol_max,
        pitch_min: 0.9,
        pitch_max: 1.1,
        attenuation: Attenuation::Linear,
    }
}

fn gait_event(base: &str) -> AcousticSpec {
    let mut chains = BTreeMap::new();
    chains.insert("wander".to_string(), leaf(base, 0.3, 0.45));
    chains.insert("walk".to_string(), leaf(base, 0.6, 0.8));
    chains.insert("run".to_string(), leaf(base, 0.9, 1.0));
    AcousticSpec::Event { chains }
}

fn reference(name: &str) -> AcousticSpec {
    AcousticSpec::Ref { name: name.into() }
}

/// The built-in acoustic library; configuration may redefine any entry.
fn install_baseline(registry: &mut AcousticRegistry) {
    registry.define("grass", gait_event("step.grass"));
    registry.define("ground", gait_event("step.ground"));
    registry.define("stone", gait_event("step.stone"));
    registry.define("sand", gait_event("step.sand"));
    registry.define("gravel", gait_event("step.gravel"));
    registry.define("snow", gait_event("step.snow"));
    registry.define("wood", gait_event("step.wood"));
    registry.define("bluntwood", gait_event("step.bluntwood"));
    registry.define("leaves", gait_event("step.leaves"));
    registry.define("ore", gait_event("step.ore"));
    registry.define("ice", gait_event("step.ice"));

    registry.define("brush", leaf("step.brush", 0.4, 0.6));
    registry.define("#wheat", reference("brush"));
    registry.define("#crop", reference("brush"));
    registry.define("#beets", reference("brush"));
    registry.define("#sapling", reference("brush"));
    registry.define("#reed", reference("brush"));
    registry.define("#fence", reference("wood"));

    let mut foliage = BTreeMap::new();
    foliage.insert("leafy".to_string(), leaf("rustle.leafy", 0.4, 0.6));
    foliage.insert("brushy".to_string(), leaf("rustle.brushy", 0.3, 0.5));
    registry.define("foliage", AcousticSpec::Event { chains: foliage });

    registry.define(
        "waterfine",
        AcousticSpec::Probability {
            entries: vec![
                WeightedSpec {
                    weight: 3.0,
                    spec: leaf("water.fine_a", 0.6, 0.8),
                },
                WeightedSpec {
                    weight: 3.0,
                    spec: leaf("water.fine_b", 0.6, 0.8),
                },
                WeightedSpec {
                    weight: 1.0,
                    spec: leaf("water.fine_big", 0.9, 1.0),
                },
            ],
        },
    );
    registry.define("_SWIM", leaf("water.swim", 0.8, 1.0));
    registry.define("_JUMP", leaf("jump", 0.4, 0.6));
}
