//! A scriptable in-memory world for driving the engine in tests.

use footfall_core::ResourceKey;
use footfall_engine::host::WorldQuery;
use footfall_engine::{BlockInfo, BlockState, BlockTraits, Material, StepSound};
use glam::Vec3;
use std::collections::HashMap;

/// Builder-style mock world backing the [`WorldQuery`] trait.
pub struct MockWorld {
    infos: Vec<BlockInfo>,
    materials: HashMap<ResourceKey, Material>,
    step_sounds: HashMap<ResourceKey, StepSound>,
    dictionary: HashMap<String, Vec<ResourceKey>>,
    placed: HashMap<(i32, i32, i32), BlockState>,
    temperature: f32,
}

impl MockWorld {
    /// An empty world at a mild temperature.
    pub fn new() -> Self {
        Self {
            infos: Vec::new(),
            materials: HashMap::new(),
            step_sounds: HashMap::new(),
            dictionary: HashMap::new(),
            placed: HashMap::new(),
            temperature: 0.8,
        }
    }

    /// A world populated with the standard test block set.
    pub fn standard() -> Self {
        let mut world = Self::new();
        world.add_block("air", BlockTraits::empty(), Material::Air, None);
        world.add_block(
            "grass_block",
            BlockTraits::empty(),
            Material::Grass,
            Some(("minecraft:block.grass.step", 1.0, 1.0)),
        );
        world.add_block(
            "dirt",
            BlockTraits::empty(),
            Material::Ground,
            Some(("minecraft:block.gravel.step", 1.0, 1.0)),
        );
        world.add_block(
            "stone",
            BlockTraits::empty(),
            Material::Rock,
            Some(("minecraft:block.stone.step", 1.0, 1.0)),
        );
        world.add_block(
            "sand",
            BlockTraits::empty(),
            Material::Sand,
            Some(("minecraft:block.sand.step", 0.15, 1.0)),
        );
        world.add_block(
            "snow",
            BlockTraits::empty(),
            Material::Snow,
            Some(("minecraft:block.snow.step", 0.4, 1.0)),
        );
        world.add_block(
            "oak_stairs",
            BlockTraits::PLANKS,
            Material::Wood,
            Some(("minecraft:block.wood.step", 1.0, 1.0)),
        );
        world.add_block(
            "oak_log",
            BlockTraits::LOG,
            Material::Wood,
            Some(("minecraft:block.wood.step", 1.0, 1.0)),
        );
        world.add_block(
            "oak_door",
            BlockTraits::DOOR,
            Material::Wood,
            Some(("minecraft:block.wood.step", 1.0, 1.0)),
        );
        world.add_block(
            "oak_leaves",
            BlockTraits::LEAVES,
            Material::Leaves,
            Some(("minecraft:block.grass.step", 0.6, 1.0)),
        );
        world.add_block(
            "iron_ore",
            BlockTraits::ORE,
            Material::Rock,
            Some(("minecraft:block.stone.step", 1.0, 1.0)),
        );
        world.add_block(
            "ice",
            BlockTraits::ICE,
            Material::Ice,
            Some(("minecraft:block.glass.step", 1.0, 1.0)),
        );
        world.add_block("water", BlockTraits::empty(), Material::Water, None);
        world.add_block("poppy", BlockTraits::FLOWER, Material::Plants, None);
        world.add_block("red_mushroom", BlockTraits::MUSHROOM, Material::Plants, None);
        world.add_block("short_grass", BlockTraits::empty(), Material::Plants, None);
        world.add_crop("wheat", 7);
        world.add_crop("beetroots", 3);
        world.add_block("oak_sapling", BlockTraits::SAPLING, Material::Plants, None);
        world.add_block("sugar_cane", BlockTraits::REED, Material::Plants, None);
        world.add_block(
            "oak_fence",
            BlockTraits::FENCE,
            Material::Wood,
            Some(("minecraft:block.wood.step", 1.0, 1.0)),
        );
        world.add_block(
            "white_carpet",
            BlockTraits::empty(),
            Material::Carpet,
            Some(("minecraft:block.wool.step", 0.4, 1.0)),
        );
        world
    }

    /// Register a block with a single property-free state.
    pub fn add_block(
        &mut self,
        key: &str,
        traits: BlockTraits,
        material: Material,
        step: Option<(&str, f32, f32)>,
    ) -> BlockState {
        let key = ResourceKey::parse(key).expect("valid block key");
        let state = BlockState::new(key.clone());
        self.materials.insert(key.clone(), material);
        if let Some((name, volume, pitch)) = step {
            self.step_sounds.insert(
                key.clone(),
                StepSound {
                    name: name.to_string(),
                    volume,
                    pitch,
                },
            );
        }
        self.infos.push(BlockInfo {
            key,
            traits,
            crop_max_age: None,
            states: vec![state.clone()],
        });
        state
    }

    /// Register a crop block with one state per growth age.
    pub fn add_crop(&mut self, key: &str, max_age: u8) {
        let key = ResourceKey::parse(key).expect("valid block key");
        self.materials.insert(key.clone(), Material::Plants);
        let states = (0..=max_age)
            .map(|age| BlockState::new(key.clone()).with_prop("age", age.to_string()))
            .collect();
        self.infos.push(BlockInfo {
            key,
            traits: BlockTraits::CROP,
            crop_max_age: Some(max_age),
            states,
        });
    }

    /// Register a dictionary entry mapping to block keys.
    pub fn add_dictionary(&mut self, entry: &str, keys: &[&str]) {
        self.dictionary.insert(
            entry.to_string(),
            keys.iter()
                .map(|k| ResourceKey::parse(k).expect("valid block key"))
                .collect(),
        );
    }

    /// Place a block state at fixed coordinates for `block_state_at`.
    pub fn place(&mut self, x: i32, y: i32, z: i32, state: BlockState) {
        self.placed.insert((x, y, z), state);
    }

    /// Set the uniform climate temperature.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = temperature;
    }

    /// The single property-free state of a registered block.
    pub fn state(&self, key: &str) -> BlockState {
        BlockState::new(ResourceKey::parse(key).expect("valid block key"))
    }
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::standard()
    }
}

impl WorldQuery for MockWorld {
    fn block_state_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.placed
            .get(&(x, y, z))
            .cloned()
            .unwrap_or_else(BlockState::air)
    }

    fn material_of(&self, state: &BlockState) -> Material {
        self.materials
            .get(state.key())
            .copied()
            .unwrap_or(Material::Air)
    }

    fn is_liquid(&self, state: &BlockState) -> bool {
        self.material_of(state).is_liquid()
    }

    fn is_full_water_block(&self, state: &BlockState) -> bool {
        self.material_of(state) == Material::Water && state.props().is_empty()
    }

    fn step_sound_of(&self, state: &BlockState) -> Option<StepSound> {
        self.step_sounds.get(state.key()).cloned()
    }

    fn temperature_at(&self, _pos: Vec3) -> f32 {
        self.temperature
    }

    fn blocks(&self) -> Vec<BlockInfo> {
        self.infos.clone()
    }

    fn dictionary_blocks(&self, entry: &str) -> Vec<ResourceKey> {
        self.dictionary.get(entry).cloned().unwrap_or_default()
    }
}
