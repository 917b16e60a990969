//! Block-state descriptors, matchers, and the world-data records the engine
//! receives from the host.

use bitflags::bitflags;
use footfall_core::ResourceKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reserved step-sound name for blocks whose sound event has no usable name.
pub const UNDEFINED_SOUND: &str = "UNDEFINED";

/// An opaque block-state identity: block key plus concrete property values.
///
/// Equality is structural, so two states with the same key and properties
/// are the same state regardless of where they were observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    key: ResourceKey,
    props: BTreeMap<String, String>,
}

impl BlockState {
    /// A state with no properties.
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            props: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// The air state.
    pub fn air() -> Self {
        Self::new(ResourceKey::parse("air").expect("air is a valid key"))
    }

    /// Whether this is the air state.
    pub fn is_air(&self) -> bool {
        self.key.namespace() == "minecraft" && self.key.path() == "air"
    }

    /// Block key.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// Concrete property values.
    pub fn props(&self) -> &BTreeMap<String, String> {
        &self.props
    }
}

fn fmt_key_props(
    f: &mut fmt::Formatter<'_>,
    key: &ResourceKey,
    props: &BTreeMap<String, String>,
) -> fmt::Result {
    write!(f, "{key}")?;
    if !props.is_empty() {
        write!(f, "[")?;
        for (i, (k, v)) in props.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, "]")?;
    }
    Ok(())
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_key_props(f, &self.key, &self.props)
    }
}

/// A pattern over block-states: a key plus a (possibly empty) property
/// subset. An empty subset matches every state of the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStateMatcher {
    key: ResourceKey,
    props: BTreeMap<String, String>,
}

impl BlockStateMatcher {
    /// Parse the textual form `key` or `key[prop=value,...]`.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let pattern = pattern.trim();
        let (key_text, props_text) = match pattern.split_once('[') {
            Some((k, rest)) => {
                let body = rest
                    .strip_suffix(']')
                    .ok_or_else(|| format!("unterminated property list in '{pattern}'"))?;
                (k, Some(body))
            }
            None => (pattern, None),
        };

        let key = ResourceKey::parse(key_text).map_err(|e| e.to_string())?;
        let mut props = BTreeMap::new();
        if let Some(body) = props_text {
            for pair in body.split(',').filter(|p| !p.trim().is_empty()) {
                let (name, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("property '{pair}' is not name=value"))?;
                props.insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        Ok(Self { key, props })
    }

    /// Matcher over every state of `key`.
    pub fn any_state(key: ResourceKey) -> Self {
        Self {
            key,
            props: BTreeMap::new(),
        }
    }

    /// Block key this matcher covers.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// True when every listed property equals the state's value.
    pub fn matches(&self, state: &BlockState) -> bool {
        if self.key != *state.key() {
            return false;
        }
        self.props
            .iter()
            .all(|(k, v)| state.props().get(k).map(|s| s == v).unwrap_or(false))
    }

    /// Number of properties the matcher pins down; higher is more specific.
    pub fn specificity(&self) -> usize {
        self.props.len()
    }
}

impl fmt::Display for BlockStateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_key_props(f, &self.key, &self.props)
    }
}

/// Coarse block material, used for footprint qualification and the
/// generator's substrate predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// No material (air).
    Air,
    /// Clay blocks.
    Clay,
    /// Grass-topped ground.
    Grass,
    /// Dirt and similar loose ground.
    Ground,
    /// Regular ice.
    Ice,
    /// Compressed ice.
    PackedIce,
    /// Sand and gravel-likes.
    Sand,
    /// Placed snow blocks.
    CraftedSnow,
    /// Snow layers.
    Snow,
    /// Stone and ores.
    Rock,
    /// Logs, planks, and other timber.
    Wood,
    /// Crops, flowers, and other soft vegetation.
    Plants,
    /// Tree leaves.
    Leaves,
    /// Water.
    Water,
    /// Lava.
    Lava,
    /// Woven floor coverings.
    Carpet,
    /// Glass and similar brittle blocks.
    Glass,
    /// Metal blocks.
    Metal,
}

impl Material {
    /// Whether entities collide with this material rather than pass through.
    pub fn blocks_movement(self) -> bool {
        !matches!(
            self,
            Material::Air | Material::Plants | Material::Water | Material::Lava
        )
    }

    /// Whether the material is a liquid.
    pub fn is_liquid(self) -> bool {
        matches!(self, Material::Water | Material::Lava)
    }
}

/// A block's built-in step sound as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSound {
    /// Sound event name, or [`UNDEFINED_SOUND`] when the host has none.
    pub name: String,
    /// Base volume.
    pub volume: f32,
    /// Base pitch.
    pub pitch: f32,
}

impl StepSound {
    /// Volume/pitch signature used to key explicit primitive variants.
    pub fn signature(&self) -> String {
        format!("{:.2}_{:.2}", self.volume, self.pitch)
    }

    /// Whether the sound name is the reserved undefined marker.
    pub fn is_undefined(&self) -> bool {
        self.name == UNDEFINED_SOUND
    }
}

bitflags! {
    /// Block trait flags consumed by the heuristic seeder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockTraits: u32 {
        /// Growing crop block.
        const CROP = 1 << 0;
        /// Tree sapling.
        const SAPLING = 1 << 1;
        /// Reed/cane style plant.
        const REED = 1 << 2;
        /// Fence block.
        const FENCE = 1 << 3;
        /// Flower.
        const FLOWER = 1 << 4;
        /// Mushroom.
        const MUSHROOM = 1 << 5;
        /// Tree trunk.
        const LOG = 1 << 6;
        /// Sawn planks.
        const PLANKS = 1 << 7;
        /// Door block.
        const DOOR = 1 << 8;
        /// Leaf block.
        const LEAVES = 1 << 9;
        /// Ore-bearing stone.
        const ORE = 1 << 10;
        /// Ice block.
        const ICE = 1 << 11;
    }
}

/// One entry of the host's block registry.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    /// Block key.
    pub key: ResourceKey,
    /// Trait flags for heuristic classification.
    pub traits: BlockTraits,
    /// Maximum crop age for [`BlockTraits::CROP`] blocks.
    pub crop_max_age: Option<u8>,
    /// Every concrete state the block expands to.
    pub states: Vec<BlockState>,
}
