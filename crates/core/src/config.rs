//! Parsed configuration records handed to the engine at init.
//!
//! The engine never reads configuration files itself; the host parses them
//! and passes these records in. All fields carry defaults so partial
//! documents deserialize cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gait constants for one variator entry.
///
/// Defaults match the built-in `default` variator so a config that only
/// overrides a field or two behaves sensibly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariatorConfig {
    /// Ticks of no motion before the entity is considered immobile.
    pub immobile_duration: u32,
    /// Whether jumping also fires a normal step event at the takeoff foot.
    pub event_on_jump: bool,
    /// Minimum fall distance for a landing to count as hard.
    pub land_hard_distance_min: f32,
    /// Speed below which jump/land events fire at both feet.
    pub speed_to_jump_as_multifoot: f32,
    /// Horizontal speed at which the gait switches to running.
    pub speed_to_run: f32,
    /// Distance between step events on flat ground.
    pub stride: f32,
    /// Distance between step events on stairs.
    pub stride_stair: f32,
    /// Distance between step events on ladders (vertical).
    pub stride_ladder: f32,
    /// Whether slow movement produces wander events.
    pub play_wander: bool,
    /// Whether the entity walks on four feet.
    pub quadruped: bool,
    /// Whether leaving the ground produces a jump event.
    pub play_jump: bool,
    /// Lateral foot offset from the entity centre.
    pub distance_to_center: f32,
    /// Whether qualifying terrain receives footprints.
    pub has_footprint: bool,
    /// Footprint decal scale.
    pub footprint_scale: f32,
    /// Volume multiplier applied to every emitted sound.
    pub volume_scale: f32,
}

impl Default for VariatorConfig {
    fn default() -> Self {
        Self {
            immobile_duration: 200,
            event_on_jump: true,
            land_hard_distance_min: 0.9,
            speed_to_jump_as_multifoot: 0.005,
            speed_to_run: 0.022,
            stride: 1.25,
            stride_stair: 1.25 * 0.65,
            stride_ladder: 0.5,
            play_wander: true,
            quadruped: false,
            play_jump: false,
            distance_to_center: 0.2,
            has_footprint: true,
            footprint_scale: 1.0,
            volume_scale: 1.0,
        }
    }
}

/// Maps one acoustic profile onto a set of block dictionary entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMapping {
    /// Acoustic class applied to every matching block.
    pub acoustic_profile: String,
    /// Dictionary names resolved through the host block registry.
    pub dictionary_entries: Vec<String>,
}

/// Everything the engine needs from configuration, already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Dictionary-driven block class mappings, applied first.
    pub forge_mappings: Vec<DictionaryMapping>,
    /// Explicit block pattern to acoustic class mappings.
    pub footsteps: BTreeMap<String, String>,
    /// Footprint overrides; a leading `@` marks material mode.
    pub footprints: Vec<String>,
    /// Named variator definitions.
    pub variators: BTreeMap<String, VariatorConfig>,
    /// Use the slower first-person cadence presets for the player.
    pub first_person_footstep_cadence: bool,
    /// Give the player a quadruped gait.
    pub footsteps_quadruped: bool,
    /// Radius inside which entity ambient effects are tracked.
    pub special_effect_range: f32,
    /// Log the missing-acoustics diagnostic after init.
    pub enable_debug_logging: bool,
    /// Replacement volume for thunder sounds.
    pub thunder_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            forge_mappings: Vec::new(),
            footsteps: BTreeMap::new(),
            footprints: Vec::new(),
            variators: BTreeMap::new(),
            first_person_footstep_cadence: false,
            footsteps_quadruped: false,
            special_effect_range: 16.0,
            enable_debug_logging: false,
            thunder_volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variator_defaults_match_default_gait() {
        let v = VariatorConfig::default();
        assert_eq!(v.immobile_duration, 200);
        assert!((v.stride - 1.25).abs() < f32::EPSILON);
        assert!((v.stride_stair - 0.8125).abs() < 1e-6);
        assert!(!v.quadruped);
        assert!(v.has_footprint);
    }

    #[test]
    fn engine_config_default_is_empty() {
        let cfg = EngineConfig::default();
        assert!(cfg.footsteps.is_empty());
        assert!(cfg.variators.is_empty());
        assert_eq!(cfg.special_effect_range, 16.0);
    }
}
