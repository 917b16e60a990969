//! Gait constants and the named catalog the registry selects from.

use crate::error::AcousticError;
use footfall_core::VariatorConfig;
use std::collections::BTreeMap;
use tracing::warn;

/// A bundle of gait constants parameterising a step generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Variator {
    /// Ticks of no motion before the entity counts as immobile.
    pub immobile_duration: u32,
    /// Whether jumping also fires a step event at the takeoff foot.
    pub event_on_jump: bool,
    /// Minimum fall distance for a hard landing.
    pub land_hard_distance_min: f32,
    /// Speed below which jump/land events fire at both feet.
    pub speed_to_jump_as_multifoot: f32,
    /// Speed at which the gait switches to running.
    pub speed_to_run: f32,
    /// Step distance on flat ground.
    pub stride: f32,
    /// Step distance on stairs.
    pub stride_stair: f32,
    /// Step distance on ladders.
    pub stride_ladder: f32,
    /// Whether slow movement produces wander events.
    pub play_wander: bool,
    /// Four-footed gait.
    pub quadruped: bool,
    /// Whether leaving the ground produces a jump event.
    pub play_jump: bool,
    /// Lateral foot offset from the entity centre.
    pub distance_to_center: f32,
    /// Whether qualifying terrain receives footprints.
    pub has_footprint: bool,
    /// Footprint decal scale.
    pub footprint_scale: f32,
    /// Volume multiplier for every emitted sound.
    pub volume_scale: f32,
}

impl From<&VariatorConfig> for Variator {
    fn from(cfg: &VariatorConfig) -> Self {
        Self {
            immobile_duration: cfg.immobile_duration,
            event_on_jump: cfg.event_on_jump,
            land_hard_distance_min: cfg.land_hard_distance_min,
            speed_to_jump_as_multifoot: cfg.speed_to_jump_as_multifoot,
            speed_to_run: cfg.speed_to_run,
            stride: cfg.stride,
            stride_stair: cfg.stride_stair,
            stride_ladder: cfg.stride_ladder,
            play_wander: cfg.play_wander,
            quadruped: cfg.quadruped,
            play_jump: cfg.play_jump,
            distance_to_center: cfg.distance_to_center,
            has_footprint: cfg.has_footprint,
            footprint_scale: cfg.footprint_scale,
            volume_scale: cfg.volume_scale,
        }
    }
}

impl Variator {
    /// The baseline biped gait.
    pub fn default_gait() -> Self {
        Variator::from(&VariatorConfig::default())
    }

    /// Player preset: default gait plus an audible jump.
    pub fn player() -> Self {
        Self {
            play_jump: true,
            ..Self::default_gait()
        }
    }

    /// Player riding/crawling as a quadruped.
    pub fn player_quad() -> Self {
        Self {
            quadruped: true,
            play_jump: true,
            footprint_scale: 0.75,
            ..Self::default_gait()
        }
    }

    /// Villager preset (identical to the default gait).
    pub fn villager() -> Self {
        Self::default_gait()
    }

    /// Child preset: half stride, small quiet prints.
    pub fn child() -> Self {
        Self {
            stride: 0.625,
            stride_stair: 0.625 * 0.65,
            distance_to_center: 0.1,
            footprint_scale: 0.5,
            volume_scale: 0.25,
            ..Self::default_gait()
        }
    }

    /// Skeleton preset: default stride, bony and quiet.
    pub fn skeleton() -> Self {
        Self {
            footprint_scale: 0.5,
            volume_scale: 0.25,
            ..Self::default_gait()
        }
    }
}

/// Read-only (after init) catalog of named variators.
#[derive(Debug)]
pub struct VariatorCatalog {
    entries: BTreeMap<String, Variator>,
}

impl VariatorCatalog {
    /// A catalog pre-seeded with the built-in presets.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("default".to_string(), Variator::default_gait());
        entries.insert("player".to_string(), Variator::player());
        entries.insert("player_quad".to_string(), Variator::player_quad());
        entries.insert("quadruped".to_string(), Variator::player_quad());
        entries.insert("villager".to_string(), Variator::villager());
        entries.insert("child".to_string(), Variator::child());
        entries.insert("skeleton".to_string(), Variator::skeleton());
        Self { entries }
    }

    /// Install or replace a named entry.
    pub fn insert(&mut self, name: impl Into<String>, variator: Variator) {
        self.entries.insert(name.into(), variator);
    }

    /// Production lookup: unknown names fall back to the default gait
    /// with a warning.
    pub fn get(&self, name: &str) -> &Variator {
        match self.entries.get(name) {
            Some(v) => v,
            None => {
                warn!("unknown variator '{name}', using default");
                self.entries
                    .get("default")
                    .expect("catalog always seeds 'default'")
            }
        }
    }

    /// Strict lookup for init validation and tests.
    pub fn get_strict(&self, name: &str) -> Result<&Variator, AcousticError> {
        self.entries
            .get(name)
            .ok_or_else(|| AcousticError::UnknownVariator(name.to_string()))
    }
}

impl Default for VariatorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_their_distinguishing_fields() {
        assert!(!Variator::default_gait().play_jump);
        assert!(Variator::player().play_jump);
        assert!(Variator::player_quad().quadruped);
        assert!((Variator::child().stride - 0.625).abs() < 1e-6);
        assert!((Variator::skeleton().volume_scale - 0.25).abs() < 1e-6);
    }

    #[test]
    fn stair_stride_is_two_thirds_ish_of_stride() {
        let v = Variator::default_gait();
        assert!((v.stride_stair - v.stride * 0.65).abs() < 1e-6);
    }

    #[test]
    fn catalog_falls_back_to_default() {
        let catalog = VariatorCatalog::new();
        assert_eq!(*catalog.get("no_such_gait"), Variator::default_gait());
    }

    #[test]
    fn strict_lookup_rejects_unknown_names() {
        let catalog = VariatorCatalog::new();
        assert!(catalog.get_strict("player").is_ok());
        assert_eq!(
            catalog.get_strict("no_such_gait").unwrap_err(),
            AcousticError::UnknownVariator("no_such_gait".into())
        );
    }

    #[test]
    fn config_overrides_replace_presets() {
        let mut catalog = VariatorCatalog::new();
        let cfg = VariatorConfig {
            stride: 2.0,
            ..VariatorConfig::default()
        };
        catalog.insert("default", Variator::from(&cfg));
        assert!((catalog.get("default").stride - 2.0).abs() < 1e-6);
    }
}
