//! Ground footprint descriptors.
//!
//! Footprints are pure outputs: the engine stamps them through the host
//! particle layer and never tracks their lifetime.

use crate::host::ParticleSink;
use glam::Vec3;

/// One footprint decal, positioned for a specific foot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Decal position.
    pub position: Vec3,
    /// Orientation, matching the entity's facing yaw (radians).
    pub yaw: f32,
    /// Decal scale.
    pub scale: f32,
    /// Right or left foot print.
    pub is_right: bool,
}

impl Footprint {
    /// Build the print for a step: offset forward along the facing
    /// direction by the foot spacing, alternating sides.
    pub fn for_step(center: Vec3, yaw: f32, distance_to_center: f32, scale: f32, is_right: bool) -> Self {
        let forward = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
        let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let side = if is_right { 1.0 } else { -1.0 };
        let position = center + forward * distance_to_center + right * (distance_to_center * side);
        Self {
            position,
            yaw,
            scale,
            is_right,
        }
    }

    /// Send the print to the host decal layer.
    pub fn emit(&self, particles: &mut dyn ParticleSink) {
        particles.emit_footprint(self.position, self.yaw, self.scale, self.is_right);
    }
}
