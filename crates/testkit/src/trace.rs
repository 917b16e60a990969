//! Motion-trace builder: a readable way to script the per-tick inputs a
//! generator consumes.
//!
//! Traces always begin with one stationary sample so distance accumulation
//! starts from a known position.

use footfall_core::SimTick;
use footfall_engine::{BlockState, StepInputs};
use glam::Vec3;

/// Builds a deterministic sequence of [`StepInputs`].
pub struct TraceBuilder {
    tick: u64,
    position: Vec3,
    yaw: f32,
    below: BlockState,
    inside: BlockState,
    fall_distance: f32,
    inputs: Vec<StepInputs>,
}

impl TraceBuilder {
    /// Start a trace standing on `below` at the origin.
    pub fn new(below: BlockState) -> Self {
        Self {
            tick: 0,
            position: Vec3::new(0.0, 64.0, 0.0),
            yaw: 0.0,
            below,
            inside: BlockState::air(),
            fall_distance: 0.0,
            inputs: Vec::new(),
        }
    }

    /// Change the supporting block for subsequent samples.
    pub fn on_block(mut self, below: BlockState) -> Self {
        self.below = below;
        self
    }

    /// Change the block the feet overlap for subsequent samples.
    pub fn inside(mut self, inside: BlockState) -> Self {
        self.inside = inside;
        self
    }

    /// Stand still for `ticks`.
    pub fn stand(mut self, ticks: u32) -> Self {
        for _ in 0..ticks {
            self.sample(Vec3::ZERO, true, false, false, false);
        }
        self
    }

    /// Walk `distance` blocks along +x at `speed` blocks per tick.
    pub fn walk(mut self, distance: f32, speed: f32) -> Self {
        let ticks = (distance / speed).round() as u32;
        for _ in 0..ticks {
            self.sample(Vec3::new(speed, 0.0, 0.0), true, false, false, false);
        }
        self
    }

    /// Climb stairs covering `distance` horizontal blocks at `speed`.
    pub fn stairs(mut self, distance: f32, speed: f32) -> Self {
        let ticks = (distance / speed).round() as u32;
        for _ in 0..ticks {
            self.sample(Vec3::new(speed, speed * 0.6, 0.0), true, false, true, false);
        }
        self
    }

    /// Climb a ladder for `height` blocks at `speed` blocks per tick.
    pub fn ladder(mut self, height: f32, speed: f32) -> Self {
        let ticks = (height / speed).round() as u32;
        for _ in 0..ticks {
            self.sample(Vec3::new(0.0, speed, 0.0), true, false, false, true);
        }
        self
    }

    /// Leave the ground in a running jump (forward momentum kept).
    pub fn jump(mut self, ticks: u32) -> Self {
        for _ in 0..ticks {
            self.sample(Vec3::new(0.05, 0.25, 0.0), false, false, false, false);
        }
        self
    }

    /// Fall `height` blocks over a few airborne ticks (no landing).
    pub fn fall(mut self, height: f32) -> Self {
        let per_tick = 0.4;
        let ticks = (height / per_tick).ceil() as u32;
        for _ in 0..ticks {
            self.sample(Vec3::new(0.0, -per_tick, 0.0), false, false, false, false);
            self.fall_distance += per_tick;
        }
        // Exactness matters for hard-landing thresholds.
        self.fall_distance = height;
        self
    }

    /// Touch ground, reporting the accumulated fall distance.
    pub fn land(mut self) -> Self {
        self.sample(Vec3::ZERO, true, false, false, false);
        self.fall_distance = 0.0;
        self
    }

    /// Plunge into liquid, reporting the accumulated fall distance.
    pub fn enter_water(mut self, water: BlockState) -> Self {
        self.inside = water.clone();
        self.below = water;
        self.sample(Vec3::new(0.0, -0.1, 0.0), false, true, false, false);
        self.fall_distance = 0.0;
        self
    }

    /// Swim horizontally for `ticks`.
    pub fn swim(mut self, ticks: u32) -> Self {
        for _ in 0..ticks {
            self.sample(Vec3::new(0.05, 0.0, 0.0), false, true, false, false);
        }
        self
    }

    /// Float motionless in liquid for `ticks`.
    pub fn stand_in_water(mut self, ticks: u32) -> Self {
        for _ in 0..ticks {
            self.sample(Vec3::ZERO, false, true, false, false);
        }
        self
    }

    /// Finish the trace.
    pub fn build(self) -> Vec<StepInputs> {
        self.inputs
    }

    fn sample(&mut self, delta: Vec3, on_ground: bool, in_liquid: bool, stair: bool, ladder: bool) {
        if self.inputs.is_empty() {
            // Anchor sample: establishes the starting position.
            let anchor = StepInputs {
                tick: SimTick(self.tick),
                position: self.position,
                velocity: Vec3::ZERO,
                yaw: self.yaw,
                on_ground: true,
                in_liquid: false,
                on_stair: false,
                on_ladder: false,
                fall_distance: 0.0,
                state_below: self.below.clone(),
                state_inside: self.inside.clone(),
            };
            self.inputs.push(anchor);
            self.tick += 1;
        }
        self.position += delta;
        self.inputs.push(StepInputs {
            tick: SimTick(self.tick),
            position: self.position,
            velocity: delta,
            yaw: self.yaw,
            on_ground,
            in_liquid,
            on_stair: stair,
            on_ladder: ladder,
            fall_distance: self.fall_distance,
            state_below: self.below.clone(),
            state_inside: self.inside.clone(),
        });
        self.tick += 1;
    }
}
