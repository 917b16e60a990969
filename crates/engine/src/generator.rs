//! The per-entity step state machine.
//!
//! Fed one [`StepInputs`] record per host tick, a generator accumulates
//! horizontal travel and fires step events whenever the accumulated
//! distance crosses the variator's stride threshold for the current
//! terrain. Liquid, jump, and landing transitions bypass the stride logic
//! and fire their own events.

use crate::acoustics::{AcousticArray, EventTag, PlayContext, QueuedPlay};
use crate::block_map::SUBSTRATE_DEFAULT;
use crate::footprint::Footprint;
use crate::footsteps::FootstepRegistry;
use crate::host::{AudioSink, ParticleSink, WorldQuery};
use crate::scheduler::SoundScheduler;
use crate::state::{BlockState, Material};
use crate::variator::Variator;
use footfall_core::SimTick;
use glam::Vec3;
use rand::rngs::SmallRng;

/// Distances below this are treated as standing still.
const MOTION_EPS: f32 = 1e-4;
/// Tolerance when comparing accumulated distance to stride thresholds,
/// so summing many small per-tick deltas cannot miss an exact crossing.
const STRIDE_EPS: f32 = 1e-4;
/// Ticks between swim strokes while in liquid.
const SWIM_PACE_TICKS: u64 = 8;
/// Hard landings double the event volume.
const LAND_HARD_VOLUME: f32 = 2.0;

/// Per-tick observation of one entity, supplied by the host.
#[derive(Debug, Clone)]
pub struct StepInputs {
    /// Current host tick.
    pub tick: SimTick,
    /// Feet position.
    pub position: Vec3,
    /// Velocity in blocks per tick.
    pub velocity: Vec3,
    /// Facing yaw in radians.
    pub yaw: f32,
    /// Whether the entity is standing on ground.
    pub on_ground: bool,
    /// Whether the feet are inside liquid.
    pub in_liquid: bool,
    /// Whether the supporting block is a stair.
    pub on_stair: bool,
    /// Whether the entity is holding a ladder.
    pub on_ladder: bool,
    /// Accumulated fall distance, reset by the host on landing.
    pub fall_distance: f32,
    /// Block state directly below the feet.
    pub state_below: BlockState,
    /// Block state the feet overlap.
    pub state_inside: BlockState,
}

/// Everything a generator needs from the engine for one tick.
pub struct StepContext<'a> {
    /// World and block-registry queries.
    pub world: &'a dyn WorldQuery,
    /// Acoustic resolution.
    pub registry: &'a mut FootstepRegistry,
    /// Sound dispatch.
    pub scheduler: &'a mut SoundScheduler,
    /// Host audio mixer.
    pub audio: &'a mut dyn AudioSink,
    /// Host particle layer.
    pub particles: &'a mut dyn ParticleSink,
    /// Ambient rain intensity in `[0, 1]`.
    pub rain_intensity: f32,
}

/// Coarse motion state of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Standing still past the immobile threshold.
    Immobile,
    /// Moving very slowly.
    Wander,
    /// Walking.
    Walk,
    /// Running.
    Run,
    /// Off the ground.
    Air,
}

impl StepState {
    fn event(self) -> EventTag {
        match self {
            StepState::Run => EventTag::Run,
            StepState::Walk | StepState::Immobile | StepState::Air => EventTag::Walk,
            StepState::Wander => EventTag::Wander,
        }
    }
}

/// Distance-driven beat tracker.
///
/// Beat offsets are fractions of a stride period, anchored so the last
/// beat of a cycle lands exactly on the period boundary; a biped is the
/// degenerate single-beat case. The quadruped run gait is a three-beat
/// gallop (two close steps, long pause) whose in-cycle spacing follows
/// the 0 / 0.25 / 0.55 stride offsets.
#[derive(Debug, Clone)]
struct GaitTracker {
    acc: f32,
    next_beat: usize,
    running: bool,
    quadruped: bool,
}

const BIPED_BEATS: &[f32] = &[1.0];
const QUAD_WALK_BEATS: &[f32] = &[0.5, 1.0];
const QUAD_RUN_BEATS: &[f32] = &[0.45, 0.70, 1.0];

impl GaitTracker {
    fn new(quadruped: bool) -> Self {
        Self {
            acc: 0.0,
            next_beat: 0,
            running: false,
            quadruped,
        }
    }

    fn beats(&self) -> &'static [f32] {
        if !self.quadruped {
            BIPED_BEATS
        } else if self.running {
            QUAD_RUN_BEATS
        } else {
            QUAD_WALK_BEATS
        }
    }

    fn set_running(&mut self, running: bool) {
        if self.quadruped && running != self.running {
            self.running = running;
            self.acc = 0.0;
            self.next_beat = 0;
        }
    }

    fn reset(&mut self) {
        self.acc = 0.0;
        self.next_beat = 0;
    }

    /// Advance by `distance`, invoking `fire` once per crossed beat.
    fn advance(&mut self, distance: f32, period: f32, mut fire: impl FnMut()) {
        if period <= 0.0 {
            return;
        }
        self.acc += distance;
        loop {
            let beats = self.beats();
            let target = beats[self.next_beat] * period;
            if self.acc + STRIDE_EPS < target {
                return;
            }
            fire();
            self.next_beat += 1;
            if self.next_beat == beats.len() {
                self.acc -= period;
                self.next_beat = 0;
            }
        }
    }
}

/// The per-entity footstep generator.
pub struct Generator {
    variator: Variator,
    rng: SmallRng,
    state: StepState,
    gait: GaitTracker,
    immobile_ticks: u32,
    last_position: Option<Vec3>,
    was_on_ground: bool,
    was_in_liquid: bool,
    next_swim_tick: SimTick,
    right_foot: bool,
    last_ground_state: Option<BlockState>,
}

impl Generator {
    /// Build a generator for the given gait. Quadruped variators get the
    /// multi-beat tracker automatically.
    pub fn new(variator: Variator, rng: SmallRng) -> Self {
        let quadruped = variator.quadruped;
        Self {
            variator,
            rng,
            state: StepState::Immobile,
            gait: GaitTracker::new(quadruped),
            immobile_ticks: 0,
            last_position: None,
            was_on_ground: true,
            was_in_liquid: false,
            next_swim_tick: SimTick::ZERO,
            right_foot: false,
            last_ground_state: None,
        }
    }

    /// The variator driving this generator.
    pub fn variator(&self) -> &Variator {
        &self.variator
    }

    /// Current motion state.
    pub fn state(&self) -> StepState {
        self.state
    }

    /// Process one tick of entity motion.
    pub fn tick(&mut self, inputs: &StepInputs, ctx: &mut StepContext<'_>) {
        let delta = match self.last_position {
            Some(last) => inputs.position - last,
            None => Vec3::ZERO,
        };
        self.last_position = Some(inputs.position);
        let horizontal = Vec3::new(delta.x, 0.0, delta.z).length();

        if inputs.on_ground {
            self.last_ground_state = Some(inputs.state_below.clone());
        }

        if inputs.in_liquid {
            self.tick_in_liquid(inputs, ctx, horizontal, delta);
            self.was_on_ground = inputs.on_ground;
            return;
        }
        if self.was_in_liquid {
            self.was_in_liquid = false;
            self.gait.reset();
            // Emerging from liquid is not a landing.
            self.was_on_ground = inputs.on_ground;
        }

        if !inputs.on_ground {
            if self.was_on_ground && delta.y > 0.0 {
                self.on_takeoff(inputs, ctx, horizontal);
            }
            self.state = StepState::Air;
            self.was_on_ground = false;
            self.immobile_ticks = 0;
            return;
        }

        if !self.was_on_ground {
            self.on_landing(inputs, ctx, horizontal);
            self.was_on_ground = true;
            return;
        }

        // Ladder motion is vertical; everywhere else only the ground-plane
        // component counts.
        let motion = if inputs.on_ladder {
            horizontal.max(delta.y.abs())
        } else {
            horizontal
        };

        // Immobile tracking: below the motion epsilon nothing accumulates,
        // and a long stand-still clears any partial stride.
        if motion < MOTION_EPS {
            self.immobile_ticks = self.immobile_ticks.saturating_add(1);
            if self.immobile_ticks >= self.variator.immobile_duration
                && self.state != StepState::Immobile
            {
                self.state = StepState::Immobile;
                self.gait.reset();
            }
            return;
        }
        self.immobile_ticks = 0;

        self.state = if motion >= self.variator.speed_to_run {
            StepState::Run
        } else if motion >= self.variator.speed_to_jump_as_multifoot {
            StepState::Walk
        } else if self.variator.play_wander {
            StepState::Wander
        } else {
            StepState::Walk
        };
        self.gait.set_running(self.state == StepState::Run);

        let (threshold, travelled) = if inputs.on_ladder {
            (self.variator.stride_ladder, delta.y.abs())
        } else if inputs.on_stair {
            (self.variator.stride_stair, horizontal)
        } else {
            (self.variator.stride, horizontal)
        };

        let event = if inputs.on_ladder {
            if self.state == StepState::Run {
                EventTag::ClimbRun
            } else {
                EventTag::Climb
            }
        } else {
            self.state.event()
        };

        // The gait callback cannot borrow self mutably while the tracker
        // is advancing, so crossings are counted first and fired after.
        let mut crossings = 0usize;
        self.gait.advance(travelled, threshold, || crossings += 1);
        for _ in 0..crossings {
            let foot = self.next_foot();
            self.emit_step(inputs, ctx, &inputs.state_below, event, 1.0, foot);
        }
    }

    fn tick_in_liquid(
        &mut self,
        inputs: &StepInputs,
        ctx: &mut StepContext<'_>,
        horizontal: f32,
        delta: Vec3,
    ) {
        if !self.was_in_liquid {
            self.was_in_liquid = true;
            // Full immersion always splashes: the gate signal is forced
            // high, unlike ambient rain splashes.
            let boost = if inputs.fall_distance >= self.variator.land_hard_distance_min {
                LAND_HARD_VOLUME
            } else {
                1.0
            };
            let splash = ctx.registry.splash().clone();
            self.play_array(
                ctx,
                &splash,
                PlayContext {
                    position: inputs.position,
                    volume_scale: self.variator.volume_scale * boost,
                    rain_intensity: 1.0,
                    event: EventTag::Splash,
                },
            );
            self.next_swim_tick = inputs.tick.advance(SWIM_PACE_TICKS);
            self.gait.reset();
            self.state = StepState::Wander;
            return;
        }

        let moving = horizontal >= MOTION_EPS || delta.y.abs() >= MOTION_EPS;
        if moving && inputs.tick >= self.next_swim_tick {
            let swim = ctx.registry.swim().clone();
            self.play_array(
                ctx,
                &swim,
                PlayContext {
                    position: inputs.position,
                    volume_scale: self.variator.volume_scale,
                    rain_intensity: ctx.rain_intensity,
                    event: EventTag::Swim,
                },
            );
            self.next_swim_tick = inputs.tick.advance(SWIM_PACE_TICKS);
        }
    }

    fn on_takeoff(&mut self, inputs: &StepInputs, ctx: &mut StepContext<'_>, horizontal: f32) {
        if self.variator.play_jump {
            let jump = ctx.registry.jump().clone();
            self.play_array(
                ctx,
                &jump,
                PlayContext {
                    position: inputs.position,
                    volume_scale: self.variator.volume_scale,
                    rain_intensity: ctx.rain_intensity,
                    event: EventTag::Jump,
                },
            );
        }
        if self.variator.event_on_jump {
            let multifoot = horizontal < self.variator.speed_to_jump_as_multifoot;
            let takeoff = self
                .last_ground_state
                .clone()
                .unwrap_or_else(|| inputs.state_below.clone());
            let event = self.state.event();
            if multifoot {
                self.emit_step(inputs, ctx, &takeoff, event, 1.0, Foot::Left);
                self.emit_step(inputs, ctx, &takeoff, event, 1.0, Foot::Right);
            } else {
                let foot = self.next_foot();
                self.emit_step(inputs, ctx, &takeoff, event, 1.0, foot);
            }
        }
    }

    fn on_landing(&mut self, inputs: &StepInputs, ctx: &mut StepContext<'_>, horizontal: f32) {
        let hard = inputs.fall_distance >= self.variator.land_hard_distance_min;
        let multifoot = hard || horizontal < self.variator.speed_to_jump_as_multifoot;
        let volume = if hard { LAND_HARD_VOLUME } else { 1.0 };
        let below = inputs.state_below.clone();
        if multifoot {
            self.emit_step(inputs, ctx, &below, EventTag::Land, volume, Foot::Left);
            self.emit_step(inputs, ctx, &below, EventTag::Land, volume, Foot::Right);
        } else {
            let foot = self.next_foot();
            self.emit_step(inputs, ctx, &below, EventTag::Land, volume, foot);
        }
        self.gait.reset();
        self.immobile_ticks = 0;
        self.state = StepState::Walk;
    }

    fn next_foot(&mut self) -> Foot {
        self.right_foot = !self.right_foot;
        if self.right_foot {
            Foot::Right
        } else {
            Foot::Left
        }
    }

    /// Resolve the terrain under one foot and play it.
    fn emit_step(
        &mut self,
        inputs: &StepInputs,
        ctx: &mut StepContext<'_>,
        ground: &BlockState,
        event: EventTag,
        volume_mult: f32,
        foot: Foot,
    ) {
        let position = foot.offset(inputs.position, inputs.yaw, self.variator.distance_to_center);
        let play_ctx = PlayContext {
            position,
            volume_scale: self.variator.volume_scale * volume_mult,
            rain_intensity: ctx.rain_intensity,
            event,
        };

        let (association, overlay) = self.associate(inputs, ctx, ground);
        self.play_array(ctx, &association, play_ctx);
        if let Some(extra) = overlay {
            self.play_array(ctx, &extra, play_ctx);
        }

        if self.variator.has_footprint && ctx.registry.has_footprint(ctx.world, ground) {
            Footprint::for_step(
                inputs.position,
                inputs.yaw,
                self.variator.distance_to_center,
                self.variator.footprint_scale,
                foot == Foot::Right,
            )
            .emit(ctx.particles);
        }
    }

    /// Pick the acoustic array for a step: carpet overrides the ground,
    /// a non-emitting plant at foot level selects the messy variant, and
    /// foliage overlaps add a rustle on top.
    fn associate(
        &mut self,
        inputs: &StepInputs,
        ctx: &mut StepContext<'_>,
        ground: &BlockState,
    ) -> (AcousticArray, Option<AcousticArray>) {
        let inside = &inputs.state_inside;

        if let Some(carpet) = ctx.registry.lookup_substrate(inside, "carpet") {
            if !carpet.is_not_emitter() {
                return (carpet, None);
            }
        }

        let inside_material = ctx.world.material_of(inside);
        let mut association = None;
        if inside_material == Material::Plants
            && ctx.registry.resolve(ctx.world, inside).is_not_emitter()
        {
            association = ctx.registry.lookup_substrate(ground, "messy");
        }
        let association = match association {
            Some(messy) => messy,
            None => match ctx.registry.lookup_substrate(ground, SUBSTRATE_DEFAULT) {
                Some(found) => found,
                None => ctx.registry.resolve(ctx.world, ground),
            },
        };

        let overlay = if inside_material == Material::Plants || inside_material == Material::Leaves
        {
            ctx.registry.lookup_substrate(inside, "foliage")
        } else {
            None
        };

        (association, overlay)
    }

    fn play_array(&mut self, ctx: &mut StepContext<'_>, array: &AcousticArray, play: PlayContext) {
        let mut queued: Vec<QueuedPlay> = Vec::new();
        array.play(&play, &mut self.rng, &mut queued);
        for q in queued {
            ctx.scheduler.play_at(ctx.audio, q.descriptor, q.delay);
        }
    }
}

/// Which foot a step event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Foot {
    Left,
    Right,
}

impl Foot {
    /// Offset a centre position laterally by the foot spacing.
    fn offset(self, center: Vec3, yaw: f32, distance: f32) -> Vec3 {
        // Perpendicular to the facing direction, in the ground plane.
        let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        match self {
            Foot::Left => center - right * distance,
            Foot::Right => center + right * distance,
        }
    }
}
