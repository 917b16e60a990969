//! Substrate selection during step events: carpet overrides the ground
//! block, non-emitting plants pick the messy variant, and foliage
//! overlaps add a rustle on top of the ground acoustics.

use footfall_engine::{EngineConfig, FootstepEngine, StepInputs};
use footfall_testkit::{
    init_test_logging, MockEntity, MockWorld, RecordingAudio, RecordingParticles, TraceBuilder,
};

const SEED: u64 = 0x5B5;

fn engine(world: &MockWorld) -> FootstepEngine {
    let mut cfg = EngineConfig::default();
    cfg.footsteps
        .insert("minecraft:grass_block".into(), "grass".into());
    cfg.footsteps
        .insert("carpet+minecraft:white_carpet".into(), "brush".into());
    cfg.footsteps
        .insert("foliage+minecraft:short_grass".into(), "foliage.brushy".into());
    cfg.footsteps
        .insert("messy+minecraft:grass_block".into(), "brush".into());
    FootstepEngine::bootstrap(world, cfg, SEED)
}

fn run(
    engine: &mut FootstepEngine,
    world: &MockWorld,
    entity: &MockEntity,
    inputs: &[StepInputs],
) -> RecordingAudio {
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();
    for step in inputs {
        engine.tick_entity(world, &mut audio, &mut particles, entity, step);
    }
    audio
}

#[test]
fn plain_ground_plays_the_default_substrate() {
    init_test_logging();
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let entity = MockEntity::new(1, "villager");

    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(1.3, 0.05)
        .build();
    let audio = run(&mut eng, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 1);
    assert_eq!(audio.count_with_prefix("footfall:rustle"), 0);
}

#[test]
fn foliage_overlap_adds_a_rustle_and_messy_replaces_the_ground() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let entity = MockEntity::new(2, "villager");

    // Feet inside short grass: a soundless plant, so the ground flips to
    // its messy variant and the foliage chain plays on top.
    let trace = TraceBuilder::new(world.state("grass_block"))
        .inside(world.state("short_grass"))
        .walk(1.3, 0.05)
        .build();
    let audio = run(&mut eng, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.brush"), 1);
    assert_eq!(audio.count_with_prefix("footfall:rustle.brushy"), 1);
    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 0);
}

#[test]
fn carpet_at_foot_level_overrides_the_ground_block() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let entity = MockEntity::new(3, "villager");

    let trace = TraceBuilder::new(world.state("grass_block"))
        .inside(world.state("white_carpet"))
        .walk(1.3, 0.05)
        .build();
    let audio = run(&mut eng, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.brush"), 1);
    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 0);
}

#[test]
fn flowers_silence_the_step_but_not_the_ground() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let entity = MockEntity::new(4, "villager");

    // A flower at foot level is a non-emitter with no messy variant on
    // file here, so the ground acoustics still play.
    let trace = TraceBuilder::new(world.state("stone"))
        .inside(world.state("poppy"))
        .walk(1.3, 0.05)
        .build();
    let audio = run(&mut eng, &world, &entity, &trace);

    // stone has no configured class here, so its primitive step plays.
    assert_eq!(audio.count_with_prefix("minecraft:block.stone.step"), 1);
}
