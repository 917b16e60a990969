//! Stride cadence scenarios: walking, stairs, ladders, jumps, landings,
//! and footprints, driven through the full engine facade.

use footfall_engine::{EngineConfig, FootstepEngine, StepInputs};
use footfall_testkit::{
    init_test_logging, MockEntity, MockWorld, RecordingAudio, RecordingParticles, TraceBuilder,
};

const SEED: u64 = 0xF00;

fn configured_engine(world: &MockWorld) -> FootstepEngine {
    let mut cfg = EngineConfig::default();
    cfg.footsteps
        .insert("minecraft:grass_block".into(), "grass".into());
    cfg.footsteps.insert("minecraft:stone".into(), "stone".into());
    FootstepEngine::bootstrap(world, cfg, SEED)
}

fn run(
    engine: &mut FootstepEngine,
    world: &MockWorld,
    entity: &MockEntity,
    inputs: &[StepInputs],
) -> (RecordingAudio, RecordingParticles) {
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();
    for step in inputs {
        engine.tick_entity(world, &mut audio, &mut particles, entity, step);
    }
    (audio, particles)
}

#[test]
fn walk_on_grass_fires_exactly_one_step() {
    init_test_logging();
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(1, "villager");

    // One full stride (1.25 blocks) in a straight line.
    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(1.25, 0.05)
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 1);
    assert_eq!(audio.played.len(), 1);
}

#[test]
fn configured_grass_resolves_to_the_compiled_class() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let grass = world.state("grass_block");
    let resolved = engine.registry_mut().resolve(&world, &grass);
    let compiled = engine
        .registry_mut()
        .acoustics_mut()
        .compile("grass")
        .unwrap();
    assert_eq!(resolved, compiled);
}

#[test]
fn stairs_scale_the_stride() {
    init_test_logging();
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(2, "villager");

    // 5.0 blocks at the stair stride 1.25 * 0.65 = 0.8125 => 6 events.
    let trace = TraceBuilder::new(world.state("oak_stairs"))
        .stairs(5.0, 0.03)
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.wood"), 6);
}

#[test]
fn ladders_use_vertical_distance() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(3, "villager");

    // 2.0 blocks of climb at ladder stride 0.5 => 4 events.
    let trace = TraceBuilder::new(world.state("stone"))
        .ladder(2.0, 0.1)
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.stone"), 4);
}

#[test]
fn wander_speed_plays_the_quiet_chain() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(4, "villager");

    // Below speed_to_jump_as_multifoot (0.005) the gait is a wander.
    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(1.3, 0.004)
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 1);
    assert!(audio.played[0].descriptor.volume < 0.5);
}

#[test]
fn long_standstill_clears_partial_stride() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(5, "villager");

    // 1.0 + 1.0 blocks would cross the stride if the accumulator
    // survived the 200-tick immobile window in between.
    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(1.0, 0.05)
        .stand(250)
        .walk(1.0, 0.05)
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 0);
}

#[test]
fn player_jump_plays_jump_and_takeoff_step() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let player = MockEntity::player(6);

    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(0.5, 0.05)
        .jump(3)
        .build();
    let (audio, _) = run(&mut engine, &world, &player, &trace);

    assert_eq!(audio.count_with_prefix("footfall:jump"), 1);
    // event_on_jump adds one normal step at the takeoff foot.
    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 1);
}

#[test]
fn hard_landing_is_multifoot_at_double_volume() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(7, "villager");

    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(0.2, 0.05)
        .fall(2.0)
        .land()
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    let landings: Vec<f32> = audio
        .played
        .iter()
        .filter(|p| p.descriptor.name.starts_with("footfall:step.grass"))
        .map(|p| p.descriptor.volume)
        .collect();
    assert_eq!(landings.len(), 2, "hard landings fire at both feet");
    for volume in landings {
        assert!(volume >= 1.7, "hard landing volume doubled, got {volume}");
    }
}

#[test]
fn soft_landing_stays_at_normal_volume() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(8, "villager");

    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(0.2, 0.05)
        .fall(0.5)
        .land()
        .build();
    let (audio, _) = run(&mut engine, &world, &entity, &trace);

    let landings: Vec<f32> = audio
        .played
        .iter()
        .filter(|p| p.descriptor.name.starts_with("footfall:step.grass"))
        .map(|p| p.descriptor.volume)
        .collect();
    assert!(!landings.is_empty());
    for volume in landings {
        assert!(volume <= 1.0, "soft landing stays quiet, got {volume}");
    }
}

#[test]
fn qualifying_terrain_leaves_footprints() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let entity = MockEntity::new(9, "villager");

    // Grass is in the footprint material set; stone is not.
    let on_grass = TraceBuilder::new(world.state("grass_block"))
        .walk(2.6, 0.05)
        .build();
    let (_, particles) = run(&mut engine, &world, &entity, &on_grass);
    assert_eq!(particles.footprints.len(), 2);
    assert!(particles.footprints[0].is_right != particles.footprints[1].is_right);

    let entity = MockEntity::new(10, "villager");
    let on_stone = TraceBuilder::new(world.state("stone")).walk(2.6, 0.05).build();
    let (_, particles) = run(&mut engine, &world, &entity, &on_stone);
    assert!(particles.footprints.is_empty());
}

#[test]
fn child_variator_halves_the_stride() {
    let world = MockWorld::standard();
    let mut engine = configured_engine(&world);
    let child = MockEntity {
        child: true,
        ..MockEntity::new(11, "villager")
    };

    // Child stride is 0.625, so 1.3 blocks crosses twice.
    let trace = TraceBuilder::new(world.state("grass_block"))
        .walk(1.3, 0.05)
        .build();
    let (audio, _) = run(&mut engine, &world, &child, &trace);

    assert_eq!(audio.count_with_prefix("footfall:step.grass"), 2);
    // Child volume scale is 0.25.
    for play in &audio.played {
        assert!(play.descriptor.volume <= 0.3);
    }
}
