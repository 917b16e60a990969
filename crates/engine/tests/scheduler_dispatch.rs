//! Engine-level scheduler scenarios: delayed dispatch windows, ambient
//! emitter diffing, and teardown idempotence.

use footfall_engine::{
    Attenuation, EngineConfig, FootstepEngine, SoundDescriptor,
};
use footfall_core::SimTick;
use footfall_testkit::{init_test_logging, MockWorld, RecordingAudio, RecordingParticles};
use glam::Vec3;
use std::collections::BTreeMap;

const SEED: u64 = 0xD15;

fn engine(world: &MockWorld) -> FootstepEngine {
    FootstepEngine::bootstrap(world, EngineConfig::default(), SEED)
}

fn descriptor(name: &str) -> SoundDescriptor {
    SoundDescriptor {
        name: name.into(),
        position: Vec3::new(4.0, 64.0, 4.0),
        volume: 0.6,
        pitch: 1.0,
        attenuation: Attenuation::Linear,
    }
}

fn advance(
    engine: &mut FootstepEngine,
    world: &MockWorld,
    audio: &mut RecordingAudio,
    particles: &mut RecordingParticles,
    ticks: std::ops::RangeInclusive<u64>,
) {
    for t in ticks {
        engine.tick_player(SimTick(t), world, audio, particles, Vec3::ZERO, &[]);
    }
}

#[test]
fn delayed_play_dispatches_inside_its_window() {
    init_test_logging();
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    advance(&mut eng, &world, &mut audio, &mut particles, 996..=1000);
    eng.play_at(&mut audio, descriptor("chime"), 5);
    assert!(audio.played.is_empty(), "not played before its mark");

    advance(&mut eng, &world, &mut audio, &mut particles, 1001..=1020);
    assert_eq!(audio.played.len(), 1);
    // The mark is 1005; the first scheduler pass at or after it is 1008,
    // comfortably inside the inclusive 1005..=1015 window.
    assert_eq!(audio.played[0].descriptor.name, "chime");
    assert_eq!(eng.scheduler().pending_count(), 0);
}

#[test]
fn rejected_delayed_play_expires_without_dispatch() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    advance(&mut eng, &world, &mut audio, &mut particles, 996..=1000);
    audio.reject_all = true;
    eng.play_at(&mut audio, descriptor("chime"), 5);

    advance(&mut eng, &world, &mut audio, &mut particles, 1001..=1020);
    assert_eq!(eng.scheduler().pending_count(), 0, "stale entry dropped");
    audio.reject_all = false;
    advance(&mut eng, &world, &mut audio, &mut particles, 1021..=1040);
    assert!(audio.played.is_empty(), "no dispatch after expiry");
}

#[test]
fn ambient_diff_updates_targets_and_fades_strays() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    let mut first = BTreeMap::new();
    first.insert("ambient.wind".to_string(), 0.5);
    first.insert("ambient.rain".to_string(), 0.8);
    eng.queue_ambient(&first);
    advance(&mut eng, &world, &mut audio, &mut particles, 1..=4);

    let mut second = BTreeMap::new();
    second.insert("ambient.rain".to_string(), 0.3);
    second.insert("ambient.cave".to_string(), 0.6);
    eng.queue_ambient(&second);

    assert_eq!(eng.scheduler().emitter_target("ambient.rain"), Some(0.3));
    assert_eq!(eng.scheduler().emitter_target("ambient.cave"), Some(0.6));
    assert_eq!(eng.scheduler().emitter_target("ambient.wind"), None);
    assert_eq!(eng.scheduler().fading_count(), 1, "wind is fading out");

    // The stray emitter drains to silence within a few passes.
    advance(&mut eng, &world, &mut audio, &mut particles, 5..=20);
    assert_eq!(eng.scheduler().fading_count(), 0);
}

#[test]
fn empty_ambient_request_drains_every_emitter() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    let mut sounds = BTreeMap::new();
    sounds.insert("ambient.wind".to_string(), 0.5);
    sounds.insert("ambient.night".to_string(), 1.0);
    eng.queue_ambient(&sounds);
    advance(&mut eng, &world, &mut audio, &mut particles, 1..=8);

    eng.queue_ambient(&BTreeMap::new());
    assert_eq!(eng.scheduler().emitter_count(), 0, "map empties immediately");

    advance(&mut eng, &world, &mut audio, &mut particles, 9..=32);
    assert_eq!(eng.scheduler().fading_count(), 0, "fades complete and drop");
}

#[test]
fn clear_all_is_idempotent_and_stops_the_host() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    let mut sounds = BTreeMap::new();
    sounds.insert("ambient.wind".to_string(), 0.5);
    eng.queue_ambient(&sounds);
    advance(&mut eng, &world, &mut audio, &mut particles, 1..=8);
    eng.play_at(&mut audio, descriptor("chime"), 20);

    eng.clear_all(&mut audio);
    let mut first = Vec::new();
    eng.gather(&audio, &mut first);

    eng.clear_all(&mut audio);
    let mut second = Vec::new();
    eng.gather(&audio, &mut second);

    assert_eq!(first, second, "observable state identical after repeat");
    assert_eq!(eng.scheduler().emitter_count(), 0);
    assert_eq!(eng.scheduler().pending_count(), 0);
    assert_eq!(audio.stop_all_calls(), 2);
}

#[test]
fn gather_reports_the_sound_system_line() {
    let world = MockWorld::standard();
    let mut eng = engine(&world);
    let mut audio = RecordingAudio::new();
    let mut particles = RecordingParticles::new();

    let mut sounds = BTreeMap::new();
    sounds.insert("ambient.wind".to_string(), 0.5);
    eng.queue_ambient(&sounds);
    advance(&mut eng, &world, &mut audio, &mut particles, 1..=4);

    let mut output = Vec::new();
    eng.gather(&audio, &mut output);
    assert!(output[0].starts_with("SoundSystem: "));
    assert!(output.iter().any(|l| l.starts_with("EMITTER: ambient.wind")));
}
