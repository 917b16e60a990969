//! Recording audio and particle sinks, plus a scriptable entity view.

use footfall_core::EntityId;
use footfall_engine::host::{AudioSink, EntityView, ParticleSink, SoundHandle};
use footfall_engine::SoundDescriptor;
use glam::Vec3;
use std::collections::HashMap;

/// One sound the engine asked the host to play.
#[derive(Debug, Clone)]
pub struct PlayedSound {
    /// Monotonic sequence number in play order.
    pub seq: usize,
    /// The descriptor as dispatched.
    pub descriptor: SoundDescriptor,
}

/// An [`AudioSink`] that records every dispatch.
pub struct RecordingAudio {
    /// Every accepted play, in order.
    pub played: Vec<PlayedSound>,
    /// When true, every play is rejected (returns no handle).
    pub reject_all: bool,
    volumes: HashMap<SoundHandle, f32>,
    stopped: Vec<SoundHandle>,
    stop_all_calls: usize,
    next_handle: u64,
    max_count: usize,
}

impl RecordingAudio {
    /// A sink that accepts everything.
    pub fn new() -> Self {
        Self {
            played: Vec::new(),
            reject_all: false,
            volumes: HashMap::new(),
            stopped: Vec::new(),
            stop_all_calls: 0,
            next_handle: 1,
            max_count: 28,
        }
    }

    /// Names of every accepted play, in order.
    pub fn names(&self) -> Vec<String> {
        self.played
            .iter()
            .map(|p| p.descriptor.name.clone())
            .collect()
    }

    /// Number of accepted plays whose name starts with `prefix`.
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.played
            .iter()
            .filter(|p| p.descriptor.name.starts_with(prefix))
            .count()
    }

    /// Times `stop_all` was called.
    pub fn stop_all_calls(&self) -> usize {
        self.stop_all_calls
    }

    /// Handles stopped individually.
    pub fn stopped(&self) -> &[SoundHandle] {
        &self.stopped
    }

    /// Last volume set for a handle.
    pub fn volume_of(&self, handle: SoundHandle) -> Option<f32> {
        self.volumes.get(&handle).copied()
    }

    /// Forget recorded plays (keeps handles and settings).
    pub fn clear_log(&mut self) {
        self.played.clear();
    }
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: &SoundDescriptor) -> Option<SoundHandle> {
        if self.reject_all {
            return None;
        }
        let seq = self.played.len();
        self.played.push(PlayedSound {
            seq,
            descriptor: sound.clone(),
        });
        let handle = SoundHandle(self.next_handle);
        self.next_handle += 1;
        self.volumes.insert(handle, sound.volume);
        Some(handle)
    }

    fn stop(&mut self, handle: SoundHandle) {
        self.stopped.push(handle);
        self.volumes.remove(&handle);
    }

    fn stop_all(&mut self) {
        self.stop_all_calls += 1;
        self.volumes.clear();
    }

    fn set_volume(&mut self, handle: SoundHandle, volume: f32) {
        self.volumes.insert(handle, volume);
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.volumes.contains_key(&handle)
    }

    fn current_count(&self) -> usize {
        self.volumes.len()
    }

    fn max_count(&self) -> usize {
        self.max_count
    }
}

/// One recorded footprint stamp.
#[derive(Debug, Clone)]
pub struct StampedFootprint {
    /// Decal position.
    pub pos: Vec3,
    /// Orientation yaw.
    pub yaw: f32,
    /// Decal scale.
    pub scale: f32,
    /// Right-foot print.
    pub is_right: bool,
}

/// A [`ParticleSink`] that records footprints and particles.
#[derive(Default)]
pub struct RecordingParticles {
    /// Every footprint, in order.
    pub footprints: Vec<StampedFootprint>,
    /// Every particle as `(kind, position)`.
    pub particles: Vec<(String, Vec3)>,
}

impl RecordingParticles {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParticleSink for RecordingParticles {
    fn emit_footprint(&mut self, pos: Vec3, yaw: f32, scale: f32, is_right: bool) {
        self.footprints.push(StampedFootprint {
            pos,
            yaw,
            scale,
            is_right,
        });
    }

    fn emit_particle(&mut self, kind: &str, pos: Vec3, _vel: Vec3) {
        self.particles.push((kind.to_string(), pos));
    }
}

/// A scriptable [`EntityView`].
#[derive(Debug, Clone)]
pub struct MockEntity {
    /// Persistent id.
    pub id: EntityId,
    /// Current position.
    pub position: Vec3,
    /// Alive flag.
    pub alive: bool,
    /// Child flag.
    pub child: bool,
    /// Player flag.
    pub player: bool,
    /// Variator hint (entity class name).
    pub hint: String,
}

impl MockEntity {
    /// A living adult non-player at the origin.
    pub fn new(id: u64, hint: &str) -> Self {
        Self {
            id: EntityId(id),
            position: Vec3::ZERO,
            alive: true,
            child: false,
            player: false,
            hint: hint.to_string(),
        }
    }

    /// The local player.
    pub fn player(id: u64) -> Self {
        Self {
            player: true,
            ..Self::new(id, "player")
        }
    }
}

impl EntityView for MockEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_child(&self) -> bool {
        self.child
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn variator_hint(&self) -> &str {
        &self.hint
    }
}
