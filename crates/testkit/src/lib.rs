#![warn(missing_docs)]
//! Deterministic testing surfaces for the footstep engine: mock host
//! implementations, recording sinks, and motion-trace plumbing.

mod sinks;
mod trace;
mod world;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub use sinks::{MockEntity, PlayedSound, RecordingAudio, RecordingParticles, StampedFootprint};
pub use trace::TraceBuilder;
pub use world::MockWorld;

/// Install a test-friendly tracing subscriber (honours `RUST_LOG`).
///
/// Safe to call from every test; only the first call wins.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A serializable view of one dispatched sound, for event logs.
#[derive(Debug, Serialize)]
pub struct SoundEventRecord {
    /// Play-order sequence number.
    pub seq: usize,
    /// Sound event name.
    pub name: String,
    /// Dispatched volume.
    pub volume: f32,
    /// Dispatched pitch.
    pub pitch: f32,
    /// Position as `[x, y, z]`.
    pub position: [f32; 3],
}

impl From<&PlayedSound> for SoundEventRecord {
    fn from(play: &PlayedSound) -> Self {
        Self {
            seq: play.seq,
            name: play.descriptor.name.clone(),
            volume: play.descriptor.volume,
            pitch: play.descriptor.pitch,
            position: play.descriptor.position.to_array(),
        }
    }
}

/// Serialize a play log to one JSON line per sound.
pub fn sound_log_lines(played: &[PlayedSound]) -> Result<Vec<String>> {
    played
        .iter()
        .map(|p| Ok(serde_json::to_string(&SoundEventRecord::from(p))?))
        .collect()
}

/// A stable fingerprint of a play log, for replay comparisons.
pub fn sound_log_fingerprint(played: &[PlayedSound]) -> Result<u64> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    for line in sound_log_lines(played)? {
        line.hash(&mut hasher);
    }
    Ok(hasher.finish())
}

/// Write a play log as newline-delimited JSON (CI artifacts).
pub fn write_sound_log<P: AsRef<Path>>(path: P, played: &[PlayedSound]) -> Result<()> {
    let mut file = File::create(path)?;
    for line in sound_log_lines(played)? {
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use footfall_engine::host::AudioSink;
    use footfall_engine::{Attenuation, SoundDescriptor};
    use glam::Vec3;

    fn sample_audio() -> RecordingAudio {
        let mut audio = RecordingAudio::new();
        audio.play(&SoundDescriptor {
            name: "footfall:step.grass".into(),
            position: Vec3::new(1.0, 64.0, 2.0),
            volume: 0.7,
            pitch: 1.0,
            attenuation: Attenuation::Linear,
        });
        audio
    }

    #[test]
    fn log_lines_are_one_per_sound() {
        let audio = sample_audio();
        let lines = sound_log_lines(&audio.played).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("footfall:step.grass"));
    }

    #[test]
    fn identical_logs_fingerprint_identically() {
        let a = sample_audio();
        let b = sample_audio();
        assert_eq!(
            sound_log_fingerprint(&a.played).unwrap(),
            sound_log_fingerprint(&b.played).unwrap()
        );
        assert_ne!(
            sound_log_fingerprint(&a.played).unwrap(),
            sound_log_fingerprint(&[]).unwrap()
        );
    }
}
