//! Sound dispatch: immediate plays, tick-delayed pending sounds, and
//! long-lived ambient emitters with volume ramping.
//!
//! The scheduler does real work every fourth tick. Pending sounds are
//! retried until the host accepts them or they exceed the stale
//! threshold; ambient emitters ramp their volume toward a target and are
//! released once they fade out.

use crate::acoustics::{Attenuation, SoundDescriptor};
use crate::host::{AudioSink, SoundHandle};
use footfall_core::SimTick;
use glam::Vec3;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Ticks between scheduler work passes.
pub const SCHEDULER_CADENCE: u64 = 4;
/// Pending sounds older than this past their mark are dropped.
const PENDING_AGE_LIMIT: i64 = 10;
/// Per-pass volume ramp for keyed emitters.
const EMITTER_RAMP: f32 = 0.05;
/// Per-pass volume ramp for emitters fading to silence.
const FADE_RATE: f32 = 0.25;
/// Sound name whose volume is replaced by the configured thunder volume.
const THUNDER_SOUND: &str = "entity.lightning.thunder";

/// A sound waiting for its dispatch tick.
#[derive(Debug, Clone)]
struct PendingSound {
    descriptor: SoundDescriptor,
    mark: SimTick,
}

/// A long-lived looping ambient sound with an adjustable target volume.
#[derive(Debug)]
struct Emitter {
    name: String,
    volume: f32,
    target: f32,
    handle: Option<SoundHandle>,
}

impl Emitter {
    fn new(name: String, target: f32) -> Self {
        Self {
            name,
            volume: 0.0,
            target,
            handle: None,
        }
    }

    fn update(&mut self, audio: &mut dyn AudioSink, rate: f32) {
        if self.volume < self.target {
            self.volume = (self.volume + rate).min(self.target);
        } else if self.volume > self.target {
            self.volume = (self.volume - rate).max(self.target);
        }

        match self.handle {
            Some(handle) => audio.set_volume(handle, self.volume),
            None => {
                if self.volume > 0.0 {
                    self.handle = audio.play(&SoundDescriptor {
                        name: self.name.clone(),
                        position: Vec3::ZERO,
                        volume: self.volume,
                        pitch: 1.0,
                        attenuation: Attenuation::None,
                    });
                }
            }
        }
    }

    fn stop(&mut self, audio: &mut dyn AudioSink) {
        if let Some(handle) = self.handle.take() {
            audio.stop(handle);
        }
    }
}

/// Queues immediate and tick-delayed sounds and manages ambient emitters.
pub struct SoundScheduler {
    emitters: BTreeMap<String, Emitter>,
    fading: Vec<Emitter>,
    pending: VecDeque<PendingSound>,
    now: SimTick,
    thunder_volume: f32,
}

impl SoundScheduler {
    /// A fresh scheduler.
    pub fn new(thunder_volume: f32) -> Self {
        Self {
            emitters: BTreeMap::new(),
            fading: Vec::new(),
            pending: VecDeque::new(),
            now: SimTick::ZERO,
            thunder_volume,
        }
    }

    /// Immediate dispatch. `None` means the host rejected the sound; the
    /// caller treats that as transient.
    pub fn play(
        &mut self,
        audio: &mut dyn AudioSink,
        descriptor: SoundDescriptor,
    ) -> Option<SoundHandle> {
        play_now(audio, self.thunder_volume, descriptor)
    }

    /// Play now, or enqueue for `delay_ticks` in the future.
    pub fn play_at(
        &mut self,
        audio: &mut dyn AudioSink,
        descriptor: SoundDescriptor,
        delay_ticks: u32,
    ) -> Option<SoundHandle> {
        if delay_ticks == 0 {
            return self.play(audio, descriptor);
        }
        self.pending.push_back(PendingSound {
            descriptor,
            mark: self.now.advance(u64::from(delay_ticks)),
        });
        None
    }

    /// Diff-merge the requested ambient sound set into the live emitters.
    ///
    /// Matching emitters get their target updated, unmatched ones start
    /// fading out, and new positive-volume entries become emitters.
    pub fn queue_ambient(&mut self, sounds: &BTreeMap<String, f32>) {
        if sounds.is_empty() {
            for (_, mut emitter) in std::mem::take(&mut self.emitters) {
                emitter.target = 0.0;
                self.fading.push(emitter);
            }
            return;
        }

        let keep: Vec<String> = self.emitters.keys().cloned().collect();
        for name in keep {
            match sounds.get(&name) {
                Some(&target) => {
                    if let Some(emitter) = self.emitters.get_mut(&name) {
                        emitter.target = target;
                    }
                }
                None => {
                    if let Some(mut emitter) = self.emitters.remove(&name) {
                        emitter.target = 0.0;
                        self.fading.push(emitter);
                    }
                }
            }
        }

        for (name, &target) in sounds {
            if target > 0.0 && !self.emitters.contains_key(name) {
                self.emitters
                    .insert(name.clone(), Emitter::new(name.clone(), target));
            }
        }
    }

    /// Advance one host tick. Work happens every [`SCHEDULER_CADENCE`]
    /// ticks; the current tick is recorded regardless so delayed plays
    /// enqueue against the right mark.
    pub fn tick(&mut self, tick: SimTick, audio: &mut dyn AudioSink) {
        self.now = tick;
        if tick.0 % SCHEDULER_CADENCE != 0 {
            return;
        }

        for emitter in self.emitters.values_mut() {
            emitter.update(audio, EMITTER_RAMP);
        }

        let mut still_fading = Vec::with_capacity(self.fading.len());
        for mut emitter in self.fading.drain(..) {
            emitter.update(audio, FADE_RATE);
            if emitter.volume <= 0.0 {
                emitter.stop(audio);
            } else {
                still_fading.push(emitter);
            }
        }
        self.fading = still_fading;

        let thunder_volume = self.thunder_volume;
        let mut remaining = VecDeque::with_capacity(self.pending.len());
        while let Some(pending) = self.pending.pop_front() {
            let age = tick.age_since(pending.mark);
            if age >= PENDING_AGE_LIMIT {
                debug!("dropping stale pending sound {}", pending.descriptor.name);
                continue;
            }
            if age >= 0 && play_now(audio, thunder_volume, pending.descriptor.clone()).is_some() {
                continue;
            }
            remaining.push_back(pending);
        }
        self.pending = remaining;
    }

    /// Drop all emitters and pending sounds and silence the host.
    ///
    /// Every outstanding emitter handle is released before the blanket
    /// stop so the host never sees orphaned handles.
    pub fn clear_all(&mut self, audio: &mut dyn AudioSink) {
        for emitter in self.emitters.values_mut() {
            emitter.stop(audio);
        }
        for emitter in self.fading.iter_mut() {
            emitter.stop(audio);
        }
        self.emitters.clear();
        self.fading.clear();
        self.pending.clear();
        audio.stop_all();
    }

    /// Append diagnostic lines describing the scheduler state.
    pub fn gather(&self, audio: &dyn AudioSink, output: &mut Vec<String>) {
        output.push(format!(
            "SoundSystem: {}/{}",
            audio.current_count(),
            audio.max_count()
        ));
        for (name, emitter) in &self.emitters {
            output.push(format!("EMITTER: {}[vol:{}]", name, emitter.volume));
        }
        for emitter in &self.fading {
            output.push(format!("EMITTER: {}[vol:{}]", emitter.name, emitter.volume));
        }
        for pending in &self.pending {
            let prefix = if self.now.age_since(pending.mark) < 0 {
                "DELAYED: "
            } else {
                "PENDING: "
            };
            output.push(format!("{}{}", prefix, pending.descriptor.name));
        }
    }

    /// Target volume of a keyed emitter, if present.
    pub fn emitter_target(&self, name: &str) -> Option<f32> {
        self.emitters.get(name).map(|e| e.target)
    }

    /// Number of keyed emitters.
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Number of emitters currently fading out.
    pub fn fading_count(&self) -> usize {
        self.fading.len()
    }

    /// Number of queued pending sounds.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn play_now(
    audio: &mut dyn AudioSink,
    thunder_volume: f32,
    mut descriptor: SoundDescriptor,
) -> Option<SoundHandle> {
    if descriptor.name == THUNDER_SOUND {
        descriptor.volume = thunder_volume;
    }
    audio.play(&descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal audio sink for unit tests (the recording one in testkit
    /// would create a module-level dependency cycle here).
    struct CountingAudio {
        played: Vec<SoundDescriptor>,
        accept: bool,
        next: u64,
        stopped: Vec<SoundHandle>,
        stop_all_calls: usize,
    }

    impl CountingAudio {
        fn new() -> Self {
            Self {
                played: Vec::new(),
                accept: true,
                next: 1,
                stopped: Vec::new(),
                stop_all_calls: 0,
            }
        }
    }

    impl AudioSink for CountingAudio {
        fn play(&mut self, sound: &SoundDescriptor) -> Option<SoundHandle> {
            if !self.accept {
                return None;
            }
            self.played.push(sound.clone());
            let handle = SoundHandle(self.next);
            self.next += 1;
            Some(handle)
        }

        fn stop(&mut self, handle: SoundHandle) {
            self.stopped.push(handle);
        }

        fn stop_all(&mut self) {
            self.stop_all_calls += 1;
        }

        fn set_volume(&mut self, _handle: SoundHandle, _volume: f32) {}

        fn is_playing(&self, _handle: SoundHandle) -> bool {
            false
        }

        fn current_count(&self) -> usize {
            self.played.len()
        }

        fn max_count(&self) -> usize {
            28
        }
    }

    fn descriptor(name: &str) -> SoundDescriptor {
        SoundDescriptor {
            name: name.into(),
            position: Vec3::ZERO,
            volume: 0.5,
            pitch: 1.0,
            attenuation: Attenuation::Linear,
        }
    }

    #[test]
    fn zero_delay_plays_immediately() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(1.0);
        let handle = scheduler.play_at(&mut audio, descriptor("step"), 0);
        assert!(handle.is_some());
        assert_eq!(audio.played.len(), 1);
    }

    #[test]
    fn delayed_sound_waits_for_its_mark() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(1.0);
        scheduler.tick(SimTick(1000), &mut audio);
        scheduler.play_at(&mut audio, descriptor("later"), 5);
        assert_eq!(audio.played.len(), 0);

        // 1004 is a work pass but still before the mark at 1005.
        scheduler.tick(SimTick(1004), &mut audio);
        assert_eq!(audio.played.len(), 0);
        assert_eq!(scheduler.pending_count(), 1);

        // First work pass at or past the mark dispatches.
        scheduler.tick(SimTick(1008), &mut audio);
        assert_eq!(audio.played.len(), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn rejected_pending_goes_stale_and_is_dropped() {
        let mut audio = CountingAudio::new();
        audio.accept = false;
        let mut scheduler = SoundScheduler::new(1.0);
        scheduler.tick(SimTick(1000), &mut audio);
        scheduler.play_at(&mut audio, descriptor("never"), 5);

        for t in (1004..=1024).step_by(4) {
            scheduler.tick(SimTick(t), &mut audio);
        }
        assert_eq!(scheduler.pending_count(), 0);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn thunder_volume_is_overridden() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(0.25);
        scheduler.play(&mut audio, descriptor(THUNDER_SOUND));
        assert!((audio.played[0].volume - 0.25).abs() < 1e-6);
    }

    #[test]
    fn ambient_diff_updates_fades_and_creates() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(1.0);

        let mut first = BTreeMap::new();
        first.insert("wind".to_string(), 0.5);
        first.insert("rain".to_string(), 0.8);
        scheduler.queue_ambient(&first);
        assert_eq!(scheduler.emitter_count(), 2);

        let mut second = BTreeMap::new();
        second.insert("rain".to_string(), 0.3);
        second.insert("cave".to_string(), 0.6);
        scheduler.queue_ambient(&second);

        assert_eq!(scheduler.emitter_target("rain"), Some(0.3));
        assert_eq!(scheduler.emitter_target("cave"), Some(0.6));
        assert_eq!(scheduler.emitter_target("wind"), None);
        assert_eq!(scheduler.fading_count(), 1);
    }

    #[test]
    fn empty_ambient_request_empties_the_emitter_map() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(1.0);

        let mut sounds = BTreeMap::new();
        sounds.insert("wind".to_string(), 0.5);
        scheduler.queue_ambient(&sounds);
        scheduler.tick(SimTick(4), &mut audio);

        scheduler.queue_ambient(&BTreeMap::new());
        assert_eq!(scheduler.emitter_count(), 0);

        // The faded-out emitter drains within a few work passes.
        for t in (8..=24).step_by(4) {
            scheduler.tick(SimTick(t), &mut audio);
        }
        assert_eq!(scheduler.fading_count(), 0);
    }

    #[test]
    fn zero_volume_requests_do_not_create_emitters() {
        let mut scheduler = SoundScheduler::new(1.0);
        let mut sounds = BTreeMap::new();
        sounds.insert("wind".to_string(), 0.0);
        scheduler.queue_ambient(&sounds);
        assert_eq!(scheduler.emitter_count(), 0);
    }

    #[test]
    fn clear_all_is_idempotent() {
        let mut audio = CountingAudio::new();
        let mut scheduler = SoundScheduler::new(1.0);
        let mut sounds = BTreeMap::new();
        sounds.insert("wind".to_string(), 0.5);
        scheduler.queue_ambient(&sounds);
        scheduler.tick(SimTick(1000), &mut audio);
        scheduler.play_at(&mut audio, descriptor("later"), 6);

        scheduler.clear_all(&mut audio);
        let first = (
            scheduler.emitter_count(),
            scheduler.fading_count(),
            scheduler.pending_count(),
        );
        scheduler.clear_all(&mut audio);
        let second = (
            scheduler.emitter_count(),
            scheduler.fading_count(),
            scheduler.pending_count(),
        );
        assert_eq!(first, (0, 0, 0));
        assert_eq!(first, second);
        assert_eq!(audio.stop_all_calls, 2);
    }

    #[test]
    fn gather_reports_pending_and_delayed() {
        let mut audio = CountingAudio::new();
        audio.accept = false;
        let mut scheduler = SoundScheduler::new(1.0);
        scheduler.tick(SimTick(1000), &mut audio);
        scheduler.play_at(&mut audio, descriptor("soon"), 2);
        scheduler.play_at(&mut audio, descriptor("later"), 9);

        // At 1002, "soon" has reached its mark; "later" has not.
        scheduler.now = SimTick(1002);
        let mut output = Vec::new();
        scheduler.gather(&audio, &mut output);
        assert!(output[0].starts_with("SoundSystem: "));
        assert!(output.iter().any(|l| l == "PENDING: soon"));
        assert!(output.iter().any(|l| l == "DELAYED: later"));
    }
}
