//! The acoustic data model.
//!
//! An acoustic is a named playable unit. Definitions arrive as
//! [`AcousticSpec`] trees (data-driven, possibly containing named
//! references); the registry compiles them into reference-free
//! [`Acoustic`] trees that evaluate to concrete [`SoundDescriptor`]s.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Distance attenuation model for a sound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attenuation {
    /// Heard everywhere at constant volume.
    None,
    /// Linear falloff from the source.
    #[default]
    Linear,
}

/// A fully resolved, positioned sound ready for the host mixer.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundDescriptor {
    /// Sound event name.
    pub name: String,
    /// World position.
    pub position: Vec3,
    /// Final volume.
    pub volume: f32,
    /// Final pitch.
    pub pitch: f32,
    /// Attenuation model.
    pub attenuation: Attenuation,
}

/// Circumstance tag selecting a chain inside an event acoustic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    /// Very slow movement.
    Wander,
    /// Normal walking.
    Walk,
    /// Running.
    Run,
    /// Leaving the ground upward.
    Jump,
    /// Returning to the ground.
    Land,
    /// Moving on a ladder.
    Climb,
    /// Moving fast on a ladder.
    ClimbRun,
    /// Swimming stroke.
    Swim,
    /// Entering liquid.
    Splash,
}

impl EventTag {
    /// Canonical lowercase chain key.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventTag::Wander => "wander",
            EventTag::Walk => "walk",
            EventTag::Run => "run",
            EventTag::Jump => "jump",
            EventTag::Land => "land",
            EventTag::Climb => "climb",
            EventTag::ClimbRun => "climb_run",
            EventTag::Swim => "swim",
            EventTag::Splash => "splash",
        }
    }

    /// Chain to try when an event acoustic lacks this one.
    pub const fn fallback(self) -> Option<EventTag> {
        match self {
            EventTag::Walk => Some(EventTag::Wander),
            EventTag::Run => Some(EventTag::Walk),
            EventTag::Jump => Some(EventTag::Wander),
            EventTag::Land => Some(EventTag::Run),
            EventTag::Climb => Some(EventTag::Walk),
            EventTag::ClimbRun => Some(EventTag::Run),
            EventTag::Wander | EventTag::Swim | EventTag::Splash => None,
        }
    }
}

/// One weighted branch of a probability spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSpec {
    /// Positive weight.
    pub weight: f32,
    /// The branch.
    pub spec: AcousticSpec,
}

/// The definition language for acoustics, as parsed from data files.
///
/// Specs may reference other named definitions with [`AcousticSpec::Ref`];
/// compilation resolves those and rejects cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcousticSpec {
    /// A single concrete sound.
    Basic {
        /// Sound event name.
        name: String,
        /// Minimum volume.
        #[serde(default = "default_volume")]
        vol_min: f32,
        /// Maximum volume.
        #[serde(default = "default_volume")]
        vol_max: f32,
        /// Minimum pitch.
        #[serde(default = "default_pitch")]
        pitch_min: f32,
        /// Maximum pitch.
        #[serde(default = "default_pitch")]
        pitch_max: f32,
        /// Attenuation model.
        #[serde(default)]
        attenuation: Attenuation,
    },
    /// Named chains selected by event tag (or by dotted sub-reference).
    Event {
        /// Chain name to spec.
        chains: BTreeMap<String, AcousticSpec>,
    },
    /// All parts played at once.
    Simultaneous {
        /// Unordered parts.
        parts: Vec<AcousticSpec>,
    },
    /// Weighted choice of one branch.
    Probability {
        /// Weighted branches.
        entries: Vec<WeightedSpec>,
    },
    /// An acoustic played after a tick delay.
    Delayed {
        /// Delay in ticks.
        delay: u32,
        /// The delayed acoustic.
        inner: Box<AcousticSpec>,
    },
    /// Probability acoustic gated by the ambient rain-intensity signal.
    RainSplash {
        /// The gated acoustic.
        inner: Box<AcousticSpec>,
    },
    /// Reference to another named definition.
    Ref {
        /// Referenced definition name.
        name: String,
    },
}

fn default_volume() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

/// Compiled leaf sound.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicAcoustic {
    /// Sound event name.
    pub name: String,
    /// Volume range.
    pub vol_min: f32,
    /// Volume range.
    pub vol_max: f32,
    /// Pitch range.
    pub pitch_min: f32,
    /// Pitch range.
    pub pitch_max: f32,
    /// Attenuation model.
    pub attenuation: Attenuation,
}

/// A compiled, reference-free acoustic tree.
#[derive(Debug, PartialEq)]
pub enum Acoustic {
    /// A single concrete sound.
    Basic(BasicAcoustic),
    /// Chains selected by event tag, with fallback.
    Event(BTreeMap<String, AcousticArray>),
    /// All parts at once.
    Simultaneous(Vec<Arc<Acoustic>>),
    /// Weighted choice.
    Probability {
        /// Sum of all weights, always > 0.
        total: f32,
        /// Weighted branches.
        entries: Vec<(f32, Arc<Acoustic>)>,
    },
    /// Deferred play.
    Delayed {
        /// Delay in ticks.
        delay: u32,
        /// The deferred acoustic.
        inner: Arc<Acoustic>,
    },
    /// Gated by rain intensity: plays with probability equal to the signal.
    RainSplash(AcousticArray),
}

/// Ordered list of acoustics played together for one circumstance.
///
/// The empty array is the distinguished NOT_EMITTER value: resolution
/// succeeded and the answer is silence.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticArray(Arc<Vec<Arc<Acoustic>>>);

impl AcousticArray {
    /// The distinguished "produce no sound" value.
    pub fn not_emitter() -> Self {
        Self(Arc::new(Vec::new()))
    }

    /// Build from compiled acoustics.
    pub fn from_vec(acoustics: Vec<Arc<Acoustic>>) -> Self {
        Self(Arc::new(acoustics))
    }

    /// Whether this is the NOT_EMITTER value.
    pub fn is_not_emitter(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of acoustics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array is empty (same as [`Self::is_not_emitter`]).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the acoustics in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Acoustic>> {
        self.0.iter()
    }

    /// Evaluate every acoustic into queued plays.
    pub fn play(&self, ctx: &PlayContext, rng: &mut SmallRng, out: &mut Vec<QueuedPlay>) {
        for acoustic in self.0.iter() {
            acoustic.play(ctx, rng, out);
        }
    }
}

/// Everything play evaluation needs to turn an acoustic into sounds.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext {
    /// Where the sound originates.
    pub position: Vec3,
    /// Multiplier applied to every produced volume.
    pub volume_scale: f32,
    /// Rain-intensity signal in `[0, 1]` consumed by rain-splash gates.
    pub rain_intensity: f32,
    /// Circumstance tag for event acoustics.
    pub event: EventTag,
}

/// A resolved sound plus the tick delay it should be dispatched with.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedPlay {
    /// The sound.
    pub descriptor: SoundDescriptor,
    /// Ticks to defer dispatch; zero plays immediately.
    pub delay: u32,
}

impl Acoustic {
    /// Evaluate this acoustic, appending resolved plays to `out`.
    pub fn play(&self, ctx: &PlayContext, rng: &mut SmallRng, out: &mut Vec<QueuedPlay>) {
        self.play_delayed(ctx, rng, out, 0);
    }

    fn play_delayed(
        &self,
        ctx: &PlayContext,
        rng: &mut SmallRng,
        out: &mut Vec<QueuedPlay>,
        delay: u32,
    ) {
        match self {
            Acoustic::Basic(basic) => {
                let volume = sample_range(rng, basic.vol_min, basic.vol_max) * ctx.volume_scale;
                let pitch = sample_range(rng, basic.pitch_min, basic.pitch_max);
                out.push(QueuedPlay {
                    descriptor: SoundDescriptor {
                        name: basic.name.clone(),
                        position: ctx.position,
                        volume,
                        pitch,
                        attenuation: basic.attenuation,
                    },
                    delay,
                });
            }
            Acoustic::Event(chains) => {
                let mut tag = Some(ctx.event);
                while let Some(t) = tag {
                    if let Some(chain) = chains.get(t.as_str()) {
                        for acoustic in chain.iter() {
                            acoustic.play_delayed(ctx, rng, out, delay);
                        }
                        return;
                    }
                    tag = t.fallback();
                }
                // No chain for this event; the acoustic stays silent.
            }
            Acoustic::Simultaneous(parts) => {
                for part in parts {
                    part.play_delayed(ctx, rng, out, delay);
                }
            }
            Acoustic::Probability { total, entries } => {
                let mut roll = rng.gen::<f32>() * total;
                for (weight, acoustic) in entries {
                    roll -= weight;
                    if roll <= 0.0 {
                        acoustic.play_delayed(ctx, rng, out, delay);
                        return;
                    }
                }
                // Float drift can leave a sliver; the last entry owns it.
                if let Some((_, acoustic)) = entries.last() {
                    acoustic.play_delayed(ctx, rng, out, delay);
                }
            }
            Acoustic::Delayed {
                delay: extra,
                inner,
            } => {
                inner.play_delayed(ctx, rng, out, delay + extra);
            }
            Acoustic::RainSplash(inner) => {
                if rng.gen::<f32>() < ctx.rain_intensity {
                    for acoustic in inner.iter() {
                        acoustic.play_delayed(ctx, rng, out, delay);
                    }
                }
            }
        }
    }
}

fn sample_range(rng: &mut SmallRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
