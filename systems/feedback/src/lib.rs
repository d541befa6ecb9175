#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Feedback system translating round events into audio cues and visual effects.
//!
//! The system never plays sounds or draws particles itself. It turns the world's
//! event stream into [`AudioCue`] and [`VisualEffect`] descriptions that the
//! presentation adapters render, and tracks the decaying screen shake.

mod audio;

use bertha_knockout_core::{Event, Outcome, PopId, SlotId};
use log::debug;

pub use audio::{AudioCue, Tone, Waveform};

/// Excuses shown above the target when it gets whacked.
pub const EXCUSES: [&str; 8] = [
    "Cookies!",
    "Flowers!",
    "Receipt!",
    "Plumber!",
    "Not home!",
    "Car trouble!",
    "Paycheck soon!",
    "Bank error!",
];

/// Text shown above a decoy when it gets whacked.
pub const WRONG_HIT_TEXT: &str = "Oops!";

const HIT_CONFETTI: u32 = 50;
const WIN_CELEBRATION: u32 = 160;
const LOSS_CELEBRATION: u32 = 60;
const SHAKE_ON_HIT: f32 = 18.0;
const SHAKE_ON_MISS: f32 = 6.0;
const SHAKE_DECAY: f32 = 0.9;

/// Tint applied to floating text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextMood {
    /// Positive feedback, drawn green.
    Cheer,
    /// Negative feedback, drawn red.
    Warning,
}

/// Transient visual effect requested for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualEffect {
    /// Burst of confetti above a door.
    Confetti {
        /// Door the burst originates from.
        slot: SlotId,
        /// Number of particles to emit.
        particles: u32,
    },
    /// Floating text above a door.
    TextPop {
        /// Door the text floats above.
        slot: SlotId,
        /// Text to show.
        text: &'static str,
        /// Tint of the text.
        mood: TextMood,
    },
    /// Full screen strike marker after a wrong hit.
    StrikeFlash,
    /// End-of-round burst from the top of the screen.
    Celebration {
        /// Outcome being celebrated or mourned.
        outcome: Outcome,
        /// Number of particles to emit.
        particles: u32,
    },
}

/// Output collected by the feedback system for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackFrame {
    /// Audio cues to play, in event order.
    pub cues: Vec<AudioCue>,
    /// Visual effects to spawn, in event order.
    pub effects: Vec<VisualEffect>,
}

impl FeedbackFrame {
    /// Drops every collected cue and effect.
    pub fn clear(&mut self) {
        self.cues.clear();
        self.effects.clear();
    }

    /// Reports whether the frame produced no feedback at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && self.effects.is_empty()
    }
}

/// Pure system that maps round events onto presentation feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    sound_enabled: bool,
    screen_shake: f32,
}

impl Feedback {
    /// Creates the system with the provided initial sound setting.
    #[must_use]
    pub const fn new(sound_enabled: bool) -> Self {
        Self {
            sound_enabled,
            screen_shake: 0.0,
        }
    }

    /// Whether audio cues are currently produced.
    #[must_use]
    pub const fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Current screen shake magnitude in screen units.
    #[must_use]
    pub const fn screen_shake(&self) -> f32 {
        self.screen_shake
    }

    /// Consumes world events and appends the resulting feedback to `out`.
    pub fn handle(&mut self, events: &[Event], out: &mut FeedbackFrame) {
        for event in events {
            match event {
                Event::SoundToggled { enabled } => {
                    debug!("sound {}", if *enabled { "on" } else { "off" });
                    self.sound_enabled = *enabled;
                    self.cue(AudioCue::SoundEnabled, out);
                }
                Event::RoundReset => self.screen_shake = 0.0,
                Event::TimeAdvanced { .. } => self.screen_shake *= SHAKE_DECAY,
                Event::TargetHit { pop, slot, .. } => {
                    self.cue(AudioCue::TargetHit, out);
                    out.effects.push(VisualEffect::Confetti {
                        slot: *slot,
                        particles: HIT_CONFETTI,
                    });
                    out.effects.push(VisualEffect::TextPop {
                        slot: *slot,
                        text: excuse_for(*pop),
                        mood: TextMood::Cheer,
                    });
                    self.screen_shake += SHAKE_ON_HIT;
                }
                Event::DecoyHit { slot, .. } => {
                    self.cue(AudioCue::WrongHit, out);
                    out.effects.push(VisualEffect::StrikeFlash);
                    out.effects.push(VisualEffect::TextPop {
                        slot: *slot,
                        text: WRONG_HIT_TEXT,
                        mood: TextMood::Warning,
                    });
                    self.screen_shake += SHAKE_ON_MISS;
                }
                Event::PopExpired { kind, .. } if kind.is_target() => {
                    self.cue(AudioCue::TargetMissed, out);
                    self.screen_shake += SHAKE_ON_MISS;
                }
                Event::StrikesAdded { .. } => self.screen_shake += SHAKE_ON_MISS,
                Event::RoundEnded { outcome, .. } => {
                    let particles = match outcome {
                        Outcome::Win => WIN_CELEBRATION,
                        Outcome::Loss => LOSS_CELEBRATION,
                    };
                    out.effects.push(VisualEffect::Celebration {
                        outcome: *outcome,
                        particles,
                    });
                }
                _ => {}
            }
        }
    }

    fn cue(&self, cue: AudioCue, out: &mut FeedbackFrame) {
        if self.sound_enabled {
            out.cues.push(cue);
        }
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Excuse attached to a target pop; rotates through [`EXCUSES`] by pop id.
#[must_use]
pub fn excuse_for(pop: PopId) -> &'static str {
    EXCUSES[pop.get() as usize % EXCUSES.len()]
}
