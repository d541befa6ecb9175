use std::time::Duration;

/// Oscillator shape used by a tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine wave.
    Sine,
    /// Square wave.
    Square,
    /// Sawtooth wave.
    Sawtooth,
    /// Triangle wave.
    Triangle,
}

/// Single synthesised beep, described as data for an audio backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// Time until the beep fades out.
    pub duration: Duration,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Peak gain in `0.0..=1.0`.
    pub gain: f32,
    /// Offset from the moment the cue fires.
    pub delay: Duration,
}

impl Tone {
    const fn new(
        frequency_hz: f32,
        duration_ms: u64,
        waveform: Waveform,
        gain: f32,
        delay_ms: u64,
    ) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            waveform,
            gain,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

const TARGET_HIT: [Tone; 3] = [
    Tone::new(720.0, 90, Waveform::Triangle, 0.32, 0),
    Tone::new(1_040.0, 130, Waveform::Square, 0.28, 60),
    Tone::new(540.0, 70, Waveform::Triangle, 0.18, 120),
];
const WRONG_HIT: [Tone; 2] = [
    Tone::new(120.0, 180, Waveform::Sawtooth, 0.32, 0),
    Tone::new(80.0, 120, Waveform::Sine, 0.22, 80),
];
const TARGET_MISSED: [Tone; 1] = [Tone::new(220.0, 60, Waveform::Sine, 0.18, 0)];
const SOUND_ENABLED: [Tone; 1] = [Tone::new(720.0, 50, Waveform::Triangle, 0.22, 0)];

/// Sound the audio collaborator should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Celebration jingle for a target hit.
    TargetHit,
    /// Low buzzer for a decoy hit.
    WrongHit,
    /// Short blip when the target slips away.
    TargetMissed,
    /// Chirp confirming that sound was switched back on.
    SoundEnabled,
}

impl AudioCue {
    /// Tone sequence making up the cue, ordered by delay.
    #[must_use]
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Self::TargetHit => &TARGET_HIT,
            Self::WrongHit => &WRONG_HIT,
            Self::TargetMissed => &TARGET_MISSED,
            Self::SoundEnabled => &SOUND_ENABLED,
        }
    }
}
