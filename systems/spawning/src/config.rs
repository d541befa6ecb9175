//! Tuning surface for the spawning system.

use std::time::Duration;

use bertha_knockout_core::{ConfigError, RoundConfig};
use serde::{Deserialize, Serialize};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gate deciding when decoys pop out.
    pub decoy_policy: DecoyPolicy,
    /// Relative spawn weight per decoy roster index.
    pub decoy_weights: Vec<u32>,
    /// How pop lifetime, decoy cadence and decoy cap evolve over the round.
    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decoy_policy: DecoyPolicy::default(),
            decoy_weights: vec![1, 1, 1, 1],
            difficulty: Difficulty::default(),
        }
    }
}

impl Config {
    /// Checks the configuration against the round it will populate.
    pub fn validate(&self, round: &RoundConfig) -> Result<(), ConfigError> {
        if self.decoy_weights.iter().all(|weight| *weight == 0) {
            return Err(ConfigError::NoDecoyWeights);
        }
        if self.decoy_weights.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::DecoyRosterTooLarge {
                count: self.decoy_weights.len(),
            });
        }
        for pacing in self.difficulty.extremes() {
            if pacing.decoy_interval_ms == 0 {
                return Err(ConfigError::ZeroDecoyInterval);
            }
            if pacing.pop_lifetime_ms == 0 {
                return Err(ConfigError::ZeroPopLifetime);
            }
            if pacing.decoy_cap == 0 || pacing.decoy_cap > round.max_live_pops {
                return Err(ConfigError::DecoyCapOutOfRange {
                    decoy_cap: pacing.decoy_cap,
                    live_cap: round.max_live_pops,
                });
            }
        }
        Ok(())
    }
}

/// Decides when a decoy spawn is attempted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DecoyPolicy {
    /// Attempt a spawn each time the decoy interval elapses, stretched by up to `jitter_ms`.
    Interval {
        /// Upper bound of the random extension added to every interval.
        jitter_ms: u64,
    },
    /// Roll every tick, succeeding on average once per decoy interval.
    Chance,
}

impl Default for DecoyPolicy {
    fn default() -> Self {
        Self::Interval { jitter_ms: 0 }
    }
}

/// Cadence knobs at one moment of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// How long every pop stays visible, in milliseconds.
    pub pop_lifetime_ms: u64,
    /// Mean time between decoy spawn attempts, in milliseconds.
    pub decoy_interval_ms: u64,
    /// Decoys are only attempted while fewer pops than this are visible.
    pub decoy_cap: u32,
}

impl Pacing {
    /// Visible lifetime of a pop.
    #[must_use]
    pub const fn pop_lifetime(&self) -> Duration {
        Duration::from_millis(self.pop_lifetime_ms)
    }

    /// Mean time between decoy attempts.
    #[must_use]
    pub const fn decoy_interval(&self) -> Duration {
        Duration::from_millis(self.decoy_interval_ms)
    }
}

/// Difficulty curve over the course of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Difficulty {
    /// The same pacing for the whole round.
    Constant {
        /// Pacing applied throughout.
        pacing: Pacing,
    },
    /// Linear blend from `early` at the first tick to `late` when the clock runs out.
    Ramp {
        /// Pacing when the round starts.
        early: Pacing,
        /// Pacing when the round ends.
        late: Pacing,
    },
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Constant {
            pacing: Pacing {
                pop_lifetime_ms: 900,
                decoy_interval_ms: 700,
                decoy_cap: 3,
            },
        }
    }
}

impl Difficulty {
    /// Ramp that tightens from slow, sparse pops to quick, crowded ones.
    #[must_use]
    pub const fn classic_ramp() -> Self {
        Self::Ramp {
            early: Pacing {
                pop_lifetime_ms: 1_000,
                decoy_interval_ms: 650,
                decoy_cap: 2,
            },
            late: Pacing {
                pop_lifetime_ms: 550,
                decoy_interval_ms: 320,
                decoy_cap: 4,
            },
        }
    }

    /// Pacing in effect once `progress` (0.0..=1.0) of the round has elapsed.
    #[must_use]
    pub fn pacing_at(&self, progress: f64) -> Pacing {
        match *self {
            Self::Constant { pacing } => pacing,
            Self::Ramp { early, late } => {
                let t = progress.clamp(0.0, 1.0);
                Pacing {
                    pop_lifetime_ms: lerp(early.pop_lifetime_ms as f64, late.pop_lifetime_ms as f64, t)
                        as u64,
                    decoy_interval_ms: lerp(
                        early.decoy_interval_ms as f64,
                        late.decoy_interval_ms as f64,
                        t,
                    ) as u64,
                    decoy_cap: lerp(f64::from(early.decoy_cap), f64::from(late.decoy_cap), t)
                        .round() as u32,
                }
            }
        }
    }

    fn extremes(&self) -> [Pacing; 2] {
        match *self {
            Self::Constant { pacing } => [pacing, pacing],
            Self::Ramp { early, late } => [early, late],
        }
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
