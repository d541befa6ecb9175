#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting pop spawn commands.
//!
//! Target appearances follow a [`TargetSchedule`] generated when the system is
//! created or the round resets. Decoys are attempted according to the
//! configured [`DecoyPolicy`] whenever fewer pops than the current decoy cap
//! are visible. Every random draw goes through the injected
//! [`RandomSource`], so a seed reproduces the round exactly.

mod config;
mod random;
mod schedule;

use std::time::Duration;

use bertha_knockout_core::{
    CharacterKind, Command, ConfigError, DecoyKind, Event, RandomSource, RoundConfig, RoundPhase,
    SlotId,
};
use log::debug;

pub use config::{Config, DecoyPolicy, Difficulty, Pacing};
pub use random::SeededRandom;
pub use schedule::TargetSchedule;

/// Read-only world state the spawning system needs each frame.
#[derive(Clone, Copy, Debug)]
pub struct SpawnView<'a> {
    /// Current round phase.
    pub phase: RoundPhase,
    /// Round time elapsed after the frame's tick.
    pub elapsed: Duration,
    /// Number of pops currently visible.
    pub live_pops: usize,
    /// Slots without a pop, in slot order.
    pub free_slots: &'a [SlotId],
}

/// Pure system that deterministically emits spawn commands while a round runs.
#[derive(Debug)]
pub struct Spawning<R> {
    config: Config,
    round_duration: Duration,
    target_appearances: u32,
    max_live_pops: usize,
    rng: R,
    schedule: TargetSchedule,
    decoy_timer: Duration,
    next_decoy_in: Duration,
    dropped_targets: u32,
}

impl<R: RandomSource> Spawning<R> {
    /// Creates a new spawning system for rounds shaped by `round`.
    pub fn new(config: Config, round: &RoundConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate(round)?;
        let round_duration = round.round_duration();
        let schedule =
            TargetSchedule::generate(round.target_appearances, round_duration, &mut rng);
        let mut spawning = Self {
            config,
            round_duration,
            target_appearances: round.target_appearances,
            max_live_pops: round.max_live_pops as usize,
            rng,
            schedule,
            decoy_timer: Duration::ZERO,
            next_decoy_in: Duration::ZERO,
            dropped_targets: 0,
        };
        spawning.next_decoy_in = spawning.draw_decoy_interval(0.0);
        Ok(spawning)
    }

    /// Target schedule for the current round.
    #[must_use]
    pub fn schedule(&self) -> &TargetSchedule {
        &self.schedule
    }

    /// Scheduled targets skipped because no slot or capacity was free when due.
    #[must_use]
    pub fn dropped_targets(&self) -> u32 {
        self.dropped_targets
    }

    /// Configuration the system was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Regenerates the target schedule and clears the decoy cadence.
    pub fn reset(&mut self) {
        self.schedule = TargetSchedule::generate(
            self.target_appearances,
            self.round_duration,
            &mut self.rng,
        );
        self.decoy_timer = Duration::ZERO;
        self.next_decoy_in = self.draw_decoy_interval(0.0);
        self.dropped_targets = 0;
    }

    /// Consumes events and immutable views to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], view: SpawnView<'_>, out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::RoundReset => {
                    self.reset();
                    accumulated = Duration::ZERO;
                }
                Event::TimeAdvanced { dt, .. } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if !view.phase.is_running() || accumulated.is_zero() {
            return;
        }

        self.decoy_timer = self.decoy_timer.saturating_add(accumulated);
        let progress = self.progress(view.elapsed);
        let pacing = self.config.difficulty.pacing_at(progress);
        let mut free: Vec<SlotId> = view.free_slots.to_vec();
        let mut live = view.live_pops;

        while let Some(due) = self.schedule.take_due(view.elapsed) {
            match self.claim_slot(&mut free, live, self.max_live_pops) {
                Some(slot) => {
                    live += 1;
                    out.push(Command::SpawnPop {
                        slot,
                        kind: CharacterKind::Target,
                        lifetime: pacing.pop_lifetime(),
                    });
                }
                None => {
                    self.dropped_targets += 1;
                    debug!("dropped target due at {due:?}: no free door");
                }
            }
        }

        let cap = (pacing.decoy_cap as usize).min(self.max_live_pops);
        if live >= cap || !self.decoy_due(accumulated, progress, pacing) {
            return;
        }
        let Some(slot) = self.claim_slot(&mut free, live, cap) else {
            return;
        };
        if let Some(decoy) = self.pick_decoy() {
            out.push(Command::SpawnPop {
                slot,
                kind: CharacterKind::Decoy(decoy),
                lifetime: pacing.pop_lifetime(),
            });
        }
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        if self.round_duration.is_zero() {
            return 1.0;
        }
        elapsed.as_secs_f64() / self.round_duration.as_secs_f64()
    }

    /// Advances the decoy gate; only called while the decoy cap has room.
    fn decoy_due(&mut self, accumulated: Duration, progress: f64, pacing: Pacing) -> bool {
        match self.config.decoy_policy {
            DecoyPolicy::Interval { .. } => {
                if self.decoy_timer < self.next_decoy_in {
                    return false;
                }
                self.decoy_timer = Duration::ZERO;
                self.next_decoy_in = self.draw_decoy_interval(progress);
                true
            }
            DecoyPolicy::Chance => {
                let interval = pacing.decoy_interval();
                if interval.is_zero() {
                    return false;
                }
                let probability = (accumulated.as_secs_f64() / interval.as_secs_f64()).min(1.0);
                self.rng.next_unit() < probability
            }
        }
    }

    fn draw_decoy_interval(&mut self, progress: f64) -> Duration {
        let base = self.config.difficulty.pacing_at(progress).decoy_interval();
        match self.config.decoy_policy {
            DecoyPolicy::Interval { jitter_ms } if jitter_ms > 0 => {
                let extra = (self.rng.next_unit() * jitter_ms as f64) as u64;
                base + Duration::from_millis(extra)
            }
            DecoyPolicy::Interval { .. } | DecoyPolicy::Chance => base,
        }
    }

    fn claim_slot(&mut self, free: &mut Vec<SlotId>, live: usize, cap: usize) -> Option<SlotId> {
        if live >= cap {
            return None;
        }
        let index = self.rng.pick_index(free.len())?;
        Some(free.swap_remove(index))
    }

    fn pick_decoy(&mut self) -> Option<DecoyKind> {
        let index = weighted_index(&self.config.decoy_weights, self.rng.next_unit())?;
        u8::try_from(index).ok().map(DecoyKind::new)
    }
}

/// Maps a uniform `roll` in `0.0..1.0` onto an index chosen proportionally to `weights`.
fn weighted_index(weights: &[u32], roll: f64) -> Option<usize> {
    let total: u64 = weights.iter().map(|weight| u64::from(*weight)).sum();
    if total == 0 {
        return None;
    }
    let mut remaining = roll * total as f64;
    let mut last = None;
    for (index, weight) in weights.iter().enumerate() {
        if *weight == 0 {
            continue;
        }
        if remaining < f64::from(*weight) {
            return Some(index);
        }
        remaining -= f64::from(*weight);
        last = Some(index);
    }
    last
}
