#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Bertha Knockout.
//!
//! The world owns the door layout, the live pops, the round clock and the
//! scoreboard. It never rolls dice: spawns arrive as [`Command::SpawnPop`]
//! requests from the spawning system, so a round is fully determined by the
//! command stream it receives.

mod layout;
mod pops;
mod scoring;

use std::time::Duration;

use bertha_knockout_core::{
    CharacterKind, Command, ConfigError, EndCause, Event, Outcome, PopId, RoundConfig,
    RoundPhase, ScreenPoint, SlotId, SpawnError, StrikeCause,
};
use log::debug;

use crate::{
    layout::{SlotLayout, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH},
    pops::PopRegistry,
    scoring::Scoreboard,
};

/// Represents the authoritative Bertha Knockout round state.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    config: RoundConfig,
    layout: SlotLayout,
    pops: PopRegistry,
    scoreboard: Scoreboard,
    phase: RoundPhase,
    elapsed: Duration,
    target_appearances: u32,
    best_score: u32,
    sound_enabled: bool,
}

impl World {
    /// Creates a world using the default round configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = RoundConfig::default();
        debug_assert!(config.validate().is_ok());
        Self::from_valid_config(config)
    }

    /// Creates a world for the provided configuration after validating it.
    pub fn with_config(config: RoundConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RoundConfig) -> Self {
        let layout = SlotLayout::new(&config, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        let scoreboard = Scoreboard::new(&config);
        Self {
            config,
            layout,
            pops: PopRegistry::new(),
            scoreboard,
            phase: RoundPhase::Idle,
            elapsed: Duration::ZERO,
            target_appearances: 0,
            best_score: 0,
            sound_enabled: true,
        }
    }

    fn remaining(&self) -> Duration {
        self.config.round_duration().saturating_sub(self.elapsed)
    }

    fn reset_round(&mut self) {
        self.pops.clear();
        self.scoreboard = Scoreboard::new(&self.config);
        self.phase = RoundPhase::Idle;
        self.elapsed = Duration::ZERO;
        self.target_appearances = 0;
    }

    fn end_round(&mut self, outcome: Outcome, cause: EndCause, out_events: &mut Vec<Event>) {
        debug!("round ended: {outcome:?} ({cause:?})");
        self.phase = RoundPhase::Ended(outcome);
        out_events.push(Event::RoundEnded { outcome, cause });
    }

    fn charge_strikes(&mut self, amount: u32, cause: StrikeCause, out_events: &mut Vec<Event>) {
        if amount == 0 {
            self.scoreboard.break_streak();
            return;
        }

        let charge = self.scoreboard.charge_strikes(amount);
        out_events.push(Event::StrikesAdded {
            amount: charge.amount,
            total: charge.total,
            cause,
        });
        if charge.limit_reached {
            self.end_round(Outcome::Loss, EndCause::StrikeLimit, out_events);
        }
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let duration = self.config.round_duration();
        self.elapsed = self.elapsed.saturating_add(dt).min(duration);
        out_events.push(Event::TimeAdvanced {
            dt,
            elapsed: self.elapsed,
            remaining: self.remaining(),
        });

        if self.remaining().is_zero() {
            let outcome = if self.scoreboard.goal_reached() {
                Outcome::Win
            } else {
                Outcome::Loss
            };
            self.end_round(outcome, EndCause::TimeExpired, out_events);
            return;
        }

        for pop in self.pops.expire(self.elapsed) {
            out_events.push(Event::PopExpired {
                pop: pop.id,
                slot: pop.slot,
                kind: pop.kind,
            });
            if pop.kind.is_target() {
                self.charge_strikes(
                    self.config.strikes_on_target_expiry,
                    StrikeCause::MissedTarget,
                    out_events,
                );
                if self.phase.is_ended() {
                    break;
                }
            }
        }
    }

    fn check_spawn(&self, slot: SlotId, kind: CharacterKind) -> Result<(), SpawnError> {
        if !self.phase.is_running() {
            return Err(SpawnError::RoundNotRunning);
        }
        if self.layout.rect(slot).is_none() {
            return Err(SpawnError::UnknownSlot);
        }
        if self.pops.is_occupied(slot) {
            return Err(SpawnError::SlotOccupied);
        }
        if self.pops.len() >= self.config.max_live_pops as usize {
            return Err(SpawnError::CapacityReached);
        }
        if kind.is_target() && self.target_appearances >= self.config.target_appearances {
            return Err(SpawnError::TargetQuotaExhausted);
        }
        Ok(())
    }

    fn spawn(
        &mut self,
        slot: SlotId,
        kind: CharacterKind,
        lifetime: Duration,
        out_events: &mut Vec<Event>,
    ) {
        if let Err(reason) = self.check_spawn(slot, kind) {
            debug!("rejected {kind:?} spawn at {slot:?}: {reason:?}");
            out_events.push(Event::SpawnRejected { slot, kind, reason });
            return;
        }

        let pop = self.pops.insert(slot, kind, self.elapsed, lifetime);
        if kind.is_target() {
            self.target_appearances += 1;
        }
        out_events.push(Event::PopSpawned {
            pop,
            slot,
            kind,
            lifetime,
        });
    }

    fn whack(&mut self, point: ScreenPoint, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }

        let Some(pop) = self
            .pops
            .topmost_at(&self.layout, point)
            .and_then(|id| self.pops.resolve(id))
        else {
            out_events.push(Event::WhackMissed { point });
            return;
        };

        match pop.kind {
            CharacterKind::Target => self.score_target(pop.id, pop.slot, out_events),
            CharacterKind::Decoy(decoy) => {
                out_events.push(Event::DecoyHit {
                    pop: pop.id,
                    slot: pop.slot,
                    decoy,
                });
                self.charge_strikes(
                    self.config.strikes_on_wrong_hit,
                    StrikeCause::WrongHit,
                    out_events,
                );
            }
        }
    }

    fn score_target(&mut self, pop: PopId, slot: SlotId, out_events: &mut Vec<Event>) {
        let award = self.scoreboard.award_target();
        out_events.push(Event::TargetHit {
            pop,
            slot,
            award: award.award,
            score: award.score,
            streak: award.streak,
        });

        if award.score > self.best_score {
            self.best_score = award.score;
            out_events.push(Event::BestScoreImproved { score: award.score });
        }

        if award.goal_reached {
            self.end_round(Outcome::Win, EndCause::GoalReached, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLayout { width, height } => {
            world.layout = SlotLayout::new(&world.config, width, height);
            out_events.push(Event::LayoutConfigured {
                slot_count: world.layout.len(),
            });
        }
        Command::RestoreBestScore { score } => {
            world.best_score = world.best_score.max(score);
        }
        Command::StartRound => {
            if world.phase == RoundPhase::Idle {
                debug!("round started");
                world.phase = RoundPhase::Running;
                out_events.push(Event::RoundStarted);
            }
        }
        Command::TogglePause => match world.phase {
            RoundPhase::Running => {
                world.phase = RoundPhase::Paused;
                out_events.push(Event::RoundPaused);
            }
            RoundPhase::Paused => {
                world.phase = RoundPhase::Running;
                out_events.push(Event::RoundResumed);
            }
            RoundPhase::Idle | RoundPhase::Ended(_) => {}
        },
        Command::ResetRound => {
            world.reset_round();
            out_events.push(Event::RoundReset);
        }
        Command::ToggleSound => {
            world.sound_enabled = !world.sound_enabled;
            out_events.push(Event::SoundToggled {
                enabled: world.sound_enabled,
            });
        }
        Command::Tick { dt } => {
            if world.phase.is_running() {
                world.advance_clock(dt, out_events);
            }
        }
        Command::SpawnPop {
            slot,
            kind,
            lifetime,
        } => world.spawn(slot, kind, lifetime, out_events),
        Command::Whack { point } => world.whack(point, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use bertha_knockout_core::{
        PopSnapshot, RoundConfig, RoundPhase, RoundSnapshot, SlotId, SlotRect,
    };

    /// Provides read-only access to the round configuration.
    #[must_use]
    pub fn config(world: &World) -> &RoundConfig {
        &world.config
    }

    /// Current lifecycle phase of the round.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world.phase
    }

    /// Round time elapsed so far.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Round time left on the clock.
    #[must_use]
    pub fn remaining(world: &World) -> Duration {
        world.remaining()
    }

    /// Door rectangles indexed by slot.
    #[must_use]
    pub fn slot_rects(world: &World) -> &[SlotRect] {
        world.layout.rects()
    }

    /// Door rectangle of a single slot.
    #[must_use]
    pub fn slot_rect(world: &World, slot: SlotId) -> Option<SlotRect> {
        world.layout.rect(slot)
    }

    /// Captures the live pops in spawn order, oldest first.
    #[must_use]
    pub fn pops(world: &World) -> Vec<PopSnapshot> {
        world.pops.iter().map(|pop| pop.snapshot()).collect()
    }

    /// Number of pops currently visible.
    #[must_use]
    pub fn live_pop_count(world: &World) -> usize {
        world.pops.len()
    }

    /// Enumerates the slots without a pop, in slot order.
    #[must_use]
    pub fn free_slots(world: &World) -> Vec<SlotId> {
        world
            .layout
            .slot_ids()
            .filter(|slot| !world.pops.is_occupied(*slot))
            .collect()
    }

    /// Captures the round counters for presentation.
    #[must_use]
    pub fn round_snapshot(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            phase: world.phase,
            score: world.scoreboard.score(),
            best_score: world.best_score,
            strikes: world.scoreboard.strikes(),
            strike_limit: world.scoreboard.strike_limit(),
            streak: world.scoreboard.streak(),
            goal: world.scoreboard.goal(),
            elapsed: world.elapsed,
            remaining: world.remaining(),
            target_appearances: world.target_appearances,
            sound_enabled: world.sound_enabled,
        }
    }
}
