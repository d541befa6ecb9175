#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bertha Knockout engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Randomness and time enter the engine only through the [`RandomSource`] and
//! [`TickSource`] seams so every round can be replayed from a seed and a step.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, RoundConfig};

/// Canonical title shown on the idle overlay.
pub const GAME_TITLE: &str = "Bertha Knockout";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Lays the door grid out over a canvas of the provided size.
    ConfigureLayout {
        /// Canvas width in screen units.
        width: f32,
        /// Canvas height in screen units.
        height: f32,
    },
    /// Seeds the world with the best score loaded from persistent storage.
    RestoreBestScore {
        /// Best score recorded by a previous session.
        score: u32,
    },
    /// Starts the round if it is idle.
    StartRound,
    /// Flips the round between running and paused.
    TogglePause,
    /// Discards the current round and returns to the idle phase.
    ResetRound,
    /// Flips whether audio cues should be produced.
    ToggleSound,
    /// Advances the round clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a character pops out of the provided slot.
    SpawnPop {
        /// Slot the character should appear in.
        slot: SlotId,
        /// Character that appears.
        kind: CharacterKind,
        /// How long the character stays visible.
        lifetime: Duration,
    },
    /// Resolves a pointer press against the live pops.
    Whack {
        /// Pointer position in screen units.
        point: ScreenPoint,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the door grid was laid out.
    LayoutConfigured {
        /// Number of slots available for pops.
        slot_count: usize,
    },
    /// Announces that the round started running.
    RoundStarted,
    /// Announces that the running round was paused.
    RoundPaused,
    /// Announces that the paused round resumed.
    RoundResumed,
    /// Announces that the round was reset to the idle phase.
    RoundReset,
    /// Announces that audio output was switched on or off.
    SoundToggled {
        /// Whether audio cues are enabled after the toggle.
        enabled: bool,
    },
    /// Indicates that the round clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Total round time elapsed after the tick.
        elapsed: Duration,
        /// Round time remaining after the tick.
        remaining: Duration,
    },
    /// Confirms that a character popped out of a slot.
    PopSpawned {
        /// Identifier assigned to the pop.
        pop: PopId,
        /// Slot the pop occupies.
        slot: SlotId,
        /// Character shown by the pop.
        kind: CharacterKind,
        /// Visible lifetime granted to the pop.
        lifetime: Duration,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Slot named in the request.
        slot: SlotId,
        /// Character named in the request.
        kind: CharacterKind,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Reports that a pop disappeared without being hit.
    PopExpired {
        /// Identifier of the expired pop.
        pop: PopId,
        /// Slot the pop occupied.
        slot: SlotId,
        /// Character shown by the pop.
        kind: CharacterKind,
    },
    /// Confirms that the target was whacked.
    TargetHit {
        /// Identifier of the whacked pop.
        pop: PopId,
        /// Slot the pop occupied.
        slot: SlotId,
        /// Points awarded for the hit.
        award: u32,
        /// Score after the award.
        score: u32,
        /// Streak after the hit.
        streak: u32,
    },
    /// Confirms that a decoy was whacked.
    DecoyHit {
        /// Identifier of the whacked pop.
        pop: PopId,
        /// Slot the pop occupied.
        slot: SlotId,
        /// Decoy that was whacked.
        decoy: DecoyKind,
    },
    /// Reports a press that landed on no live pop.
    WhackMissed {
        /// Pointer position of the press.
        point: ScreenPoint,
    },
    /// Reports that strikes were charged to the player.
    StrikesAdded {
        /// Strikes charged by this penalty, after clamping.
        amount: u32,
        /// Strike total after the penalty.
        total: u32,
        /// What triggered the penalty.
        cause: StrikeCause,
    },
    /// Reports that the session best score was beaten.
    BestScoreImproved {
        /// New best score.
        score: u32,
    },
    /// Announces that the round reached a terminal outcome.
    RoundEnded {
        /// Whether the round was won or lost.
        outcome: Outcome,
        /// Condition that ended the round.
        cause: EndCause,
    },
}

/// Identifier of a door in the grid, counted row-major from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PopId(u32);

impl PopId {
    /// Creates a new pop identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a decoy character within the configured decoy roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecoyKind(u8);

impl DecoyKind {
    /// Creates a decoy kind from its roster index.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the roster index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Character shown by a pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    /// The character that scores points when hit.
    Target,
    /// A character that charges a strike when hit.
    Decoy(DecoyKind),
}

impl CharacterKind {
    /// Reports whether the character is the scoring target.
    #[must_use]
    pub const fn is_target(self) -> bool {
        matches!(self, Self::Target)
    }
}

/// Lifecycle phase of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// The round has not started yet.
    Idle,
    /// The clock is running and pops spawn.
    Running,
    /// The clock is frozen until the round resumes.
    Paused,
    /// The round finished with the provided outcome.
    Ended(Outcome),
}

impl RoundPhase {
    /// Reports whether the round accepts ticks, spawns and whacks.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Reports whether the round reached a terminal outcome.
    #[must_use]
    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

/// Terminal result of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The goal was reached.
    Win,
    /// Strikes or time ran out first.
    Loss,
}

/// Condition that ended a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCause {
    /// The score reached the goal.
    GoalReached,
    /// The strike count reached the limit.
    StrikeLimit,
    /// The round clock ran out.
    TimeExpired,
}

/// Reason a strike was charged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeCause {
    /// A decoy was whacked.
    WrongHit,
    /// The target slipped back behind its door unhit.
    MissedTarget,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The round is not running.
    RoundNotRunning,
    /// The slot does not exist in the current layout.
    UnknownSlot,
    /// Another pop already occupies the slot.
    SlotOccupied,
    /// The live pop cap is reached.
    CapacityReached,
    /// Every target appearance of the round was already used.
    TargetQuotaExhausted,
}

/// Position on the canvas expressed in screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl ScreenPoint {
    /// Creates a new screen point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Door rectangle anchored at its center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotRect {
    center: ScreenPoint,
    width: f32,
    height: f32,
}

impl SlotRect {
    /// Creates a rectangle centered on the provided point.
    #[must_use]
    pub const fn from_center(center: ScreenPoint, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Center of the door.
    #[must_use]
    pub const fn center(&self) -> ScreenPoint {
        self.center
    }

    /// Door width in screen units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Door height in screen units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Upper-left corner of the door.
    #[must_use]
    pub fn top_left(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.height / 2.0,
        )
    }

    /// Reports whether the point lies inside the door, edges included.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        let origin = self.top_left();
        point.x >= origin.x
            && point.x <= origin.x + self.width
            && point.y >= origin.y
            && point.y <= origin.y + self.height
    }
}

/// Immutable representation of a single pop used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopSnapshot {
    /// Identifier assigned to the pop.
    pub id: PopId,
    /// Slot the pop occupies.
    pub slot: SlotId,
    /// Character shown by the pop.
    pub kind: CharacterKind,
    /// Round time at which the pop appeared.
    pub spawned_at: Duration,
    /// Visible lifetime of the pop.
    pub lifetime: Duration,
    /// Whether the pop has been resolved by a whack.
    pub hit: bool,
}

impl PopSnapshot {
    /// Fraction of the lifetime consumed at the provided round time, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.lifetime.is_zero() {
            return 1.0;
        }
        let age = elapsed.saturating_sub(self.spawned_at);
        (age.as_secs_f32() / self.lifetime.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot of the round counters consumed by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    /// Current lifecycle phase.
    pub phase: RoundPhase,
    /// Points earned this round.
    pub score: u32,
    /// Best score across sessions.
    pub best_score: u32,
    /// Strikes charged this round.
    pub strikes: u32,
    /// Strikes that end the round.
    pub strike_limit: u32,
    /// Consecutive target hits since the last strike.
    pub streak: u32,
    /// Score that wins the round.
    pub goal: u32,
    /// Round time elapsed.
    pub elapsed: Duration,
    /// Round time remaining.
    pub remaining: Duration,
    /// Target appearances used so far.
    pub target_appearances: u32,
    /// Whether audio cues are enabled.
    pub sound_enabled: bool,
}

/// Source of uniformly distributed randomness used by systems.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `0.0..1.0`.
    fn next_unit(&mut self) -> f64;

    /// Returns a uniformly distributed index below `len`, or `None` when `len` is zero.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let scaled = (self.next_unit() * len as f64) as usize;
        Some(scaled.min(len - 1))
    }
}

/// Source of frame deltas that drives the round clock.
pub trait TickSource {
    /// Returns the time elapsed since the previous call.
    fn next_dt(&mut self) -> Duration;
}

/// Tick source that always yields the same step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
}

impl FixedStep {
    /// Creates a tick source yielding `step` on every call.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl TickSource for FixedStep {
    fn next_dt(&mut self) -> Duration {
        self.step
    }
}
