//! Round configuration shared by the world and the systems.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for a single round.
///
/// Defaults reproduce the shipped game: a 2×4 grid of 120×180 doors, thirty
/// seconds to collect 100 points from eleven target appearances, three strikes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Number of door rows.
    pub rows: u32,
    /// Number of door columns.
    pub columns: u32,
    /// Margin between the canvas edge and the door grid.
    pub grid_padding: f32,
    /// Width of a single door in screen units.
    pub door_width: f32,
    /// Height of a single door in screen units.
    pub door_height: f32,
    /// Length of the round in milliseconds.
    pub round_duration_ms: u64,
    /// Points awarded for whacking the target.
    pub target_award: u32,
    /// Score that wins the round.
    pub goal: u32,
    /// Strikes that lose the round.
    pub strike_limit: u32,
    /// Strikes charged for whacking a decoy.
    pub strikes_on_wrong_hit: u32,
    /// Strikes charged when the target disappears unhit. Zero disables the penalty.
    pub strikes_on_target_expiry: u32,
    /// Number of times the target appears during a round.
    pub target_appearances: u32,
    /// Hard cap on simultaneously visible pops.
    pub max_live_pops: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 4,
            grid_padding: 40.0,
            door_width: 120.0,
            door_height: 180.0,
            round_duration_ms: 30_000,
            target_award: 10,
            goal: 100,
            strike_limit: 3,
            strikes_on_wrong_hit: 1,
            strikes_on_target_expiry: 1,
            target_appearances: 11,
            max_live_pops: 4,
        }
    }
}

impl RoundConfig {
    /// Length of the round.
    #[must_use]
    pub const fn round_duration(&self) -> Duration {
        Duration::from_millis(self.round_duration_ms)
    }

    /// Number of doors in the grid.
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Checks that the configuration describes a playable round.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.round_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.goal == 0 {
            return Err(ConfigError::ZeroGoal);
        }
        if self.target_award == 0 {
            return Err(ConfigError::ZeroAward);
        }
        if self.strike_limit == 0 {
            return Err(ConfigError::ZeroStrikeLimit);
        }
        if self.max_live_pops == 0 || self.max_live_pops > self.slot_count() {
            return Err(ConfigError::LiveCapOutOfRange {
                cap: self.max_live_pops,
                slots: self.slot_count(),
            });
        }
        if !(self.door_width > 0.0 && self.door_height > 0.0) {
            return Err(ConfigError::DegenerateDoor {
                width: self.door_width,
                height: self.door_height,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration cannot describe a playable round.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The door grid has no rows or no columns.
    #[error("door grid must have at least one row and column (received {rows}x{columns})")]
    EmptyGrid {
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        columns: u32,
    },
    /// The round has no time on the clock.
    #[error("round duration must be positive")]
    ZeroDuration,
    /// The goal is already met before the round starts.
    #[error("goal must be positive")]
    ZeroGoal,
    /// Target hits would never move the score.
    #[error("target award must be positive")]
    ZeroAward,
    /// The round would be lost before it starts.
    #[error("strike limit must be positive")]
    ZeroStrikeLimit,
    /// The live pop cap is zero or larger than the grid.
    #[error("live pop cap {cap} must lie within 1..={slots}")]
    LiveCapOutOfRange {
        /// Configured cap.
        cap: u32,
        /// Doors available in the grid.
        slots: u32,
    },
    /// A door has no area to hit.
    #[error("door size must be positive (received {width}x{height})")]
    DegenerateDoor {
        /// Configured door width.
        width: f32,
        /// Configured door height.
        height: f32,
    },
    /// The decoy cap leaves no room under the live pop cap.
    #[error("decoy cap {decoy_cap} must lie within 1..={live_cap}")]
    DecoyCapOutOfRange {
        /// Configured decoy cap.
        decoy_cap: u32,
        /// Hard cap on live pops.
        live_cap: u32,
    },
    /// No decoy has a positive spawn weight.
    #[error("at least one decoy weight must be positive")]
    NoDecoyWeights,
    /// The decoy roster is larger than a [`crate::DecoyKind`] can index.
    #[error("decoy roster holds {count} entries but at most 256 are supported")]
    DecoyRosterTooLarge {
        /// Number of configured decoy weights.
        count: usize,
    },
    /// Decoys would be attempted continuously.
    #[error("decoy interval must be positive")]
    ZeroDecoyInterval,
    /// Pops would vanish the moment they appear.
    #[error("pop lifetime must be positive")]
    ZeroPopLifetime,
}
