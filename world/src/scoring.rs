//! Score, streak and strike bookkeeping for a single round.

use bertha_knockout_core::RoundConfig;

/// Result of awarding a target hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TargetAward {
    pub(crate) award: u32,
    pub(crate) score: u32,
    pub(crate) streak: u32,
    pub(crate) goal_reached: bool,
}

/// Result of charging strikes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StrikeCharge {
    /// Strikes actually added once the total is clamped to the limit.
    pub(crate) amount: u32,
    pub(crate) total: u32,
    pub(crate) limit_reached: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Scoreboard {
    score: u32,
    strikes: u32,
    streak: u32,
    goal: u32,
    award: u32,
    strike_limit: u32,
}

impl Scoreboard {
    pub(crate) fn new(config: &RoundConfig) -> Self {
        Self {
            score: 0,
            strikes: 0,
            streak: 0,
            goal: config.goal,
            award: config.target_award,
            strike_limit: config.strike_limit,
        }
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) const fn strikes(&self) -> u32 {
        self.strikes
    }

    pub(crate) const fn streak(&self) -> u32 {
        self.streak
    }

    pub(crate) const fn goal(&self) -> u32 {
        self.goal
    }

    pub(crate) const fn strike_limit(&self) -> u32 {
        self.strike_limit
    }

    pub(crate) const fn goal_reached(&self) -> bool {
        self.score >= self.goal
    }

    pub(crate) fn award_target(&mut self) -> TargetAward {
        self.score = self.score.saturating_add(self.award);
        self.streak = self.streak.saturating_add(1);
        TargetAward {
            award: self.award,
            score: self.score,
            streak: self.streak,
            goal_reached: self.goal_reached(),
        }
    }

    /// Adds strikes, clamping the total to the limit, and breaks the streak.
    pub(crate) fn charge_strikes(&mut self, amount: u32) -> StrikeCharge {
        let before = self.strikes;
        self.strikes = self.strikes.saturating_add(amount).min(self.strike_limit);
        self.streak = 0;
        StrikeCharge {
            amount: self.strikes - before,
            total: self.strikes,
            limit_reached: self.strikes >= self.strike_limit,
        }
    }

    pub(crate) fn break_streak(&mut self) {
        self.streak = 0;
    }
}
