#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best score persistence system.
//!
//! The world decides when the best score improves; this system only mirrors
//! those improvements into a [`ScoreStore`]. Store failures are logged and
//! swallowed so that persistence can never influence scoring or timing.

use std::io;

use bertha_knockout_core::{Command, Event};
use log::{debug, warn};
use thiserror::Error;

/// Errors reported by best score stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    #[error("best score storage is unavailable")]
    Io(#[from] io::Error),
    /// The stored value could not be interpreted.
    #[error("stored best score is malformed: {reason}")]
    Malformed {
        /// Description of the decoding failure.
        reason: String,
    },
}

/// Persistent home of the best score.
pub trait ScoreStore {
    /// Loads the recorded best score, `None` when nothing was recorded yet.
    fn load(&mut self) -> Result<Option<u32>, StoreError>;

    /// Records a new best score.
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Store that keeps the best score in memory for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    score: Option<u32>,
}

impl MemoryStore {
    /// Creates a store pre-populated with `score`.
    #[must_use]
    pub const fn with_score(score: u32) -> Self {
        Self { score: Some(score) }
    }

    /// Score currently held by the store.
    #[must_use]
    pub const fn score(&self) -> Option<u32> {
        self.score
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.score = Some(score);
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&mut self) -> Result<Option<u32>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

/// System that restores the best score at startup and persists improvements.
#[derive(Debug)]
pub struct BestScore<S> {
    store: S,
    recorded: u32,
}

impl<S: ScoreStore> BestScore<S> {
    /// Wraps the provided store.
    pub fn new(store: S) -> Self {
        Self { store, recorded: 0 }
    }

    /// Highest score known to have reached the store.
    #[must_use]
    pub fn recorded(&self) -> u32 {
        self.recorded
    }

    /// Provides read-only access to the wrapped store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored best score and asks the world to adopt it.
    pub fn restore(&mut self, out: &mut Vec<Command>) {
        match self.store.load() {
            Ok(Some(score)) => {
                debug!("restored best score {score}");
                self.recorded = score;
                out.push(Command::RestoreBestScore { score });
            }
            Ok(None) => {}
            Err(error) => warn!("could not load best score: {error}"),
        }
    }

    /// Persists every best score improvement announced by the world.
    pub fn handle(&mut self, events: &[Event]) {
        let improved = events
            .iter()
            .filter_map(|event| match event {
                Event::BestScoreImproved { score } => Some(*score),
                _ => None,
            })
            .max();

        let Some(score) = improved else {
            return;
        };
        if score <= self.recorded {
            return;
        }
        match self.store.save(score) {
            Ok(()) => self.recorded = score,
            Err(error) => warn!("could not save best score {score}: {error}"),
        }
    }
}
