use std::time::Duration;

use anyhow::{ensure, Result as AnyResult};
use bertha_knockout_core::{PopId, ScreenPoint};
use bertha_knockout_rendering::{FrameInput, Overlay, Scene};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Point outside every door, used for swings that hit nothing.
const EMPTY_SPOT: ScreenPoint = ScreenPoint::new(-1.0, -1.0);

/// Scripted player that whacks whatever pops up after a reaction delay.
///
/// Each target gets exactly one swing. The swing lands on the target with
/// probability `accuracy`; otherwise it lands on a visible decoy, or on an
/// empty spot when no decoy is around.
#[derive(Clone, Debug)]
pub(crate) struct AutoPlayer {
    accuracy: f64,
    reaction: Duration,
    rng: ChaCha8Rng,
    clock: Duration,
    tracked: Option<(PopId, Duration)>,
    swung_at: Option<PopId>,
    holding: bool,
}

impl AutoPlayer {
    /// Creates a player; `accuracy` must lie in `0.0..=1.0`.
    pub(crate) fn new(accuracy: f64, reaction: Duration, seed: u64) -> AnyResult<Self> {
        ensure!(
            (0.0..=1.0).contains(&accuracy),
            "accuracy must be between 0 and 1 (received {accuracy})"
        );
        Ok(Self {
            accuracy,
            reaction,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: Duration::ZERO,
            tracked: None,
            swung_at: None,
            holding: false,
        })
    }

    /// Decides the input of the next frame from the scene shown on the previous one.
    pub(crate) fn plan(&mut self, scene: &Scene, dt: Duration) -> FrameInput {
        self.clock += dt;
        let mut input = FrameInput {
            released: self.holding,
            ..FrameInput::default()
        };
        self.holding = false;

        match scene.overlay {
            Some(Overlay::Title) => return self.swing(input, EMPTY_SPOT),
            Some(_) => return input,
            None => {}
        }

        let Some(target) = scene.pops.iter().find(|pop| pop.kind.is_target()) else {
            self.tracked = None;
            return input;
        };
        if self.swung_at == Some(target.id) {
            return input;
        }
        let seen_at = match self.tracked {
            Some((id, seen_at)) if id == target.id => seen_at,
            _ => {
                self.tracked = Some((target.id, self.clock));
                self.clock
            }
        };
        if self.clock - seen_at < self.reaction {
            return input;
        }

        self.swung_at = Some(target.id);
        let aim = if self.rng.gen_bool(self.accuracy) {
            target.door.center()
        } else {
            scene
                .pops
                .iter()
                .find(|pop| !pop.kind.is_target())
                .map_or(EMPTY_SPOT, |decoy| decoy.door.center())
        };
        self.swing(input, aim)
    }

    fn swing(&mut self, mut input: FrameInput, at: ScreenPoint) -> FrameInput {
        input.cursor = Some(Vec2::new(at.x, at.y));
        input.pressed = true;
        self.holding = true;
        input
    }
}
