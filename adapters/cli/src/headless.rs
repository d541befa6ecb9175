use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::Result as AnyResult;
use bertha_knockout_core::TickSource;
use bertha_knockout_rendering::{
    FrameInput, Hud, Overlay, Presentation, RenderingBackend, Scene,
};
use log::{debug, info, warn};

use crate::player::AutoPlayer;

/// Tick source measuring real time between calls.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WallClock {
    last: Instant,
}

impl WallClock {
    /// Starts measuring from now.
    pub(crate) fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl TickSource for WallClock {
    fn next_dt(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt
    }
}

/// Backend that runs rounds without a window, driven by a scripted player.
#[derive(Debug)]
pub(crate) struct HeadlessBackend<T> {
    ticks: T,
    pace: Option<Duration>,
    max_frames: u64,
    player: AutoPlayer,
}

impl<T: TickSource> HeadlessBackend<T> {
    /// Creates a backend that stops after `max_frames` frames at the latest.
    pub(crate) fn new(ticks: T, max_frames: u64, player: AutoPlayer) -> Self {
        Self {
            ticks,
            pace: None,
            max_frames,
            player,
        }
    }

    /// Sleeps `frame` between frames so the round plays out in real time.
    pub(crate) fn paced(mut self, frame: Duration) -> Self {
        self.pace = Some(frame);
        self
    }
}

impl<T: TickSource> RenderingBackend for HeadlessBackend<T> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            canvas,
            mut scene,
            ..
        } = presentation;
        info!(
            "{window_title}: {} doors on a {}x{} canvas",
            scene.doors.len(),
            canvas.width(),
            canvas.height()
        );

        let mut frames = 0;
        let mut decided = false;
        let mut last_hud = scene.hud;
        while !decided && frames < self.max_frames {
            if let Some(frame) = self.pace {
                thread::sleep(frame);
            }
            let dt = self.ticks.next_dt();
            let input = self.player.plan(&scene, dt);
            update_scene(dt, input, &mut scene);
            frames += 1;

            for cue in &scene.cues {
                debug!("cue {cue:?}");
            }
            log_hud_changes(&last_hud, &scene.hud);
            last_hud = scene.hud;

            decided = matches!(scene.overlay, Some(Overlay::Won | Overlay::Lost));
        }

        if !decided {
            warn!("stopped after {frames} frames");
        }
        println!("{}", summary_line(&scene, frames));
        Ok(())
    }
}

fn log_hud_changes(before: &Hud, after: &Hud) {
    if after.score != before.score {
        info!(
            "score {} / {} (streak {})",
            after.score, after.goal, after.streak
        );
    }
    if after.strikes != before.strikes {
        info!("strikes {} / {}", after.strikes, after.strike_limit);
    }
    if after.seconds_left != before.seconds_left {
        debug!("{}s left", after.seconds_left);
    }
}

/// One-line account of how the session ended.
pub(crate) fn summary_line(scene: &Scene, frames: u64) -> String {
    let hud = &scene.hud;
    let verdict = match scene.overlay {
        Some(overlay @ (Overlay::Won | Overlay::Lost)) => {
            format!("{} {}", overlay.headline(), overlay.message())
        }
        _ => "Round unfinished.".to_owned(),
    };
    format!(
        "{verdict} score {}/{}, strikes {}/{}, best {}, {} frames",
        hud.score, hud.goal, hud.strikes, hud.strike_limit, hud.best, frames
    )
}
