#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round controller wiring the world and the systems into a playable game.
//!
//! [`Simulation`] owns the authoritative [`World`] together with the spawning,
//! feedback and best score systems. Adapters drive it with pointer presses,
//! key actions and frame deltas, and read back a [`Scene`] to present.

use std::time::Duration;

use bertha_knockout_core::{
    Command, ConfigError, Event, RoundConfig, RoundPhase, RoundSnapshot, ScreenPoint, TickSource,
};
use bertha_knockout_rendering::{
    CursorIndicator, FrameInput, Hud, KeyAction, Overlay, PopPresentation, Scene,
};
use bertha_knockout_system_best_score::{BestScore, ScoreStore};
use bertha_knockout_system_feedback::{Feedback, FeedbackFrame};
use bertha_knockout_system_spawning::{self as spawning, SeededRandom, SpawnView, Spawning};
use bertha_knockout_world::{self as world, query, World};
use log::{info, trace};
use serde::{Deserialize, Serialize};

/// Longest frame delta the round clock accepts; longer frames are clamped.
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(25);

/// Everything needed to build a [`Simulation`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for every random draw made during the session.
    pub seed: u64,
    /// Shape of each round.
    pub round: RoundConfig,
    /// Spawning cadence and decoy roster.
    pub spawning: spawning::Config,
}

impl SimulationConfig {
    /// Validates the round and spawning sections against each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.round.validate()?;
        self.spawning.validate(&self.round)
    }
}

/// Single game session: one world, its systems and the best score store.
#[derive(Debug)]
pub struct Simulation<S> {
    world: World,
    spawning: Spawning<SeededRandom>,
    feedback: Feedback,
    best_score: BestScore<S>,
    cursor: CursorIndicator,
    frame: FeedbackFrame,
    events: Vec<Event>,
}

impl<S: ScoreStore> Simulation<S> {
    /// Builds a session and restores the best score from `store`.
    pub fn new(config: SimulationConfig, store: S) -> Result<Self, ConfigError> {
        let SimulationConfig {
            seed,
            round,
            spawning,
        } = config;
        let spawning = Spawning::new(spawning, &round, SeededRandom::from_seed(seed))?;
        let world = World::with_config(round)?;
        let feedback = Feedback::new(query::round_snapshot(&world).sound_enabled);
        let mut simulation = Self {
            world,
            spawning,
            feedback,
            best_score: BestScore::new(store),
            cursor: CursorIndicator::default(),
            frame: FeedbackFrame::default(),
            events: Vec::new(),
        };

        let mut commands = Vec::new();
        simulation.best_score.restore(&mut commands);
        simulation.execute(commands);
        Ok(simulation)
    }

    /// Lays the doors out over a canvas of the provided size.
    pub fn configure_canvas(&mut self, width: f32, height: f32) {
        self.execute(vec![Command::ConfigureLayout { width, height }]);
    }

    /// Handles a pointer press: starts an idle round, otherwise whacks at `point`.
    pub fn press(&mut self, point: ScreenPoint) {
        let command = if query::phase(&self.world) == RoundPhase::Idle {
            Command::StartRound
        } else {
            Command::Whack { point }
        };
        self.execute(vec![command]);
    }

    /// Applies a keyboard shortcut.
    pub fn key(&mut self, action: KeyAction) {
        let command = match action {
            KeyAction::TogglePause => Command::TogglePause,
            KeyAction::Reset => Command::ResetRound,
            KeyAction::ToggleSound => Command::ToggleSound,
        };
        self.execute(vec![command]);
    }

    /// Advances the round clock by `dt`, clamped to [`MAX_FRAME_STEP`].
    pub fn advance(&mut self, dt: Duration) {
        self.execute(vec![Command::Tick {
            dt: dt.min(MAX_FRAME_STEP),
        }]);
    }

    /// Advances the round clock by the next delta of `ticks`.
    pub fn advance_with<T>(&mut self, ticks: &mut T)
    where
        T: TickSource + ?Sized,
    {
        self.advance(ticks.next_dt());
    }

    /// Forgets the feedback and events gathered since the previous frame.
    pub fn begin_frame(&mut self) {
        self.frame.clear();
        self.events.clear();
    }

    /// Runs one presentation frame: input, clock, then scene refresh.
    pub fn update(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.begin_frame();
        for action in &input.keys {
            self.key(*action);
        }
        if input.pressed {
            match input.cursor_point() {
                Some(point) => self.press(point),
                None => {
                    if query::phase(&self.world) == RoundPhase::Idle {
                        self.execute(vec![Command::StartRound]);
                    }
                }
            }
        }
        self.advance(dt);
        self.cursor.update(dt, &input);
        self.populate_scene(scene);
    }

    /// Writes the current state into `scene`.
    pub fn populate_scene(&self, scene: &mut Scene) {
        let elapsed = query::elapsed(&self.world);
        let snapshot = query::round_snapshot(&self.world);

        scene.doors.clear();
        scene.doors.extend_from_slice(query::slot_rects(&self.world));
        scene.pops = query::pops(&self.world)
            .iter()
            .filter_map(|pop| {
                query::slot_rect(&self.world, pop.slot)
                    .map(|door| PopPresentation::from_snapshot(pop, door, elapsed))
            })
            .collect();
        scene.hud = Hud::from_snapshot(&snapshot);
        scene.overlay = Overlay::for_phase(snapshot.phase);
        scene.cursor = self.cursor;
        scene.effects.clone_from(&self.frame.effects);
        scene.cues.clone_from(&self.frame.cues);
        scene.screen_shake = self.feedback.screen_shake();
    }

    /// Builds a fresh scene from the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::default();
        self.populate_scene(&mut scene);
        scene
    }

    /// Authoritative world of the session.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Round counters at this instant.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        query::round_snapshot(&self.world)
    }

    /// Spawning system driving the session.
    #[must_use]
    pub fn spawning(&self) -> &Spawning<SeededRandom> {
        &self.spawning
    }

    /// Best score system wrapping the store.
    #[must_use]
    pub fn best_score(&self) -> &BestScore<S> {
        &self.best_score
    }

    /// Feedback gathered since the last [`Simulation::begin_frame`].
    #[must_use]
    pub fn frame(&self) -> &FeedbackFrame {
        &self.frame
    }

    /// World events broadcast since the last [`Simulation::begin_frame`].
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn execute(&mut self, mut pending: Vec<Command>) {
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            if events.is_empty() {
                break;
            }

            let free = query::free_slots(&self.world);
            self.spawning.handle(
                &events,
                SpawnView {
                    phase: query::phase(&self.world),
                    elapsed: query::elapsed(&self.world),
                    live_pops: query::live_pop_count(&self.world),
                    free_slots: &free,
                },
                &mut pending,
            );
            self.feedback.handle(&events, &mut self.frame);
            self.best_score.handle(&events);
            for event in &events {
                log_event(event);
            }
            self.events.extend(events);
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::RoundStarted => info!("round started"),
        Event::RoundReset => info!("round reset"),
        Event::RoundEnded { outcome, cause } => info!("round ended: {outcome:?} ({cause:?})"),
        Event::BestScoreImproved { score } => info!("new best score {score}"),
        other => trace!("{other:?}"),
    }
}
