use std::time::Duration;

use bertha_knockout_core::{
    CharacterKind, EndCause, Event, FixedStep, Outcome, RoundConfig, RoundPhase, ScreenPoint,
};
use bertha_knockout_rendering::{FrameInput, KeyAction, Overlay, Scene};
use bertha_knockout_simulation::{Simulation, SimulationConfig};
use bertha_knockout_system_best_score::MemoryStore;
use bertha_knockout_system_feedback::{AudioCue, VisualEffect};
use bertha_knockout_world::query;
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(16);

fn session(seed: u64) -> Simulation<MemoryStore> {
    Simulation::new(
        SimulationConfig {
            seed,
            ..SimulationConfig::default()
        },
        MemoryStore::default(),
    )
    .expect("valid configuration")
}

fn started(seed: u64) -> Simulation<MemoryStore> {
    let mut simulation = session(seed);
    simulation.press(ScreenPoint::default());
    assert_eq!(simulation.snapshot().phase, RoundPhase::Running);
    simulation
}

fn visible_target(simulation: &Simulation<MemoryStore>) -> Option<ScreenPoint> {
    simulation
        .scene()
        .pops
        .iter()
        .find(|pop| pop.kind.is_target())
        .map(|pop| pop.door.center())
}

/// Plays until the round ends, whacking every target the frame it appears.
fn play_perfectly(simulation: &mut Simulation<MemoryStore>) -> Vec<Event> {
    let mut ticks = FixedStep::new(FRAME);
    let mut log = Vec::new();
    for _ in 0..3_000 {
        if simulation.snapshot().phase.is_ended() {
            break;
        }
        simulation.begin_frame();
        simulation.advance_with(&mut ticks);
        while simulation.snapshot().phase.is_running() {
            let Some(point) = visible_target(simulation) else {
                break;
            };
            simulation.press(point);
        }
        log.extend_from_slice(simulation.events());
    }
    log
}

#[test]
fn first_press_starts_and_later_presses_whack() {
    let mut simulation = session(1);
    assert_eq!(simulation.scene().overlay, Some(Overlay::Title));

    simulation.press(ScreenPoint::new(-100.0, -100.0));
    assert_eq!(simulation.events(), &[Event::RoundStarted]);

    simulation.begin_frame();
    simulation.press(ScreenPoint::new(-100.0, -100.0));
    assert_eq!(
        simulation.events(),
        &[Event::WhackMissed {
            point: ScreenPoint::new(-100.0, -100.0),
        }]
    );
    assert_eq!(simulation.scene().overlay, None);
}

#[test]
fn perfect_play_wins_on_the_tenth_target() {
    let mut simulation = started(0x5eed);

    let log = play_perfectly(&mut simulation);

    let hits = log
        .iter()
        .filter(|event| matches!(event, Event::TargetHit { .. }))
        .count();
    assert_eq!(hits, 10);
    assert_eq!(
        log.last(),
        Some(&Event::RoundEnded {
            outcome: Outcome::Win,
            cause: EndCause::GoalReached,
        })
    );
    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.score, 100);
    assert_eq!(snapshot.strikes, 0);
    assert_eq!(simulation.best_score().store().score(), Some(100));
    assert_eq!(simulation.scene().overlay, Some(Overlay::Won));
}

#[test]
fn equal_seeds_replay_identically() {
    let mut first = started(99);
    let mut second = started(99);

    let first_log = play_perfectly(&mut first);
    let second_log = play_perfectly(&mut second);

    assert_eq!(first_log, second_log);
    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn idle_player_loses_to_missed_targets() {
    let mut simulation = started(3);
    let mut ticks = FixedStep::new(FRAME);

    for _ in 0..3_000 {
        if simulation.snapshot().phase.is_ended() {
            break;
        }
        simulation.advance_with(&mut ticks);
    }

    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.phase, RoundPhase::Ended(Outcome::Loss));
    assert_eq!(snapshot.strikes, snapshot.strike_limit);
    assert_eq!(snapshot.score, 0);
}

#[test]
fn paused_sessions_freeze_time_and_spawns() {
    let mut simulation = started(5);
    for _ in 0..100 {
        simulation.advance(FRAME);
    }
    simulation.key(KeyAction::TogglePause);
    let before = simulation.snapshot();
    let pops = query::pops(simulation.world());

    simulation.begin_frame();
    for _ in 0..500 {
        simulation.advance(FRAME);
    }
    if let Some(pop) = pops.first() {
        let center = query::slot_rect(simulation.world(), pop.slot)
            .expect("slot exists")
            .center();
        simulation.press(center);
    }

    assert!(simulation.events().is_empty());
    assert_eq!(simulation.snapshot(), before);
    assert_eq!(query::pops(simulation.world()), pops);
    assert_eq!(simulation.scene().overlay, Some(Overlay::Paused));
}

#[test]
fn reset_returns_to_a_fresh_round_but_keeps_best_and_sound() {
    let mut simulation = started(11);
    let _ = play_perfectly(&mut simulation);
    simulation.key(KeyAction::ToggleSound);

    simulation.key(KeyAction::Reset);

    let fresh = session(11).snapshot();
    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.phase, RoundPhase::Idle);
    assert_eq!(snapshot.score, fresh.score);
    assert_eq!(snapshot.strikes, fresh.strikes);
    assert_eq!(snapshot.streak, fresh.streak);
    assert_eq!(snapshot.remaining, fresh.remaining);
    assert_eq!(snapshot.target_appearances, 0);
    assert_eq!(query::live_pop_count(simulation.world()), 0);
    assert_eq!(simulation.spawning().schedule().pending().len(), 11);
    assert_eq!(snapshot.best_score, 100);
    assert!(!snapshot.sound_enabled);
    assert_eq!(simulation.scene().screen_shake, 0.0);
}

#[test]
fn restored_best_score_reaches_the_hud() {
    let simulation = Simulation::new(SimulationConfig::default(), MemoryStore::with_score(70))
        .expect("valid configuration");

    let scene = simulation.scene();

    assert_eq!(scene.hud.best, 70);
    assert_eq!(scene.hud.seconds_left, 30);
    assert_eq!(scene.hud.goal, 100);
    assert_eq!(scene.doors.len(), 8);
}

#[test]
fn update_runs_input_clock_and_feedback_in_one_frame() {
    let mut simulation = session(21);
    let mut scene = Scene::default();

    simulation.update(
        FRAME,
        FrameInput {
            cursor: Some(Vec2::new(5.0, 5.0)),
            pressed: true,
            ..FrameInput::default()
        },
        &mut scene,
    );
    assert_eq!(scene.overlay, None);
    assert_eq!(scene.cursor.position, Vec2::new(5.0, 5.0));
    assert!(scene.cursor.down);

    let mut hit = false;
    for _ in 0..2_000 {
        let input = match scene.pops.iter().find(|pop| pop.kind.is_target()) {
            Some(pop) => FrameInput {
                cursor: Some(Vec2::new(pop.door.center().x, pop.door.center().y)),
                pressed: true,
                ..FrameInput::default()
            },
            None => FrameInput::default(),
        };
        simulation.update(FRAME, input, &mut scene);
        if scene.cues.contains(&AudioCue::TargetHit) {
            hit = true;
            break;
        }
    }

    assert!(hit, "a target should have been whacked");
    assert!(scene
        .effects
        .iter()
        .any(|effect| matches!(effect, VisualEffect::Confetti { .. })));
    assert!(scene.screen_shake > 0.0);
    assert_eq!(scene.hud.score, 10);
}

#[test]
fn muted_sessions_produce_no_cues() {
    let mut simulation = session(8);
    let mut scene = Scene::default();
    simulation.update(
        FRAME,
        FrameInput {
            keys: vec![KeyAction::ToggleSound],
            pressed: true,
            cursor: Some(Vec2::ZERO),
            ..FrameInput::default()
        },
        &mut scene,
    );
    assert!(!scene.hud.sound_enabled);

    for _ in 0..1_000 {
        simulation.update(FRAME, FrameInput::default(), &mut scene);
        assert!(scene.cues.is_empty());
    }
}

#[test]
fn decoy_hits_charge_strikes() {
    let config = SimulationConfig {
        round: RoundConfig {
            strikes_on_target_expiry: 0,
            ..RoundConfig::default()
        },
        ..SimulationConfig::default()
    };
    let mut simulation =
        Simulation::new(config, MemoryStore::default()).expect("valid configuration");
    simulation.press(ScreenPoint::default());

    let mut struck = 0;
    for _ in 0..2_000 {
        if simulation.snapshot().phase.is_ended() {
            break;
        }
        simulation.begin_frame();
        simulation.advance(FRAME);
        let decoy = simulation
            .scene()
            .pops
            .iter()
            .find(|pop| matches!(pop.kind, CharacterKind::Decoy(_)))
            .map(|pop| pop.door.center());
        if let Some(point) = decoy {
            simulation.press(point);
            struck += 1;
        }
    }

    assert_eq!(struck, 3);
    assert_eq!(
        simulation.snapshot().phase,
        RoundPhase::Ended(Outcome::Loss)
    );
}
