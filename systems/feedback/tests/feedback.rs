use std::time::Duration;

use bertha_knockout_core::{CharacterKind, Command, DecoyKind, Event, Outcome, RoundConfig, SlotId};
use bertha_knockout_system_feedback::{AudioCue, Feedback, FeedbackFrame, VisualEffect};
use bertha_knockout_world::{self as world, query, World};

fn drive(world: &mut World, feedback: &mut Feedback, commands: Vec<Command>) -> FeedbackFrame {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    let mut frame = FeedbackFrame::default();
    feedback.handle(&events, &mut frame);
    frame
}

fn spawn(slot: u32, kind: CharacterKind) -> Command {
    Command::SpawnPop {
        slot: SlotId::new(slot),
        kind,
        lifetime: Duration::from_millis(900),
    }
}

fn whack(world: &World, slot: u32) -> Command {
    let point = query::slot_rect(world, SlotId::new(slot))
        .expect("slot exists")
        .center();
    Command::Whack { point }
}

#[test]
fn a_losing_round_sounds_like_one() {
    let mut world = World::with_config(RoundConfig {
        strike_limit: 2,
        ..RoundConfig::default()
    })
    .expect("valid config");
    let mut feedback = Feedback::default();
    let decoy = CharacterKind::Decoy(DecoyKind::new(1));

    let _ = drive(
        &mut world,
        &mut feedback,
        vec![Command::StartRound, spawn(0, decoy), spawn(1, CharacterKind::Target)],
    );
    let wrong = whack(&world, 0);
    let frame = drive(&mut world, &mut feedback, vec![wrong]);
    assert_eq!(frame.cues, vec![AudioCue::WrongHit]);

    let frame = drive(
        &mut world,
        &mut feedback,
        vec![Command::Tick {
            dt: Duration::from_millis(900),
        }],
    );

    assert_eq!(frame.cues, vec![AudioCue::TargetMissed]);
    assert_eq!(
        frame.effects,
        vec![VisualEffect::Celebration {
            outcome: Outcome::Loss,
            particles: 60,
        }]
    );
    assert!(feedback.screen_shake() > 0.0);
}

#[test]
fn muting_through_the_world_silences_hits() {
    let mut world = World::new();
    let mut feedback = Feedback::default();

    let frame = drive(
        &mut world,
        &mut feedback,
        vec![
            Command::ToggleSound,
            Command::StartRound,
            spawn(2, CharacterKind::Target),
        ],
    );
    assert!(frame.is_empty());

    let hit = whack(&world, 2);
    let frame = drive(&mut world, &mut feedback, vec![hit]);

    assert!(frame.cues.is_empty());
    assert!(frame
        .effects
        .iter()
        .any(|effect| matches!(effect, VisualEffect::Confetti { .. })));
    assert_eq!(feedback.sound_enabled(), query::round_snapshot(&world).sound_enabled);
}

#[test]
fn feedback_ignores_rejected_and_missed_whacks() {
    let mut world = World::new();
    let mut feedback = Feedback::default();
    let _ = drive(&mut world, &mut feedback, vec![Command::StartRound]);
    let empty = whack(&world, 5);

    let frame = drive(
        &mut world,
        &mut feedback,
        vec![empty, spawn(99, CharacterKind::Target)],
    );

    assert!(frame.is_empty());
    assert_eq!(feedback.screen_shake(), 0.0);
}

#[test]
fn events_are_processed_in_order() {
    let mut feedback = Feedback::default();
    let mut frame = FeedbackFrame::default();

    feedback.handle(
        &[
            Event::SoundToggled { enabled: false },
            Event::SoundToggled { enabled: true },
        ],
        &mut frame,
    );

    assert_eq!(frame.cues, vec![AudioCue::SoundEnabled]);
}
