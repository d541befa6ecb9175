use std::time::Duration;

use bertha_knockout_core::{CharacterKind, Command, Event, Outcome, RoundConfig, RoundPhase};
use bertha_knockout_system_spawning::{
    Config, DecoyPolicy, Difficulty, SeededRandom, SpawnView, Spawning,
};
use bertha_knockout_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);
const SEED: u64 = 0x4d59_5df4_d0f3_3173;

struct Harness {
    world: World,
    spawning: Spawning<SeededRandom>,
    log: Vec<Event>,
}

impl Harness {
    fn new(round: RoundConfig, config: Config, seed: u64) -> Self {
        let spawning =
            Spawning::new(config, &round, SeededRandom::from_seed(seed)).expect("valid spawning");
        let world = World::with_config(round).expect("valid round");
        Self {
            world,
            spawning,
            log: Vec::new(),
        }
    }

    fn command(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.dispatch(events);
    }

    fn step(&mut self, dt: Duration) {
        self.command(Command::Tick { dt });
    }

    fn dispatch(&mut self, mut events: Vec<Event>) {
        let free = query::free_slots(&self.world);
        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            SpawnView {
                phase: query::phase(&self.world),
                elapsed: query::elapsed(&self.world),
                live_pops: query::live_pop_count(&self.world),
                free_slots: &free,
            },
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.log.extend(events);
    }

    fn run_until_over(&mut self) {
        for _ in 0..4_000 {
            if query::phase(&self.world).is_ended() {
                return;
            }
            self.step(FRAME);
            assert!(
                query::live_pop_count(&self.world)
                    <= query::config(&self.world).max_live_pops as usize
            );
        }
    }

    fn spawned(&self, target: bool) -> usize {
        self.log
            .iter()
            .filter(|event| {
                matches!(event, Event::PopSpawned { kind, .. } if kind.is_target() == target)
            })
            .count()
    }

    fn rejections(&self) -> usize {
        self.log
            .iter()
            .filter(|event| matches!(event, Event::SpawnRejected { .. }))
            .count()
    }
}

fn forgiving_round() -> RoundConfig {
    RoundConfig {
        strikes_on_target_expiry: 0,
        ..RoundConfig::default()
    }
}

#[test]
fn equal_seeds_replay_identical_rounds() {
    let mut first = Harness::new(RoundConfig::default(), Config::default(), SEED);
    let mut second = Harness::new(RoundConfig::default(), Config::default(), SEED);

    first.command(Command::StartRound);
    second.command(Command::StartRound);
    first.run_until_over();
    second.run_until_over();

    assert!(first.spawned(true) > 0);
    assert_eq!(first.log, second.log);
    assert_eq!(
        query::round_snapshot(&first.world),
        query::round_snapshot(&second.world)
    );
}

#[test]
fn spawns_honour_world_rules_for_a_whole_round() {
    let mut harness = Harness::new(forgiving_round(), Config::default(), SEED);
    harness.command(Command::StartRound);

    harness.run_until_over();

    assert_eq!(harness.rejections(), 0);
    assert!(harness.spawned(false) > 0, "decoys should appear");
    let targets = harness.spawned(true) as u32;
    assert!(targets + harness.spawning.dropped_targets() <= 11);
    assert_eq!(
        query::round_snapshot(&harness.world).target_appearances,
        targets
    );
    assert_eq!(
        query::phase(&harness.world),
        RoundPhase::Ended(Outcome::Loss)
    );
}

#[test]
fn ramped_difficulty_shortens_lifetimes() {
    let config = Config {
        difficulty: Difficulty::classic_ramp(),
        ..Config::default()
    };
    let mut harness = Harness::new(forgiving_round(), config, SEED);
    harness.command(Command::StartRound);

    harness.run_until_over();

    let lifetimes: Vec<Duration> = harness
        .log
        .iter()
        .filter_map(|event| match event {
            Event::PopSpawned { lifetime, .. } => Some(*lifetime),
            _ => None,
        })
        .collect();
    assert!(lifetimes.len() > 2);
    assert!(lifetimes.first() > lifetimes.last());
    assert!(lifetimes
        .iter()
        .all(|lifetime| (550..=1_000).contains(&lifetime.as_millis())));
    assert_eq!(harness.rejections(), 0);
}

#[test]
fn paused_round_spawns_nothing() {
    let mut harness = Harness::new(forgiving_round(), Config::default(), SEED);
    harness.command(Command::StartRound);
    for _ in 0..60 {
        harness.step(FRAME);
    }
    harness.command(Command::TogglePause);
    let before = harness.log.len();

    for _ in 0..300 {
        harness.step(FRAME);
    }

    assert_eq!(harness.log.len(), before);
    assert_eq!(harness.log.last(), Some(&Event::RoundPaused));
}

#[test]
fn reset_regenerates_the_target_schedule() {
    let mut harness = Harness::new(forgiving_round(), Config::default(), SEED);
    let original = harness.spawning.schedule().entries().to_vec();
    harness.command(Command::StartRound);
    for _ in 0..400 {
        harness.step(FRAME);
    }
    assert!(harness.spawning.schedule().pending().len() < original.len());

    harness.command(Command::ResetRound);

    let schedule = harness.spawning.schedule();
    assert_eq!(schedule.pending().len(), 11);
    assert_ne!(schedule.entries(), original.as_slice());
    assert_eq!(harness.spawning.dropped_targets(), 0);
    assert_eq!(query::live_pop_count(&harness.world), 0);
}

#[test]
fn chance_policy_produces_decoys_within_the_cap() {
    let config = Config {
        decoy_policy: DecoyPolicy::Chance,
        decoy_weights: vec![0, 1],
        ..Config::default()
    };
    let mut harness = Harness::new(forgiving_round(), config, SEED ^ 0xffff);
    harness.command(Command::StartRound);

    harness.run_until_over();

    assert_eq!(harness.rejections(), 0);
    assert!(harness.log.iter().any(|event| matches!(
        event,
        Event::PopSpawned {
            kind: CharacterKind::Decoy(decoy),
            ..
        } if decoy.get() == 1
    )));
    assert!(!harness.log.iter().any(|event| matches!(
        event,
        Event::PopSpawned {
            kind: CharacterKind::Decoy(decoy),
            ..
        } if decoy.get() == 0
    )));
}
