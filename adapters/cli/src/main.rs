#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Bertha Knockout rounds headlessly.

mod headless;
mod player;
mod store;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use bertha_knockout_core::{FixedStep, GAME_TITLE};
use bertha_knockout_rendering::{
    CanvasSize, Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use bertha_knockout_simulation::{Simulation, SimulationConfig};
use bertha_knockout_system_best_score::{MemoryStore, ScoreStore};
use bertha_knockout_system_spawning::DecoyPolicy;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use crate::{
    headless::{HeadlessBackend, WallClock},
    player::AutoPlayer,
    store::JsonFileStore,
};

/// Plays a round of Bertha Knockout with a scripted player.
#[derive(Debug, Parser)]
#[command(name = "bertha-knockout", version, about)]
struct Args {
    /// TOML file with `[round]` and `[spawning]` tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for spawning and the scripted player; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Length of one frame in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    frame_ms: u64,

    /// Probability that a swing aimed at the target lands on it.
    #[arg(long, default_value_t = 0.9)]
    accuracy: f64,

    /// Delay before the player reacts to a new target, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 250)]
    reaction_ms: u64,

    /// JSON file holding the best score.
    #[arg(long, value_name = "PATH", default_value = "berthaknockout_best.json")]
    best_score: PathBuf,

    /// Keep the best score in memory only.
    #[arg(long)]
    no_persist: bool,

    /// Decoy gating policy; overrides the config file.
    #[arg(long, value_enum)]
    decoy_policy: Option<PolicyArg>,

    /// Upper bound on the number of frames played.
    #[arg(long, default_value_t = 10_000)]
    max_frames: u64,

    /// Play in real time, measuring frame deltas with the wall clock.
    #[arg(long)]
    realtime: bool,

    /// Canvas width in screen units.
    #[arg(long, default_value_t = 820.0)]
    width: f32,

    /// Canvas height in screen units.
    #[arg(long, default_value_t = 1093.0)]
    height: f32,
}

/// Decoy policies selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Decoys appear on a fixed interval.
    Interval,
    /// Decoys appear with a per-frame chance.
    Chance,
}

/// Entry point for the Bertha Knockout command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let seed = config.seed;
    let store: Box<dyn ScoreStore> = if args.no_persist {
        Box::new(MemoryStore::default())
    } else {
        info!("best score file {}", args.best_score.display());
        Box::new(JsonFileStore::new(args.best_score.clone()))
    };

    let mut simulation = Simulation::new(config, store).context("invalid game configuration")?;
    simulation.configure_canvas(args.width, args.height);
    let canvas = CanvasSize::new(args.width, args.height).context("invalid canvas size")?;
    let presentation = Presentation::new(
        GAME_TITLE,
        Color::backdrop(),
        canvas,
        simulation.scene(),
    );

    let frame = Duration::from_millis(args.frame_ms);
    let player = AutoPlayer::new(args.accuracy, Duration::from_millis(args.reaction_ms), seed)?;
    let update = move |dt: Duration, input: FrameInput, scene: &mut Scene| {
        simulation.update(dt, input, scene);
    };
    if args.realtime {
        HeadlessBackend::new(WallClock::start(), args.max_frames, player)
            .paced(frame)
            .run(presentation, update)
    } else {
        HeadlessBackend::new(FixedStep::new(frame), args.max_frames, player)
            .run(presentation, update)
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(policy) = args.decoy_policy {
        config.spawning.decoy_policy = match (policy, config.spawning.decoy_policy) {
            (PolicyArg::Interval, current @ DecoyPolicy::Interval { .. }) => current,
            (PolicyArg::Interval, DecoyPolicy::Chance) => DecoyPolicy::Interval { jitter_ms: 0 },
            (PolicyArg::Chance, _) => DecoyPolicy::Chance,
        };
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}
