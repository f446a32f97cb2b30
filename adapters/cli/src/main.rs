#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that animates a contribution graph being shot down.

mod config;
mod sink;

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use space_shooter_core::ContributionGrid;
use space_shooter_rendering::{FrameSink, Scene};
use space_shooter_system_analytics::RunStats;
use space_shooter_system_animator::{Animation, Animator};
use space_shooter_system_targeting::StrategyKind;
use space_shooter_world::World;
use tracing::{info, warn};

use crate::{config::CliConfig, sink::JsonLinesSink};

/// Animates a GitHub contribution graph being cleared by a space shooter.
#[derive(Debug, Parser)]
#[command(name = "gh-space-shooter", version, about)]
struct Args {
    /// Contribution grid JSON (`{"weeks":[{"days":[{"level":n}]}]}`).
    #[arg(long)]
    grid: PathBuf,

    /// Targeting strategy: column, row or random.
    #[arg(long, default_value_t = StrategyKind::Random)]
    strategy: StrategyKind,

    /// Seed for the random strategy; drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with `[animator]` and `[render]` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Destination for JSON lines output; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// What each output line describes.
    #[arg(long, value_enum, default_value_t = OutputFormat::Snapshots)]
    format: OutputFormat,

    /// Print only the run summary instead of frames.
    #[arg(long)]
    summary_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Raw simulation state per frame.
    Snapshots,
    /// Composed drawing primitives per frame.
    Scenes,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    strategy: &'static str,
    seed: u64,
    frames: usize,
    duration_ms: u64,
    stats: RunStats,
}

/// Entry point for the space shooter command-line interface.
fn main() -> Result<()> {
    init_tracing();
    run(Args::parse())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so stdout stays machine readable.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}

fn run(args: Args) -> Result<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let context = config
        .render
        .context()
        .context("invalid [render] settings")?;
    let grid = load_grid(&args.grid)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    info!(
        grid = %args.grid.display(),
        strategy = %args.strategy,
        seed,
        intensity = grid.total_intensity(),
        "grid loaded"
    );

    let mut world = World::new(&grid);
    let mut strategy = args.strategy.build(&grid, seed);
    let animation = Animator::new(config.animator)
        .run(&mut world, strategy.as_mut())
        .with_context(|| format!("{} strategy did not clear the grid", args.strategy))?;

    if animation.stats.projectiles_expired > 0 {
        warn!(
            expired = animation.stats.projectiles_expired,
            "some projectiles missed every target"
        );
    }

    let summary = summarize(&animation, args.strategy, seed);
    if args.summary_only {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &summary)
            .context("failed to encode summary")?;
        writeln!(handle).context("failed to write summary")?;
        return Ok(());
    }

    let writer = open_output(args.output.as_deref())?;
    let mut sink = JsonLinesSink::new(writer);
    for frame in &animation.frames {
        match args.format {
            OutputFormat::Snapshots => sink.push_snapshot(frame, animation.frame_duration)?,
            OutputFormat::Scenes => {
                sink.push(&Scene::compose(frame, &context), animation.frame_duration)?;
            }
        }
    }
    sink.finish()?;

    info!(
        lines = sink.lines(),
        duration_ms = summary.duration_ms,
        shots = summary.stats.shots_fired,
        "frames written"
    );
    Ok(())
}

fn load_grid(path: &Path) -> Result<ContributionGrid> {
    let file = File::open(path)
        .with_context(|| format!("failed to open grid file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid contribution grid in {}", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn summarize(animation: &Animation, strategy: StrategyKind, seed: u64) -> RunSummary {
    let frames = animation.frames.len();
    let total = animation.frame_duration.as_millis() * frames as u128;
    RunSummary {
        strategy: strategy.as_str(),
        seed,
        frames,
        duration_ms: u64::try_from(total).unwrap_or(u64::MAX),
        stats: animation.stats,
    }
}
