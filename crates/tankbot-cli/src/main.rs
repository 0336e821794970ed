//! tankbot - headless driver for the tank bot.
//!
//! - `tankbot simulate` - run a match with the decision trees in control
//! - `tankbot plan` - run a single path query on the configured map

mod config;
mod sim;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use tank_core::Vec2;
use tank_dectree::SharedDecisionTrees;
use tank_nav::GridPlanner;

use config::BotConfig;
use sim::{SimTank, Simulation};

static TREES: SharedDecisionTrees<SimTank> = SharedDecisionTrees::new();

#[derive(Parser)]
#[command(name = "tankbot")]
#[command(about = "Headless tank bot driver", version)]
struct Cli {
    /// Scenario file (YAML); the built-in arena when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a match and print a summary
    Simulate {
        /// Number of ticks (overrides the scenario)
        #[arg(long)]
        ticks: Option<u64>,

        /// Write every decision-tree step to this file as JSON
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Find a path between two points
    Plan {
        /// Start position as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec2,

        /// Goal position as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec2,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if cli.log_json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let config = BotConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Simulate { ticks, trace }) => {
            simulate(&config, ticks.unwrap_or(config.ticks), trace.as_deref())
        }
        Some(Commands::Plan { from, to }) => plan(&config, from, to),
        None => {
            println!("tankbot - headless tank bot driver");
            println!();
            println!("Usage: tankbot <COMMAND>");
            println!();
            println!("Commands:");
            println!("  simulate  Run a match and print a summary");
            println!("  plan      Find a path between two points");
            println!();
            println!("Run 'tankbot --help' for more information.");
            Ok(())
        }
    }
}

fn simulate(config: &BotConfig, ticks: u64, trace_path: Option<&Path>) -> Result<()> {
    let trees = TREES.initialize().context("Failed to build decision trees")?;

    let mut simulation = Simulation::new(trees, config)?;
    if trace_path.is_some() {
        simulation = simulation.with_trace();
    }

    tracing::info!(ticks, dt = config.dt, "Starting simulation");
    let summary = simulation.run(ticks);
    println!("{summary}");

    if let (Some(path), Some(log)) = (trace_path, simulation.trace()) {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), log)
            .with_context(|| format!("Failed to write trace: {}", path.display()))?;
        tracing::info!(events = log.len(), path = %path.display(), "Trace written");
    }

    Ok(())
}

fn plan(config: &BotConfig, from: Vec2, to: Vec2) -> Result<()> {
    let planner = GridPlanner::new(config.world(), &config.nav).context("invalid nav config")?;

    match planner.plan(from, to) {
        Ok(path) => {
            println!(
                "Path: {} waypoints, cost {:.3}, length {:.1}",
                path.points.len(),
                path.cost,
                path.length()
            );
            for p in &path.points {
                println!("  ({:.1}, {:.1})", p.x, p.y);
            }
        }
        Err(err) => println!("No path: {err}"),
    }

    Ok(())
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("bad coordinate `{v}`: {e}"))
    };
    let point = Vec2::new(coord(x)?, coord(y)?);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(format!("coordinates must be finite, got `{s}`"))
    }
}
