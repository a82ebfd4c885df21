//! gen-adapter CLI - drive the generator adapter from a JSON run configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use generator_adapter_core_rs::{
    AdapterConfig, BeamConfig, CoulombConfig, CrossSectionSummary, GeneratorAdapter,
    ProcessSelection, SamplerStats, ToyGenerator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "gen-adapter")]
#[command(version)]
#[command(about = "Configure, initialize and sample the soft-QCD event generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample events and print a JSON summary
    Run {
        /// Path to the JSON run configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Number of events to request
        #[arg(short = 'n', long, default_value = "1000")]
        events: u64,

        /// Write the summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a run configuration without initializing and list what changed
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Show example run configuration
    Example,
}

/// Per-process tally of accepted events.
#[derive(Debug, Default, Serialize)]
struct ProcessTally {
    events: u64,
    mean_t: f64,
    mean_xi: f64,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    run_id: String,
    settings_fingerprint: String,
    stats: SamplerStats,
    cross_sections: CrossSectionSummary,
    processes: BTreeMap<i32, ProcessTally>,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn example_config() -> AdapterConfig {
    let mut config = AdapterConfig::for_beam(BeamConfig {
        frame_type: 2,
        id_a: 2212,
        id_b: 2212,
        e_a: 6500.0,
        e_b: 6500.0,
    });
    config.processes = ProcessSelection::all();
    config.coulomb = Some(CoulombConfig {
        enabled: true,
        t_abs_min: 5e-5,
    });
    config.seed = Some(12345);
    config
}

fn load_config(path: &Path) -> Result<AdapterConfig> {
    AdapterConfig::from_json_file(path)
        .with_context(|| format!("Failed to load run configuration from {:?}", path))
}

fn run(config: &AdapterConfig, events: u64) -> Result<RunSummary> {
    let mut adapter = GeneratorAdapter::new(ToyGenerator::new());
    config
        .apply_to(&mut adapter)
        .context("Failed to apply run configuration")?;
    adapter.initialize().context("Generator initialization failed")?;

    let mut processes: BTreeMap<i32, ProcessTally> = BTreeMap::new();
    for _ in 0..events {
        let event = adapter.sample_event()?;
        if !event.status {
            continue;
        }
        let tally = processes.entry(event.process_code).or_default();
        tally.events += 1;
        tally.mean_t += event.t;
        tally.mean_xi += event.xi;
    }
    for tally in processes.values_mut() {
        tally.mean_t /= tally.events as f64;
        tally.mean_xi /= tally.events as f64;
    }

    let stats = adapter.stats();
    if stats.failed() > 0 {
        warn!(failed = stats.failed(), "some event requests produced no event");
    }
    info!(accepted = stats.accepted, attempted = stats.attempted, "run complete");

    Ok(RunSummary {
        run_id: adapter.run_id().to_string(),
        settings_fingerprint: adapter.registry().fingerprint(),
        stats,
        cross_sections: adapter.cross_sections()?,
        processes,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Example => {
            println!("{}", example_config().to_json_pretty()?);
        }

        Commands::Validate { config } => {
            let config = load_config(&config)?;
            let mut adapter =
                GeneratorAdapter::new(ToyGenerator::new()).with_snapshot_path(None);
            config
                .apply_to(&mut adapter)
                .context("Run configuration rejected")?;

            print!("{}", adapter.registry().snapshot_text());
            info!(fingerprint = %adapter.registry().fingerprint(), "run configuration is valid");
        }

        Commands::Run {
            config,
            events,
            output,
        } => {
            let config = load_config(&config)?;
            let summary = run(&config, events)?;
            let json = serde_json::to_string_pretty(&summary)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write summary to {:?}", path))?;
                    info!(path = %path.display(), "summary written");
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
