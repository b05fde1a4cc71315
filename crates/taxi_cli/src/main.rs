//! Command-line front end for the taxi stand simulation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use taxi_core::config::{AcquisitionPolicy, StandConfig};
use taxi_core::simulation::{RunReport, TaxiStandSimulation};
use taxi_experiments::{
    export_to_csv, export_to_json, run_parallel_experiments, ParameterSet, SeedSweep,
    SimulationResult,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "taxi-stand")]
#[command(about = "Discrete-event simulation of a shared taxi stand")]
#[command(version)]
struct Cli {
    /// Enable verbose logging (-v shows every simulation event)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Stand configuration as JSON; missing fields take their defaults
    #[arg(short, long, global = true, env = "TAXI_STAND_CONFIG")]
    config: Option<PathBuf>,

    /// Override the passenger acquisition policy
    #[arg(long, value_enum, global = true)]
    policy: Option<PolicyArg>,

    /// Override the end time of every run
    #[arg(long, global = true)]
    until: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulation and print its event stream
    Run {
        /// Seed for the random source
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run the configuration under many seeds in parallel
    Sweep {
        /// Number of seeds
        #[arg(long, default_value_t = 100)]
        seeds: usize,

        /// First seed; the rest follow consecutively
        #[arg(long, conflicts_with = "sample_seeds")]
        first_seed: Option<u64>,

        /// Draw distinct random seeds from this master seed instead
        #[arg(long, value_name = "MASTER_SEED")]
        sample_seeds: Option<u64>,

        /// Worker threads (default: one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Write per-run metrics to a .csv or .json file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Every arriving passenger requests a vehicle slot
    Eager,
    /// Only the passenger completing a batch requests a slot
    Gated,
}

impl From<PolicyArg> for AcquisitionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Eager => AcquisitionPolicy::Eager,
            PolicyArg::Gated => AcquisitionPolicy::Gated,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.policy, cli.until)?;
    match cli.command {
        Commands::Run { seed, format } => cmd_run(config, seed, format),
        Commands::Sweep {
            seeds,
            first_seed,
            sample_seeds,
            threads,
            output,
        } => {
            let seeds = SeedSelection {
                runs: seeds,
                first_seed,
                sample_from: sample_seeds,
            };
            cmd_sweep(config, seeds, threads, output.as_deref())
        }
    }
}

fn load_config(
    path: Option<&Path>,
    policy: Option<PolicyArg>,
    until: Option<u64>,
) -> Result<StandConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<StandConfig>(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => StandConfig::default(),
    };
    if let Some(policy) = policy {
        config = config.with_policy(policy.into());
    }
    if let Some(until) = until {
        config = config.with_end_time(until);
    }
    config.validate().context("Invalid stand configuration")?;
    Ok(config)
}

/// Run one simulation and print the event stream.
fn cmd_run(config: StandConfig, seed: Option<u64>, format: OutputFormat) -> Result<()> {
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    let report = TaxiStandSimulation::new(config)?
        .run()
        .context("Simulation stopped on a fault")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => print_report(&mut out, &report)?,
    }
    Ok(())
}

fn print_report(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    for event in &report.events {
        writeln!(out, "{event}")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "seed {}: {} arrived, {} delivered, {} still waiting, {} trips completed",
        report.seed,
        report.passengers_arrived,
        report.passengers_delivered,
        report.passengers_waiting,
        report.trips.len()
    )?;
    writeln!(
        out,
        "peak vehicles in use {}/{}, peak slot waiters {}",
        report.peak_vehicles_in_use, report.fleet_size, report.peak_slot_waiters
    )
}

/// Which seeds a sweep runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeedSelection {
    runs: usize,
    first_seed: Option<u64>,
    sample_from: Option<u64>,
}

fn sweep_parameters(config: StandConfig, seeds: SeedSelection) -> Result<Vec<ParameterSet>> {
    if seeds.runs == 0 {
        return Err(anyhow!("--seeds must be at least 1"));
    }
    let mut sweep = SeedSweep::new(config).runs(seeds.runs);
    if let Some(first) = seeds.first_seed {
        sweep = sweep.first_seed(first);
    }
    Ok(match seeds.sample_from {
        Some(master) => sweep.sample_random(master),
        None => sweep.generate(),
    })
}

/// Run a seed sweep and print a summary.
fn cmd_sweep(
    config: StandConfig,
    seeds: SeedSelection,
    threads: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let parameter_sets = sweep_parameters(config, seeds)?;
    info!(runs = parameter_sets.len(), "starting sweep");

    let results = run_parallel_experiments(parameter_sets.clone(), threads)?;
    print_summary(&results);

    if let Some(path) = output {
        let written = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => export_to_csv(&results, &parameter_sets, path),
            _ => export_to_json(&results, path),
        };
        written.map_err(|e| anyhow!("Failed to write {}: {e}", path.display()))?;
        println!("Results written to {}", path.display());
    }
    Ok(())
}

fn print_summary(results: &[SimulationResult]) {
    let runs = results.len() as f64;
    let mean = |f: fn(&SimulationResult) -> f64| results.iter().map(f).sum::<f64>() / runs;
    println!("Runs: {}", results.len());
    println!(
        "Mean passengers delivered: {:.1}",
        mean(|r| r.passengers_delivered as f64)
    );
    println!("Mean wait at the stand: {:.2}", mean(|r| r.avg_wait));
    println!("Mean p90 wait: {:.2}", mean(|r| r.p90_wait));
    println!("Mean trip duration: {:.2}", mean(|r| r.avg_trip_duration));
    println!(
        "Mean vehicle utilization: {:.1}%",
        mean(|r| r.vehicle_utilization) * 100.0
    );
}
