//! Parallel simulation execution using rayon.
//!
//! Each parameter set runs in its own [TaxiStandSimulation]; runs share no
//! state, so results depend only on their parameter set.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use taxi_core::error::SimError;
use taxi_core::simulation::TaxiStandSimulation;
use thiserror::Error;
use tracing::debug;

use crate::metrics::{extract_metrics, SimulationResult};
use crate::parameters::ParameterSet;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("run {run_id} (seed {seed}) failed: {source}")]
    Simulation {
        run_id: usize,
        seed: u64,
        #[source]
        source: SimError,
    },
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Run a single simulation to its end time and extract metrics.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, ExperimentError> {
    let report = TaxiStandSimulation::new(param_set.config.clone())
        .and_then(|sim| sim.run())
        .map_err(|source| ExperimentError::Simulation {
            run_id: param_set.run_id,
            seed: param_set.seed,
            source,
        })?;
    debug!(
        run_id = param_set.run_id,
        seed = param_set.seed,
        trips = report.trips.len(),
        "run complete"
    );
    Ok(extract_metrics(&report))
}

/// Run multiple simulations in parallel with a progress bar.
///
/// Results come back in the same order as `parameter_sets`. `num_threads`
/// of `None` uses rayon's default.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
