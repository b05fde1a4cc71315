//! Parallel experimentation framework for taxi stand seed sweeps.
//!
//! Runs the same stand configuration under many seeds (and optionally several
//! fleet sizes and acquisition policies), extracts per-run metrics and exports
//! them for analysis.
//!
//! # Quick Start
//!
//! ```no_run
//! use taxi_core::config::StandConfig;
//! use taxi_experiments::{export_to_csv, run_parallel_experiments, SeedSweep};
//!
//! let parameter_sets = SeedSweep::new(StandConfig::default())
//!     .runs(100)
//!     .fleet_sizes(vec![3, 5, 8])
//!     .generate();
//!
//! let results = run_parallel_experiments(parameter_sets.clone(), None).unwrap();
//! export_to_csv(&results, &parameter_sets, "sweep.csv").unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Seed sweeps over a base configuration
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Metrics extraction from run reports
//! - [`export`]: Result export to JSON/CSV

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_to_csv, export_to_json};
pub use metrics::{extract_metrics, SimulationResult};
pub use parameters::{ParameterSet, SeedSweep};
pub use runner::{run_parallel_experiments, run_single_simulation, ExperimentError};
