//! Result export utilities.
//!
//! This module provides functions to export experiment results to JSON and CSV.

use std::path::Path;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to JSON format.
///
/// Creates a JSON file with an array of all results (serialized as JSON objects).
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export simulation results with parameters to CSV format.
///
/// One row per run: the run's parameters followed by all metrics.
/// Parameters and results are paired by index (results[i] corresponds to parameter_sets[i]).
///
/// # Errors
///
/// Returns an error if file creation or CSV writing fails, or if results and parameter_sets lengths don't match.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}
