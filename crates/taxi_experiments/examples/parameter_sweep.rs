//! Example: compare fleet sizes and acquisition policies over many seeds.
//!
//! This example demonstrates how to:
//! 1. Expand one stand configuration into a seed sweep
//! 2. Run the simulations in parallel
//! 3. Summarize waiting times per fleet/policy combination
//! 4. Export results to JSON/CSV

use std::collections::BTreeMap;

use taxi_core::config::{AcquisitionPolicy, StandConfig};
use taxi_experiments::{export_to_csv, export_to_json, run_parallel_experiments, SeedSweep};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting seed sweep experiment...");

    let parameter_sets = SeedSweep::new(StandConfig::default().with_end_time(2_000))
        .first_seed(1)
        .runs(50)
        .fleet_sizes(vec![2, 3, 5, 8])
        .policies(vec![AcquisitionPolicy::Eager, AcquisitionPolicy::Gated])
        .generate();
    println!("Generated {} runs", parameter_sets.len());

    println!("Running simulations in parallel...");
    let results = run_parallel_experiments(parameter_sets.clone(), None)?;
    println!("Completed {} simulations", results.len());

    let mut by_experiment: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (result, set) in results.iter().zip(&parameter_sets) {
        by_experiment
            .entry(set.experiment_id.as_str())
            .or_default()
            .push(result.avg_wait);
    }
    println!("\n=== Average wait at the stand ===");
    for (experiment, waits) in &by_experiment {
        let mean = waits.iter().sum::<f64>() / waits.len() as f64;
        println!("{experiment:>16}: {mean:.2}");
    }

    println!("\nExporting results...");
    export_to_json(&results, "experiment_results.json")?;
    println!("Exported to experiment_results.json");
    export_to_csv(&results, &parameter_sets, "experiment_results.csv")?;
    println!("Exported to experiment_results.csv");

    println!("\nExperiment complete!");

    Ok(())
}
