use crate::metrics::SimulationResult;
use crate::parameters::{policy_name, ParameterSet};

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "fleet_size",
        "seat_capacity",
        "policy",
        "end_time",
        "passengers_arrived",
        "passengers_delivered",
        "passengers_waiting",
        "completed_trips",
        "dispatches",
        "slots_released_unused",
        "avg_wait",
        "median_wait",
        "p90_wait",
        "avg_trip_duration",
        "vehicle_utilization",
        "peak_vehicles_in_use",
        "peak_slot_waiters",
        "final_time",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let config = &param_set.config;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            config.fleet_size.to_string(),
            config.seat_capacity.to_string(),
            policy_name(config.policy).to_string(),
            config.end_time.to_string(),
            result.passengers_arrived.to_string(),
            result.passengers_delivered.to_string(),
            result.passengers_waiting.to_string(),
            result.completed_trips.to_string(),
            result.dispatches.to_string(),
            result.slots_released_unused.to_string(),
            result.avg_wait.to_string(),
            result.median_wait.to_string(),
            result.p90_wait.to_string(),
            result.avg_trip_duration.to_string(),
            result.vehicle_utilization.to_string(),
            result.peak_vehicles_in_use.to_string(),
            result.peak_slot_waiters.to_string(),
            result.final_time.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
