//! Metrics extraction from finished runs.
//!
//! Turns a [RunReport] into flat numbers: passenger flow, waiting times at the
//! stand, trip durations and how busy the fleet was.

use taxi_core::simulation::RunReport;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SimulationResult {
    /// Passengers admitted by the arrival generator.
    pub passengers_arrived: u64,
    /// Passengers dropped off at their destination.
    pub passengers_delivered: u64,
    /// Passengers still queued at the stand at the horizon.
    pub passengers_waiting: usize,
    /// Trips whose vehicle made it back before the horizon.
    pub completed_trips: usize,
    pub dispatches: u64,
    /// Slot grants handed straight back because the queue was short.
    pub slots_released_unused: u64,
    /// Average time a dispatched passenger spent at the stand.
    pub avg_wait: f64,
    pub median_wait: f64,
    pub p90_wait: f64,
    /// Average time from dispatch to the vehicle's return.
    pub avg_trip_duration: f64,
    /// Share of fleet time up to the end time spent on completed trips.
    pub vehicle_utilization: f64,
    pub peak_vehicles_in_use: usize,
    pub peak_slot_waiters: usize,
    pub final_time: u64,
}

impl SimulationResult {
    /// Calculate statistics from a vector of values.
    fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) as f64 / 2.0
        } else {
            sorted[sorted.len() / 2] as f64
        };
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)] as f64;

        (avg, median, p90)
    }
}

/// Extract metrics from a finished run.
pub fn extract_metrics(report: &RunReport) -> SimulationResult {
    let waits: Vec<u64> = report
        .trips
        .iter()
        .flat_map(|trip| trip.waits.iter().copied())
        .collect();
    let (avg_wait, median_wait, p90_wait) = SimulationResult::calculate_stats(&waits);

    let durations: Vec<u64> = report.trips.iter().map(|t| t.trip_duration()).collect();
    let (avg_trip_duration, _, _) = SimulationResult::calculate_stats(&durations);

    // The fleet is available for the whole horizon, not just until the last event.
    let fleet_time = report.fleet_size as u64 * report.end_time;
    let vehicle_utilization = if fleet_time > 0 {
        durations.iter().sum::<u64>() as f64 / fleet_time as f64
    } else {
        0.0
    };

    SimulationResult {
        passengers_arrived: report.passengers_arrived,
        passengers_delivered: report.passengers_delivered,
        passengers_waiting: report.passengers_waiting,
        completed_trips: report.trips.len(),
        dispatches: report.dispatches,
        slots_released_unused: report.slots_released_unused,
        avg_wait,
        median_wait,
        p90_wait,
        avg_trip_duration,
        vehicle_utilization,
        peak_vehicles_in_use: report.peak_vehicles_in_use,
        peak_slot_waiters: report.peak_slot_waiters,
        final_time: report.final_time,
    }
}
