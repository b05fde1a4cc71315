//! Run the default three-neighborhood stand and print the event stream.
//!
//! Run with: cargo run -p taxi_core --example scenario_run

use taxi_core::config::StandConfig;
use taxi_core::simulation::TaxiStandSimulation;

fn main() {
    const SEED: u64 = 333;
    const END_TIME: u64 = 120;

    let config = StandConfig::default()
        .with_seed(SEED)
        .with_end_time(END_TIME);
    let report = match TaxiStandSimulation::new(config).and_then(|sim| sim.run()) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "--- Taxi stand ({} vehicles, seed {}, until t={}) ---",
        report.fleet_size, SEED, END_TIME
    );
    for event in &report.events {
        println!("{event}");
    }
    println!();
    println!("Steps executed: {}", report.steps);
    println!("Passengers arrived: {}", report.passengers_arrived);
    println!("Passengers delivered: {}", report.passengers_delivered);
    println!("Passengers still waiting: {}", report.passengers_waiting);
    println!("Completed trips: {}", report.trips.len());
    println!("Peak vehicles in use: {}", report.peak_vehicles_in_use);
}
