//! Load tests for taxi_core: validate throughput on long, busy runs.

use std::time::Instant;

use taxi_core::config::StandConfig;
use taxi_core::simulation::TaxiStandSimulation;

#[test]
#[ignore] // Only run explicitly: cargo test --package taxi_core --test load_tests -- --ignored
fn test_sustained_load() {
    let config = StandConfig::default()
        .with_seed(42)
        .with_fleet(20, 4)
        .with_end_time(200_000);
    let simulation = TaxiStandSimulation::new(config).expect("valid config");

    let start = Instant::now();
    let report = simulation.run().expect("run without faults");
    let duration = start.elapsed();

    let events_per_sec = report.steps as f64 / duration.as_secs_f64();
    println!(
        "Sustained load test: {} events in {:.2}s ({:.0} events/sec)",
        report.steps,
        duration.as_secs_f64(),
        events_per_sec
    );

    assert!(
        events_per_sec > 1000.0,
        "Should process >1000 events/sec, got {:.0}",
        events_per_sec
    );
}

#[test]
#[ignore]
fn test_undersized_fleet_backlog() {
    // One vehicle against the default arrival rate: the queues grow for the whole run.
    let config = StandConfig::default()
        .with_seed(42)
        .with_fleet(1, 4)
        .with_end_time(50_000);

    let start = Instant::now();
    let report = TaxiStandSimulation::new(config)
        .expect("valid config")
        .run()
        .expect("run without faults");
    let duration = start.elapsed();

    println!(
        "Backlog test: {} events, {} passengers left waiting, {:.2}s",
        report.steps,
        report.passengers_waiting,
        duration.as_secs_f64()
    );
    assert!(report.passengers_waiting > 0);
    assert_eq!(report.peak_vehicles_in_use, 1);
}
