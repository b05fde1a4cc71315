use std::collections::HashMap;

use proptest::prelude::*;
use taxi_core::config::StandConfig;
use taxi_core::dispatch::{order_by_point, travel_time, TripPlan};
use taxi_core::simulation::TaxiStandSimulation;
use taxi_core::telemetry::StandEvent;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ordered_stops_give_non_negative_legs(
        mut points in prop::collection::vec(1u8..=10, 1..8),
        base in 0.5f64..8.0,
        speed in 1u64..60,
    ) {
        order_by_point(&mut points, |p| *p);
        let distances: Vec<f64> = points.iter().map(|p| base * f64::from(*p) / 5.0).collect();
        let plan = TripPlan::compute(&distances, speed).unwrap();

        prop_assert!(plan.legs.iter().all(|leg| *leg >= 0));
        // Legs telescope back to the last drop-off.
        prop_assert_eq!(plan.legs.iter().sum::<i64>(), plan.last_drop_off() as i64);
        prop_assert_eq!(plan.return_leg, plan.last_drop_off());
        prop_assert_eq!(plan.total_duration(), 2 * plan.last_drop_off());
    }

    #[test]
    fn runs_keep_batches_full_sorted_and_single_lane(
        seed in any::<u64>(),
        fleet in 1usize..4,
        seats in 1usize..5,
    ) {
        let config = StandConfig::default()
            .with_seed(seed)
            .with_fleet(fleet, seats)
            .with_end_time(150);
        let bases: HashMap<String, f64> = config
            .neighborhoods
            .iter()
            .map(|n| (n.name.clone(), n.base_distance))
            .collect();
        let report = TaxiStandSimulation::new(config).unwrap().run().unwrap();

        let mut lane_of = HashMap::new();
        for event in &report.events {
            if let StandEvent::PassengerArrived { passenger, neighborhood, .. } = &event.event {
                lane_of.insert(*passenger, neighborhood.clone());
            }
        }

        for trip in &report.trips {
            prop_assert_eq!(trip.passengers.len(), seats);
            prop_assert!(trip.points.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(trip.passengers.iter().all(|p| lane_of[p] == trip.neighborhood));

            let base = bases[&trip.neighborhood];
            let farthest = trip.points.iter().copied().max().unwrap_or(0);
            let one_way = travel_time(base * f64::from(farthest) / 5.0, trip.speed);
            prop_assert_eq!(trip.trip_duration(), 2 * one_way);
        }

        prop_assert!(report.peak_vehicles_in_use <= fleet);
        prop_assert!(report.passengers_delivered >= (report.trips.len() * seats) as u64);
        prop_assert!(report.passengers_delivered <= report.dispatches * seats as u64);
        prop_assert_eq!(
            report.passengers_arrived,
            report.passengers_waiting as u64 + report.dispatches * seats as u64
        );
    }
}
