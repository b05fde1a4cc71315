//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::World;

use crate::config::{NeighborhoodConfig, StandConfig};
use crate::random::{ScriptedRandom, SimRng};
use crate::runner::initialize_simulation;
use crate::scenario::build_stand;

/// Seed used by tests that only need some reproducible run.
pub const TEST_SEED: u64 = 42;

/// Single-neighborhood stand ("B", base distance 3.0) with one vehicle of
/// `seats` seats and fixed-size batches, so every draw is predictable.
pub fn single_lane_config(seats: usize) -> StandConfig {
    StandConfig::default()
        .with_neighborhoods(vec![NeighborhoodConfig::new("B", 3.0)])
        .with_fleet(1, seats)
        .with_batch_size(seats as u64, seats as u64)
        .with_seed(TEST_SEED)
}

/// Script for one arrival tick at `first_tick` that admits one passenger per
/// entry of `points` into a single-neighborhood stand, parks the next tick at
/// `next_tick`, then draws `speed` for the dispatch.
///
/// # Panics
///
/// Panics if `points` is empty.
pub fn single_tick_script(first_tick: u64, points: &[u8], next_tick: u64, speed: u64) -> Vec<u64> {
    assert!(!points.is_empty(), "a tick admits at least one passenger");
    let mut script = vec![first_tick, points.len() as u64];
    for point in points {
        script.push(0);
        script.push(u64::from(*point));
    }
    script.push(next_tick);
    script.push(speed);
    script
}

/// Create a basic test world: stand built from `config`, random draws taken
/// from `script`, SimulationStarted scheduled.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn create_test_world(config: &StandConfig, script: Vec<u64>) -> World {
    let mut world = World::new();
    build_stand(&mut world, config).expect("test config should be valid");
    world.insert_resource(SimRng(Box::new(ScriptedRandom::new(script))));
    initialize_simulation(&mut world);
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_layout_follows_draw_order() {
        assert_eq!(
            single_tick_script(2, &[10, 2], 500, 20),
            vec![2, 2, 0, 10, 0, 2, 500, 20]
        );
    }

    #[test]
    fn test_world_is_ready_to_run() {
        let world = create_test_world(&single_lane_config(2), vec![]);
        let clock = world.resource::<crate::clock::SimulationClock>();
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.next_event_time(), Some(0));
    }
}
