#![allow(dead_code)]

use bevy_ecs::prelude::World;
use taxi_core::clock::SimTime;
use taxi_core::config::{AcquisitionPolicy, NeighborhoodConfig, StandConfig};
use taxi_core::random::{ScriptedRandom, SimRng};
use taxi_core::runner::initialize_simulation;
use taxi_core::scenario::build_stand;

/// Builder for reproducible stand worlds used in integration tests.
#[derive(Debug, Clone)]
pub struct TestStandBuilder {
    config: StandConfig,
    script: Option<Vec<u64>>,
}

impl Default for TestStandBuilder {
    fn default() -> Self {
        Self {
            config: StandConfig::default().with_seed(42),
            script: None,
        }
    }
}

impl TestStandBuilder {
    /// Create a new builder with the default three-neighborhood stand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single neighborhood "B" at base distance 3.0.
    pub fn single_lane(mut self) -> Self {
        self.config = self
            .config
            .with_neighborhoods(vec![NeighborhoodConfig::new("B", 3.0)]);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    pub fn with_fleet(mut self, vehicles: usize, seats: usize) -> Self {
        self.config = self.config.with_fleet(vehicles, seats);
        self
    }

    pub fn with_batch_size(mut self, min: u64, max: u64) -> Self {
        self.config = self.config.with_batch_size(min, max);
        self
    }

    pub fn with_arrival_interval(mut self, min: u64, max: u64) -> Self {
        self.config = self.config.with_arrival_interval(min, max);
        self
    }

    pub fn with_end_time(mut self, end_time: SimTime) -> Self {
        self.config = self.config.with_end_time(end_time);
        self
    }

    pub fn with_policy(mut self, policy: AcquisitionPolicy) -> Self {
        self.config = self.config.with_policy(policy);
        self
    }

    /// Replace the seeded source with a fixed script of draws.
    pub fn with_script(mut self, script: Vec<u64>) -> Self {
        self.script = Some(script);
        self
    }

    pub fn config(&self) -> &StandConfig {
        &self.config
    }

    /// Build the world with SimulationStarted already scheduled.
    pub fn build(self) -> World {
        let mut world = World::new();
        build_stand(&mut world, &self.config).expect("valid test config");
        if let Some(script) = self.script {
            world.insert_resource(SimRng(Box::new(ScriptedRandom::new(script))));
        }
        initialize_simulation(&mut world);
        world
    }
}
