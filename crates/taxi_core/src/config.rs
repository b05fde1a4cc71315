//! Run configuration for a taxi stand.
//!
//! Defaults reproduce the reference run: three neighborhoods, five four-seat
//! vehicles, arrivals every 1-5 units, 120 units of simulated time.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::error::{SimError, SimResult};

/// Inclusive integer range used for every random draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u64,
    pub max: u64,
}

impl Bounds {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    fn check(&self, what: &str, floor: u64) -> SimResult<()> {
        if self.min < floor {
            return Err(SimError::invalid_config(format!(
                "{what} lower bound {} must be at least {floor}",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(SimError::invalid_config(format!(
                "{what} bounds {}..={} are inverted",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodConfig {
    pub name: String,
    pub base_distance: f64,
}

impl NeighborhoodConfig {
    pub fn new(name: impl Into<String>, base_distance: f64) -> Self {
        Self {
            name: name.into(),
            base_distance,
        }
    }
}

/// How a passenger actor asks for a vehicle slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionPolicy {
    /// Every passenger requests a slot on arrival and gives it back if its
    /// queue is not full once granted.
    #[default]
    Eager,
    /// Only a passenger whose arrival fills its queue requests a slot.
    Gated,
}

/// Simulation end time. The runner stops before the first event past it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTime(pub SimTime);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct StandConfig {
    pub neighborhoods: Vec<NeighborhoodConfig>,
    pub fleet_size: usize,
    pub seat_capacity: usize,
    /// Units between two arrival ticks.
    pub arrival_interval: Bounds,
    /// Passengers admitted per arrival tick.
    pub batch_size: Bounds,
    /// Trip speed, distance units per 60 time units.
    pub speed: Bounds,
    pub end_time: SimTime,
    pub seed: u64,
    pub policy: AcquisitionPolicy,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            neighborhoods: vec![
                NeighborhoodConfig::new("A", 1.0),
                NeighborhoodConfig::new("B", 3.0),
                NeighborhoodConfig::new("C", 2.0),
            ],
            fleet_size: 5,
            seat_capacity: 4,
            arrival_interval: Bounds::new(1, 5),
            batch_size: Bounds::new(1, 3),
            speed: Bounds::new(15, 25),
            end_time: 120,
            seed: 333,
            policy: AcquisitionPolicy::Eager,
        }
    }
}

impl StandConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_end_time(mut self, end_time: SimTime) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_fleet(mut self, fleet_size: usize, seat_capacity: usize) -> Self {
        self.fleet_size = fleet_size;
        self.seat_capacity = seat_capacity;
        self
    }

    pub fn with_neighborhoods(mut self, neighborhoods: Vec<NeighborhoodConfig>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    pub fn with_arrival_interval(mut self, min: u64, max: u64) -> Self {
        self.arrival_interval = Bounds::new(min, max);
        self
    }

    pub fn with_batch_size(mut self, min: u64, max: u64) -> Self {
        self.batch_size = Bounds::new(min, max);
        self
    }

    pub fn with_speed(mut self, min: u64, max: u64) -> Self {
        self.speed = Bounds::new(min, max);
        self
    }

    pub fn with_policy(mut self, policy: AcquisitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject anything that would make the run meaningless. Nothing is clamped.
    pub fn validate(&self) -> SimResult<()> {
        if self.neighborhoods.is_empty() {
            return Err(SimError::invalid_config(
                "at least one neighborhood is required",
            ));
        }
        for (i, n) in self.neighborhoods.iter().enumerate() {
            if n.name.is_empty() {
                return Err(SimError::invalid_config(format!(
                    "neighborhood #{i} has an empty name"
                )));
            }
            if !(n.base_distance.is_finite() && n.base_distance > 0.0) {
                return Err(SimError::invalid_config(format!(
                    "neighborhood {} has non-positive base distance {}",
                    n.name, n.base_distance
                )));
            }
            if self.neighborhoods[..i].iter().any(|m| m.name == n.name) {
                return Err(SimError::invalid_config(format!(
                    "neighborhood {} is listed twice",
                    n.name
                )));
            }
        }
        if self.fleet_size == 0 {
            return Err(SimError::invalid_config("fleet_size must be positive"));
        }
        if self.seat_capacity == 0 {
            return Err(SimError::invalid_config("seat_capacity must be positive"));
        }
        self.arrival_interval.check("arrival_interval", 1)?;
        self.batch_size.check("batch_size", 1)?;
        self.speed.check("speed", 1)?;
        Ok(())
    }
}
