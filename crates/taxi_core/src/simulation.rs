//! One-call entry point: build a stand, run it to its end time, collect a report.

use bevy_ecs::prelude::{Schedule, World};
use serde::Serialize;
use tracing::info;

use crate::clock::{SimTime, SimulationClock};
use crate::config::StandConfig;
use crate::error::SimResult;
use crate::random::{RandomSource, SimRng};
use crate::runner::{initialize_simulation, run_next_event, run_until, simulation_schedule};
use crate::scenario::build_stand;
use crate::stand::TaxiStand;
use crate::telemetry::{EventLog, StandTelemetry, TimedEvent, TripRecord};

/// Everything observable about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub end_time: SimTime,
    /// Simulated time of the last processed event.
    pub final_time: SimTime,
    pub steps: usize,
    pub events: Vec<TimedEvent>,
    pub trips: Vec<TripRecord>,
    pub passengers_arrived: u64,
    pub passengers_delivered: u64,
    /// Passengers still queued at the stand when the run ended.
    pub passengers_waiting: usize,
    pub dispatches: u64,
    pub slots_released_unused: u64,
    pub fleet_size: usize,
    pub peak_vehicles_in_use: usize,
    pub peak_slot_waiters: usize,
}

pub struct TaxiStandSimulation {
    world: World,
    schedule: Schedule,
    config: StandConfig,
    steps: usize,
}

impl TaxiStandSimulation {
    pub fn new(config: StandConfig) -> SimResult<Self> {
        let mut world = World::new();
        build_stand(&mut world, &config)?;
        initialize_simulation(&mut world);
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            config,
            steps: 0,
        })
    }

    /// Replace the seeded random source.
    pub fn with_random(mut self, source: impl RandomSource + 'static) -> Self {
        self.world.insert_resource(SimRng(Box::new(source)));
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn now(&self) -> SimTime {
        self.world.resource::<SimulationClock>().now()
    }

    /// Resume the next actor, if any is due before the end time.
    pub fn step(&mut self) -> SimResult<bool> {
        let advanced = run_next_event(&mut self.world, &mut self.schedule)?;
        if advanced {
            self.steps += 1;
        }
        Ok(advanced)
    }

    /// Advance until no event remains at or before `until`.
    pub fn run_until(&mut self, until: SimTime) -> SimResult<usize> {
        let steps = run_until(&mut self.world, &mut self.schedule, until)?;
        self.steps += steps;
        Ok(steps)
    }

    /// Run to the configured end time and report.
    pub fn run(mut self) -> SimResult<RunReport> {
        self.run_until(self.config.end_time)?;
        let report = self.report();
        info!(
            seed = report.seed,
            steps = report.steps,
            trips = report.trips.len(),
            delivered = report.passengers_delivered,
            "run finished"
        );
        Ok(report)
    }

    pub fn report(&self) -> RunReport {
        let stand = self.world.resource::<TaxiStand>();
        let telemetry = self.world.resource::<StandTelemetry>();
        let pool = stand.fleet().pool();
        let passengers_waiting = stand
            .neighborhoods()
            .iter()
            .filter_map(|n| stand.queue(n.id).ok())
            .map(|q| q.len())
            .sum();
        RunReport {
            seed: self.config.seed,
            end_time: self.config.end_time,
            final_time: self.now(),
            steps: self.steps,
            events: self.world.resource::<EventLog>().events.clone(),
            trips: telemetry.completed_trips.clone(),
            passengers_arrived: telemetry.passengers_arrived,
            passengers_delivered: telemetry.passengers_delivered,
            passengers_waiting,
            dispatches: telemetry.dispatches,
            slots_released_unused: telemetry.slots_released_unused,
            fleet_size: pool.capacity(),
            peak_vehicles_in_use: pool.peak_in_use(),
            peak_slot_waiters: pool.peak_waiters(),
        }
    }
}
