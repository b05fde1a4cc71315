#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use taxi_core::clock::SimTime;
use taxi_core::error::SimResult;
use taxi_core::runner::{run_next_event, run_until, run_until_empty, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> SimResult<bool> {
        run_next_event(world, &mut self.schedule)
    }

    /// Run events with timestamps up to and including `until`.
    pub fn run_until(&mut self, world: &mut World, until: SimTime) -> SimResult<usize> {
        run_until(world, &mut self.schedule, until)
    }

    /// Drive the simulation until the event queue is empty or the end time is reached.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        run_until_empty(world, &mut self.schedule, usize::MAX).expect("run without faults")
    }
}
