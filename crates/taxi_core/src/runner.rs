//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule; exactly one actor resumes per step.

use bevy_ecs::prelude::{IntoSystem, Res, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, EventKind, SimTime, SimulationClock};
use crate::config::SimulationEndTime;
use crate::error::SimResult;
use crate::systems::{
    arrivals::arrival_system, drop_off::drop_off_system, record_fault,
    simulation_started::simulation_started_system, slot_granted::slot_granted_system,
    vehicle_returned::vehicle_returned_system, SimFaults,
};

fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_arrival_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ArrivalTick)
        .unwrap_or(false)
}

fn is_slot_granted(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SlotGranted)
        .unwrap_or(false)
}

fn is_drop_off(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DropOff)
        .unwrap_or(false)
}

fn is_vehicle_returned(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleReturned)
        .unwrap_or(false)
}

/// Runs one simulation step.
///
/// Returns `Ok(false)` when the clock is empty or the next event lies past
/// `horizon` (or past [SimulationEndTime] when no horizon is given). A fault
/// raised by a system is returned as the error and leaves the clock at the
/// faulting event.
pub fn step(world: &mut World, schedule: &mut Schedule, horizon: Option<SimTime>) -> SimResult<bool> {
    let stop_at = horizon.or_else(|| world.get_resource::<SimulationEndTime>().map(|e| e.0));
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    match (stop_at, next_ts) {
        (_, None) => return Ok(false),
        (Some(end), Some(ts)) if ts > end => return Ok(false),
        _ => {}
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return Ok(false),
    };
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);

    if let Some(mut faults) = world.get_resource_mut::<SimFaults>() {
        if let Some(err) = faults.0.take() {
            return Err(err);
        }
    }
    Ok(true)
}

/// Runs one simulation step, bounded by [SimulationEndTime] when present.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> SimResult<bool> {
    step(world, schedule, None)
}

/// Resume actors until no event remains at or before `until`.
/// Returns the number of steps executed.
pub fn run_until(world: &mut World, schedule: &mut Schedule, until: SimTime) -> SimResult<usize> {
    let mut steps = 0;
    while step(world, schedule, Some(until))? {
        steps += 1;
    }
    Ok(steps)
}

/// Runs simulation steps until the event queue is empty, the end time is
/// reached, or `max_steps` is hit. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> SimResult<usize> {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the simulation schedule: one system per actor resumption, each
/// guarded by its event kind, plus [apply_deferred] so entities spawned in a
/// step exist before the next one.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        simulation_started_system
            .pipe(record_fault)
            .run_if(is_simulation_started),
        arrival_system.pipe(record_fault).run_if(is_arrival_tick),
        slot_granted_system.pipe(record_fault).run_if(is_slot_granted),
        drop_off_system.pipe(record_fault).run_if(is_drop_off),
        vehicle_returned_system
            .pipe(record_fault)
            .run_if(is_vehicle_returned),
        apply_deferred,
    ));
    schedule
}

/// Schedules the SimulationStarted event at time 0.
/// Call this after [crate::scenario::build_stand] and before running events.
pub fn initialize_simulation(world: &mut World) {
    world
        .resource_mut::<SimulationClock>()
        .schedule_now(EventKind::SimulationStarted, None);
}
