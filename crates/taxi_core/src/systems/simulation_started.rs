use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::config::StandConfig;
use crate::error::SimResult;
use crate::random::SimRng;

/// Starts the arrival generator: its first tick comes after one random interval.
pub fn simulation_started_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    config: Res<StandConfig>,
) -> SimResult<()> {
    if event.0.kind != EventKind::SimulationStarted {
        return Ok(());
    }
    schedule_next_tick(&mut clock, &mut rng, &config)
}

/// Suspend the arrival generator for a uniformly random interval.
pub(crate) fn schedule_next_tick(
    clock: &mut SimulationClock,
    rng: &mut SimRng,
    config: &StandConfig,
) -> SimResult<()> {
    let interval = rng.uniform(config.arrival_interval.min, config.arrival_interval.max);
    clock.timeout(interval as i64, EventKind::ArrivalTick, None)?;
    Ok(())
}
