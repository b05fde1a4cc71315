//! Stand setup: validate the configuration, spawn the fleet and insert every
//! resource the systems read.

use bevy_ecs::prelude::World;
use tracing::debug;

use crate::clock::SimulationClock;
use crate::config::{SimulationEndTime, StandConfig};
use crate::ecs::{Vehicle, VehicleId, VehicleState};
use crate::error::SimResult;
use crate::random::SimRng;
use crate::stand::TaxiStand;
use crate::systems::SimFaults;
use crate::telemetry::{EventLog, StandTelemetry};

/// Populate `world` for one run. The random source is seeded from
/// `config.seed`; replace the [SimRng] resource afterwards to inject another.
pub fn build_stand(world: &mut World, config: &StandConfig) -> SimResult<()> {
    config.validate()?;

    let vehicles = (0..config.fleet_size)
        .map(|i| {
            world
                .spawn(Vehicle {
                    id: i as VehicleId,
                    seat_capacity: config.seat_capacity,
                    state: VehicleState::Available,
                    trips_completed: 0,
                })
                .id()
        })
        .collect();
    let stand = TaxiStand::new(
        &config.neighborhoods,
        vehicles,
        config.seat_capacity,
        config.policy,
    )?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(stand);
    world.insert_resource(config.clone());
    world.insert_resource(SimulationEndTime(config.end_time));
    world.insert_resource(SimRng::seeded(config.seed));
    world.insert_resource(EventLog::default());
    world.insert_resource(StandTelemetry::default());
    world.insert_resource(SimFaults::default());
    debug!(
        fleet = config.fleet_size,
        seats = config.seat_capacity,
        neighborhoods = config.neighborhoods.len(),
        seed = config.seed,
        "stand built"
    );
    Ok(())
}
