use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Trip, Vehicle, VehicleState};
use crate::error::{SimError, SimResult};
use crate::stand::TaxiStand;
use crate::telemetry::{EventLog, StandEvent, StandTelemetry, TripRecord};

const KIND: &str = EventKind::VehicleReturned.name();

/// Trip actor finished the return leg: park the vehicle, free its slot, close the trip.
///
/// Parking and releasing happen together, so a queued passenger granted the
/// slot finds the vehicle already in the free list.
#[allow(clippy::too_many_arguments)]
pub fn vehicle_returned_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut stand: ResMut<TaxiStand>,
    trips: Query<&Trip>,
    mut vehicles: Query<&mut Vehicle>,
    mut log: ResMut<EventLog>,
    mut telemetry: ResMut<StandTelemetry>,
) -> SimResult<()> {
    if event.0.kind != EventKind::VehicleReturned {
        return Ok(());
    }
    let Some(EventSubject::Trip(trip_entity)) = event.0.subject else {
        return Err(unknown("trip subject"));
    };
    let now = clock.now();
    let trip = trips.get(trip_entity).map_err(|_| unknown("trip"))?;

    stand.fleet_mut().check_in(trip.vehicle, &mut clock)?;
    let mut vehicle = vehicles.get_mut(trip.vehicle).map_err(|_| unknown("vehicle"))?;
    vehicle.state = VehicleState::Available;
    vehicle.trips_completed += 1;

    let trip_duration = now.saturating_sub(trip.dispatched_at);
    log.record(
        now,
        StandEvent::VehicleReturned {
            vehicle: vehicle.id,
            trip_duration,
        },
    );

    let riders = &trip.passengers;
    telemetry.completed_trips.push(TripRecord {
        vehicle: vehicle.id,
        neighborhood: stand.neighborhood(trip.neighborhood)?.name.clone(),
        passengers: riders.iter().map(|r| r.id).collect(),
        points: riders.iter().map(|r| r.point).collect(),
        speed: trip.plan.speed,
        dispatched_at: trip.dispatched_at,
        returned_at: now,
        waits: riders
            .iter()
            .map(|r| trip.dispatched_at.saturating_sub(r.arrived_at))
            .collect(),
    });

    commands.entity(trip_entity).despawn();
    Ok(())
}

fn unknown(what: &'static str) -> SimError {
    SimError::UnknownActor { kind: KIND, what }
}
