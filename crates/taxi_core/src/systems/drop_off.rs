use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Passenger, PassengerState, Trip};
use crate::error::{SimError, SimResult};
use crate::stand::TaxiStand;
use crate::telemetry::{EventLog, StandEvent, StandTelemetry};

const KIND: &str = EventKind::DropOff.name();

/// Trip actor reached its next stop: drop the passenger, then drive on or head back.
///
/// The passenger entity is despawned here unless its own slot request is
/// still pending; the grant then finishes it off.
#[allow(clippy::too_many_arguments)]
pub fn drop_off_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    stand: Res<TaxiStand>,
    mut trips: Query<&mut Trip>,
    mut passengers: Query<&mut Passenger>,
    mut log: ResMut<EventLog>,
    mut telemetry: ResMut<StandTelemetry>,
) -> SimResult<()> {
    if event.0.kind != EventKind::DropOff {
        return Ok(());
    }
    let Some(EventSubject::Trip(trip_entity)) = event.0.subject else {
        return Err(unknown("trip subject"));
    };
    let now = clock.now();
    let mut trip = trips.get_mut(trip_entity).map_err(|_| unknown("trip"))?;
    let rider = *trip
        .passengers
        .get(trip.next_stop)
        .ok_or_else(|| unknown("stop"))?;
    let mut passenger = passengers
        .get_mut(rider.entity)
        .map_err(|_| unknown("passenger"))?;
    if passenger.awaiting_slot {
        passenger.state = PassengerState::Delivered;
    } else {
        commands.entity(rider.entity).despawn();
    }
    telemetry.passengers_delivered += 1;
    log.record(
        now,
        StandEvent::PassengerDroppedOff {
            passenger: rider.id,
            vehicle: trip.vehicle_id,
            neighborhood: stand.neighborhood(trip.neighborhood)?.name.clone(),
            point: rider.point,
        },
    );

    trip.next_stop += 1;
    let subject = Some(EventSubject::Trip(trip_entity));
    if trip.is_unloaded() {
        log.record(
            now,
            StandEvent::VehicleReturning {
                vehicle: trip.vehicle_id,
            },
        );
        clock.timeout(trip.plan.return_leg as i64, EventKind::VehicleReturned, subject)?;
    } else {
        clock.timeout(trip.plan.legs[trip.next_stop], EventKind::DropOff, subject)?;
    }
    Ok(())
}

fn unknown(what: &'static str) -> SimError {
    SimError::UnknownActor { kind: KIND, what }
}
