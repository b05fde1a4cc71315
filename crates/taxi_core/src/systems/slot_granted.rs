//! A passenger actor resumes holding a vehicle slot.
//!
//! If its neighborhood queue holds a full batch the actor becomes the
//! dispatcher: it takes the batch, boards a vehicle and starts the trip.
//! Otherwise it gives the slot back and ends.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::StandConfig;
use crate::dispatch::{order_by_point, TripPlan};
use crate::ecs::{Passenger, PassengerState, Rider, Trip, Vehicle, VehicleState};
use crate::error::{SimError, SimResult};
use crate::random::SimRng;
use crate::stand::TaxiStand;
use crate::telemetry::{EventLog, StandEvent, StandTelemetry};

const KIND: &str = EventKind::SlotGranted.name();

#[allow(clippy::too_many_arguments)]
pub fn slot_granted_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut stand: ResMut<TaxiStand>,
    mut rng: ResMut<SimRng>,
    config: Res<StandConfig>,
    mut passengers: Query<&mut Passenger>,
    mut vehicles: Query<&mut Vehicle>,
    mut log: ResMut<EventLog>,
    mut telemetry: ResMut<StandTelemetry>,
) -> SimResult<()> {
    if event.0.kind != EventKind::SlotGranted {
        return Ok(());
    }
    let Some(EventSubject::Passenger(actor)) = event.0.subject else {
        return Err(SimError::UnknownActor {
            kind: KIND,
            what: "passenger subject",
        });
    };
    let now = clock.now();
    let (actor_id, neighborhood, delivered) = {
        let mut passenger = passengers.get_mut(actor).map_err(|_| missing_passenger())?;
        passenger.awaiting_slot = false;
        (
            passenger.id,
            passenger.destination.neighborhood,
            passenger.state == PassengerState::Delivered,
        )
    };
    // Already dropped off by someone else's trip: nothing refers to it after this grant.
    if delivered {
        commands.entity(actor).despawn();
    }

    let Some(batch) = stand.take_batch(neighborhood)? else {
        stand.fleet_mut().release_unused(&mut clock)?;
        telemetry.slots_released_unused += 1;
        debug!(time = now, passenger = actor_id, "queue not full, slot released");
        return Ok(());
    };

    let mut boarding: Vec<(Entity, Passenger)> = batch
        .into_iter()
        .map(|e| passengers.get(e).map(|p| (e, *p)))
        .collect::<Result<_, _>>()
        .map_err(|_| missing_passenger())?;
    order_by_point(&mut boarding, |(_, p)| p.destination.point);
    let ids: Vec<_> = boarding.iter().map(|(_, p)| p.id).collect();
    let name = stand.neighborhood(neighborhood)?.name.clone();
    log.record(
        now,
        StandEvent::BatchReady {
            neighborhood: name.clone(),
            passengers: ids.clone(),
        },
    );

    let vehicle_entity = stand.fleet_mut().checkout()?;
    let mut vehicle = vehicles
        .get_mut(vehicle_entity)
        .map_err(|_| SimError::UnknownActor {
            kind: KIND,
            what: "vehicle",
        })?;
    vehicle.state = VehicleState::InTransit;
    log.record(
        now,
        StandEvent::BatchBoarded {
            vehicle: vehicle.id,
            neighborhood: name,
            passengers: ids,
        },
    );

    let speed = rng.uniform(config.speed.min, config.speed.max);
    let distances: Vec<f64> = boarding
        .iter()
        .map(|(_, p)| p.destination.absolute_distance)
        .collect();
    let plan = TripPlan::compute(&distances, speed)?;
    let first_leg = plan.legs[0];

    for (entity, _) in &boarding {
        if let Ok(mut passenger) = passengers.get_mut(*entity) {
            passenger.state = PassengerState::Riding;
        }
    }

    let trip = commands
        .spawn(Trip {
            vehicle: vehicle_entity,
            vehicle_id: vehicle.id,
            neighborhood,
            passengers: boarding
                .iter()
                .map(|(e, p)| Rider::boarding(*e, p))
                .collect(),
            plan,
            next_stop: 0,
            dispatched_at: now,
        })
        .id();
    clock.timeout(first_leg, EventKind::DropOff, Some(EventSubject::Trip(trip)))?;
    telemetry.dispatches += 1;
    debug!(time = now, passenger = actor_id, speed, "dispatched trip");
    Ok(())
}

fn missing_passenger() -> SimError {
    SimError::UnknownActor {
        kind: KIND,
        what: "passenger",
    }
}
