//! Arrival generator: admits 1-3 passengers per tick and starts their actors.

use bevy_ecs::prelude::{Commands, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::{AcquisitionPolicy, StandConfig};
use crate::ecs::{Destination, NeighborhoodId, Passenger, PassengerState, MAX_POINT};
use crate::error::SimResult;
use crate::pool::Grant;
use crate::random::SimRng;
use crate::stand::TaxiStand;
use crate::systems::simulation_started::schedule_next_tick;
use crate::telemetry::{EventLog, StandEvent, StandTelemetry};

#[allow(clippy::too_many_arguments)]
pub fn arrival_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut stand: ResMut<TaxiStand>,
    mut rng: ResMut<SimRng>,
    config: Res<StandConfig>,
    mut log: ResMut<EventLog>,
    mut telemetry: ResMut<StandTelemetry>,
) -> SimResult<()> {
    if event.0.kind != EventKind::ArrivalTick {
        return Ok(());
    }
    let now = clock.now();

    let count = rng.uniform(config.batch_size.min, config.batch_size.max);
    for _ in 0..count {
        let neighborhood = NeighborhoodId(rng.index(stand.neighborhoods().len()));
        let point = rng.uniform(1, u64::from(MAX_POINT)) as u8;
        let (destination, name) = {
            let n = stand.neighborhood(neighborhood)?;
            (Destination::new(n, point)?, n.name.clone())
        };

        let id = stand.next_passenger_id();
        let entity = commands.spawn_empty().id();
        let queued = stand.enqueue(neighborhood, entity)?;
        telemetry.passengers_arrived += 1;
        log.record(
            now,
            StandEvent::PassengerArrived {
                passenger: id,
                neighborhood: name,
                point,
            },
        );

        // The passenger actor runs up to its first suspension point: the slot request.
        let wants_slot = match stand.policy() {
            AcquisitionPolicy::Eager => true,
            AcquisitionPolicy::Gated => queued >= stand.seat_capacity(),
        };
        commands.entity(entity).insert(Passenger {
            id,
            destination,
            arrived_at: now,
            state: PassengerState::Queued,
            awaiting_slot: wants_slot,
        });
        if wants_slot {
            let grant = stand
                .fleet_mut()
                .acquire(EventSubject::Passenger(entity), &mut clock);
            if let Grant::Queued { position } = grant {
                debug!(time = now, passenger = id, position, "waiting for a vehicle slot");
            }
        }
    }

    schedule_next_tick(&mut clock, &mut rng, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{IntoSystem, Schedule, World};

    use crate::clock::Event;
    use crate::config::NeighborhoodConfig;
    use crate::random::ScriptedRandom;
    use crate::scenario::build_stand;
    use crate::systems::{record_fault, SimFaults};

    fn tick_world(policy: AcquisitionPolicy, script: Vec<u64>) -> World {
        let config = StandConfig::default()
            .with_neighborhoods(vec![
                NeighborhoodConfig::new("A", 1.0),
                NeighborhoodConfig::new("B", 3.0),
            ])
            .with_fleet(2, 2)
            .with_policy(policy);
        let mut world = World::new();
        build_stand(&mut world, &config).unwrap();
        world.insert_resource(SimRng(Box::new(ScriptedRandom::new(script))));
        world.insert_resource(CurrentEvent(Event {
            timestamp: 0,
            seq: 0,
            kind: EventKind::ArrivalTick,
            subject: None,
        }));
        world
    }

    fn run_tick(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(arrival_system.pipe(record_fault));
        schedule.run(world);
        assert!(world.resource::<SimFaults>().0.is_none());
    }

    #[test]
    fn admits_passengers_into_their_queues_in_order() {
        // Three passengers: A/3, B/7, A/1; next tick in 5.
        let mut world = tick_world(AcquisitionPolicy::Eager, vec![3, 0, 3, 1, 7, 0, 1, 5]);
        run_tick(&mut world);

        let stand = world.resource::<TaxiStand>();
        assert_eq!(stand.queue_by_name("A").unwrap().len(), 2);
        assert_eq!(stand.queue_by_name("B").unwrap().len(), 1);
        assert_eq!(stand.passengers_admitted(), 3);

        let mut ids: Vec<_> = world
            .query::<&Passenger>()
            .iter(&world)
            .map(|p| (p.id, p.destination.point))
            .collect();
        ids.sort();
        assert_eq!(ids, vec![(1, 3), (2, 7), (3, 1)]);

        let log = world.resource::<EventLog>();
        assert_eq!(log.len(), 3);
        assert_eq!(world.resource::<StandTelemetry>().passengers_arrived, 3);
    }

    #[test]
    fn eager_passengers_all_request_slots() {
        let mut world = tick_world(AcquisitionPolicy::Eager, vec![3, 0, 3, 1, 7, 0, 1, 5]);
        run_tick(&mut world);

        let stand = world.resource::<TaxiStand>();
        assert_eq!(stand.fleet().pool().in_use(), 2);
        assert_eq!(stand.fleet().pool().waiting(), 1);

        let mut clock = world.resource_mut::<SimulationClock>();
        let kinds: Vec<_> = std::iter::from_fn(|| clock.pop_next())
            .map(|e| (e.timestamp, e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, EventKind::SlotGranted),
                (0, EventKind::SlotGranted),
                (5, EventKind::ArrivalTick),
            ]
        );
    }

    #[test]
    fn gated_passengers_request_only_when_queue_fills() {
        // Seat capacity 2: the second A passenger fills the queue.
        let mut world = tick_world(AcquisitionPolicy::Gated, vec![3, 0, 3, 1, 7, 0, 1, 5]);
        run_tick(&mut world);

        let stand = world.resource::<TaxiStand>();
        assert_eq!(stand.fleet().pool().in_use(), 1);
        assert_eq!(stand.fleet().pool().waiting(), 0);

        let mut requests: Vec<_> = world
            .query::<&Passenger>()
            .iter(&world)
            .map(|p| (p.id, p.awaiting_slot))
            .collect();
        requests.sort();
        assert_eq!(requests, vec![(1, false), (2, false), (3, true)]);
    }
}
