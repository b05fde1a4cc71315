use bevy_ecs::prelude::{Component, Entity};
use serde::Serialize;

use crate::clock::SimTime;
use crate::dispatch::TripPlan;
use crate::error::{SimError, SimResult};

pub type PassengerId = u64;
pub type VehicleId = u32;

/// Highest destination point inside a neighborhood; points run `1..=MAX_POINT`.
pub const MAX_POINT: u8 = 10;

/// Index of a neighborhood in the stand's configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NeighborhoodId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub name: String,
    pub base_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub neighborhood: NeighborhoodId,
    pub point: u8,
    /// `base_distance * point / 5`.
    pub absolute_distance: f64,
}

impl Destination {
    pub fn new(neighborhood: &Neighborhood, point: u8) -> SimResult<Self> {
        if point == 0 || point > MAX_POINT {
            return Err(SimError::PointOutOfRange {
                point,
                max: MAX_POINT,
            });
        }
        Ok(Self {
            neighborhood: neighborhood.id,
            point,
            absolute_distance: neighborhood.base_distance * f64::from(point) / 5.0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerState {
    Queued,
    Riding,
    /// Dropped off while its own slot request is still pending.
    Delivered,
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Passenger {
    pub id: PassengerId,
    pub destination: Destination,
    pub arrived_at: SimTime,
    pub state: PassengerState,
    /// The actor has requested a vehicle slot and not yet been resumed by the grant.
    pub awaiting_slot: bool,
}

/// What a trip remembers about a boarded passenger, so the passenger entity
/// can go away at drop-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rider {
    pub entity: Entity,
    pub id: PassengerId,
    pub point: u8,
    pub arrived_at: SimTime,
}

impl Rider {
    pub fn boarding(entity: Entity, passenger: &Passenger) -> Self {
        Self {
            entity,
            id: passenger.id,
            point: passenger.destination.point,
            arrived_at: passenger.arrived_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    Available,
    InTransit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Vehicle {
    pub id: VehicleId,
    pub seat_capacity: usize,
    pub state: VehicleState,
    pub trips_completed: u32,
}

/// One vehicle trip in flight. Lives on its own entity until the vehicle is back.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Trip {
    pub vehicle: Entity,
    pub vehicle_id: VehicleId,
    pub neighborhood: NeighborhoodId,
    /// Boarded passengers, closest stop first.
    pub passengers: Vec<Rider>,
    pub plan: TripPlan,
    /// Index of the next drop-off in `passengers`.
    pub next_stop: usize,
    pub dispatched_at: SimTime,
}

impl Trip {
    pub fn is_unloaded(&self) -> bool {
        self.next_stop >= self.passengers.len()
    }
}
