//! Observable output of a run: the timestamped event stream and per-trip records.

use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;
use tracing::info;

use crate::clock::SimTime;
use crate::ecs::{PassengerId, VehicleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StandEvent {
    PassengerArrived {
        passenger: PassengerId,
        neighborhood: String,
        point: u8,
    },
    BatchReady {
        neighborhood: String,
        passengers: Vec<PassengerId>,
    },
    BatchBoarded {
        vehicle: VehicleId,
        neighborhood: String,
        passengers: Vec<PassengerId>,
    },
    PassengerDroppedOff {
        passenger: PassengerId,
        vehicle: VehicleId,
        neighborhood: String,
        point: u8,
    },
    VehicleReturning {
        vehicle: VehicleId,
    },
    VehicleReturned {
        vehicle: VehicleId,
        trip_duration: SimTime,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    pub time: SimTime,
    #[serde(flatten)]
    pub event: StandEvent,
}

impl StandEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StandEvent::PassengerArrived { .. } => "passenger_arrived",
            StandEvent::BatchReady { .. } => "batch_ready",
            StandEvent::BatchBoarded { .. } => "batch_boarded",
            StandEvent::PassengerDroppedOff { .. } => "passenger_dropped_off",
            StandEvent::VehicleReturning { .. } => "vehicle_returning",
            StandEvent::VehicleReturned { .. } => "vehicle_returned",
        }
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.time)?;
        match &self.event {
            StandEvent::PassengerArrived {
                passenger,
                neighborhood,
                point,
            } => write!(
                f,
                "passenger {passenger} arrives at the stand bound for {neighborhood}, point {point}"
            ),
            StandEvent::BatchReady {
                neighborhood,
                passengers,
            } => write!(
                f,
                "passengers {passengers:?} bound for {neighborhood} ready to board"
            ),
            StandEvent::BatchBoarded {
                vehicle,
                passengers,
                ..
            } => write!(f, "passengers {passengers:?} boarded vehicle {vehicle}"),
            StandEvent::PassengerDroppedOff {
                passenger,
                neighborhood,
                point,
                ..
            } => write!(
                f,
                "passenger {passenger} reached {neighborhood}, point {point}"
            ),
            StandEvent::VehicleReturning { vehicle } => {
                write!(f, "vehicle {vehicle} heading back to the stand")
            }
            StandEvent::VehicleReturned {
                vehicle,
                trip_duration,
            } => write!(
                f,
                "vehicle {vehicle} back at the stand after {trip_duration}"
            ),
        }
    }
}

/// Ordered stream of everything observable that happened in the run.
#[derive(Debug, Default, Resource)]
pub struct EventLog {
    pub events: Vec<TimedEvent>,
}

impl EventLog {
    pub fn record(&mut self, time: SimTime, event: StandEvent) {
        let entry = TimedEvent { time, event };
        info!(time, kind = entry.event.kind(), "{}", entry);
        self.events.push(entry);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// One finished trip, recorded when the vehicle is parked again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub vehicle: VehicleId,
    pub neighborhood: String,
    /// Passengers in drop-off order.
    pub passengers: Vec<PassengerId>,
    pub points: Vec<u8>,
    pub speed: u64,
    pub dispatched_at: SimTime,
    pub returned_at: SimTime,
    /// Time each passenger spent at the stand before departure.
    pub waits: Vec<SimTime>,
}

impl TripRecord {
    pub fn trip_duration(&self) -> SimTime {
        self.returned_at.saturating_sub(self.dispatched_at)
    }
}

#[derive(Debug, Default, Resource)]
pub struct StandTelemetry {
    pub completed_trips: Vec<TripRecord>,
    pub passengers_arrived: u64,
    pub passengers_delivered: u64,
    pub dispatches: u64,
    /// Slots granted to passengers whose queue was not full, then given back.
    pub slots_released_unused: u64,
}
