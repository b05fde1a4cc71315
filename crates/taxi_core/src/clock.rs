//! Simulated clock and pending-event queue.
//!
//! Every actor suspension becomes an [Event] carrying the actor as its
//! [EventSubject]. Events pop in `(timestamp, seq)` order, so actors due at the
//! same instant resume in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::{SimError, SimResult};

/// Simulated time units. Has no relation to wall clock.
pub type SimTime = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SimulationStarted,
    /// The arrival generator wakes up and admits new passengers.
    ArrivalTick,
    /// A passenger actor was handed a vehicle slot.
    SlotGranted,
    /// A trip reached its next drop-off.
    DropOff,
    /// A trip finished its return leg.
    VehicleReturned,
}

impl EventKind {
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::SimulationStarted => "SimulationStarted",
            EventKind::ArrivalTick => "ArrivalTick",
            EventKind::SlotGranted => "SlotGranted",
            EventKind::DropOff => "DropOff",
            EventKind::VehicleReturned => "VehicleReturned",
        }
    }
}

/// The actor an event resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubject {
    Passenger(Entity),
    Trip(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: SimTime,
    /// Insertion sequence; breaks ties between events due at the same time.
    pub seq: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `kind` at an absolute time. Scheduling in the past is rejected.
    pub fn schedule_at(
        &mut self,
        timestamp: SimTime,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> SimResult<()> {
        if timestamp < self.now {
            return Err(SimError::TimeInPast {
                timestamp,
                now: self.now,
            });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            kind,
            subject,
        });
        Ok(())
    }

    /// Suspend `subject` for `delay` units; returns the wake-up time.
    ///
    /// A zero delay still goes through the queue, behind everything already
    /// due at the current instant.
    pub fn timeout(
        &mut self,
        delay: i64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> SimResult<SimTime> {
        let delay = u64::try_from(delay).map_err(|_| SimError::NegativeTimeout {
            delay,
            now: self.now,
        })?;
        let wake_at = self.now + delay;
        self.schedule_at(wake_at, kind, subject)?;
        Ok(wake_at)
    }

    /// Resume `subject` at the current instant.
    pub fn schedule_now(&mut self, kind: EventKind, subject: Option<EventSubject>) {
        let now = self.now;
        // Scheduling at `now` cannot fail.
        let _ = self.schedule_at(now, kind, subject);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        debug_assert!(event.timestamp >= self.now, "time moved backward");
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
