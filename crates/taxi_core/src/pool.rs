//! Counting resource pool with FIFO waiters, and the vehicle fleet built on it.
//!
//! The pool hands out anonymous slots. [Fleet] wraps the pool together with the
//! list of free vehicle entities so the two can only change together.

use std::collections::VecDeque;

use bevy_ecs::prelude::Entity;

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::error::{SimError, SimResult};

/// Outcome of [ResourcePool::acquire].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// A slot was free; the grant resumes the caller at the current instant.
    Immediate,
    /// All slots are held; the caller is queued at `position` (0 = next in line).
    Queued { position: usize },
}

#[derive(Debug, Clone)]
pub struct ResourcePool {
    capacity: usize,
    in_use: usize,
    waiters: VecDeque<EventSubject>,
    peak_in_use: usize,
    peak_waiters: usize,
}

impl ResourcePool {
    pub fn new(capacity: usize) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::invalid_config("pool capacity must be positive"));
        }
        Ok(Self {
            capacity,
            in_use: 0,
            waiters: VecDeque::new(),
            peak_in_use: 0,
            peak_waiters: 0,
        })
    }

    /// Request one slot for `actor`.
    ///
    /// The actor is always resumed through a [EventKind::SlotGranted] event,
    /// either right away or once a holder releases.
    pub fn acquire(&mut self, actor: EventSubject, clock: &mut SimulationClock) -> Grant {
        if self.in_use < self.capacity {
            self.in_use += 1;
            self.peak_in_use = self.peak_in_use.max(self.in_use);
            clock.schedule_now(EventKind::SlotGranted, Some(actor));
            return Grant::Immediate;
        }
        self.waiters.push_back(actor);
        self.peak_waiters = self.peak_waiters.max(self.waiters.len());
        Grant::Queued {
            position: self.waiters.len() - 1,
        }
    }

    /// Return one slot. A queued waiter takes it over at the same instant.
    pub fn release(&mut self, clock: &mut SimulationClock) -> SimResult<Option<EventSubject>> {
        if self.in_use == 0 {
            return Err(SimError::OverRelease {
                capacity: self.capacity,
            });
        }
        match self.waiters.pop_front() {
            Some(next) => {
                clock.schedule_now(EventKind::SlotGranted, Some(next));
                Ok(Some(next))
            }
            None => {
                self.in_use -= 1;
                Ok(None)
            }
        }
    }

    pub fn available(&self) -> usize {
        self.capacity - self.in_use
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    pub fn peak_waiters(&self) -> usize {
        self.peak_waiters
    }
}

/// The vehicle pool: slot accounting plus the FIFO of parked vehicles.
#[derive(Debug, Clone)]
pub struct Fleet {
    pool: ResourcePool,
    free: VecDeque<Entity>,
}

impl Fleet {
    pub fn new(vehicles: Vec<Entity>) -> SimResult<Self> {
        let pool = ResourcePool::new(vehicles.len())
            .map_err(|_| SimError::invalid_config("fleet must contain at least one vehicle"))?;
        Ok(Self {
            pool,
            free: vehicles.into(),
        })
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn acquire(&mut self, actor: EventSubject, clock: &mut SimulationClock) -> Grant {
        self.pool.acquire(actor, clock)
    }

    /// Give back a slot that never took a vehicle.
    pub fn release_unused(&mut self, clock: &mut SimulationClock) -> SimResult<Option<EventSubject>> {
        self.pool.release(clock)
    }

    /// Take the longest-parked vehicle for a granted slot.
    pub fn checkout(&mut self) -> SimResult<Entity> {
        let out = self.pool.capacity() - self.free.len();
        if out >= self.pool.in_use() {
            return Err(self.desync());
        }
        self.free.pop_front().ok_or_else(|| self.desync())
    }

    /// Park `vehicle` and release its slot in one step, so the next waiter
    /// finds the vehicle already in the free list.
    pub fn check_in(
        &mut self,
        vehicle: Entity,
        clock: &mut SimulationClock,
    ) -> SimResult<Option<EventSubject>> {
        if self.free.len() >= self.pool.capacity() {
            return Err(self.desync());
        }
        self.free.push_back(vehicle);
        self.pool.release(clock)
    }

    pub fn parked_count(&self) -> usize {
        self.free.len()
    }

    fn desync(&self) -> SimError {
        SimError::FleetDesync {
            in_use: self.pool.in_use(),
            capacity: self.pool.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(i: u32) -> EventSubject {
        EventSubject::Passenger(Entity::from_raw(i))
    }

    fn drain(clock: &mut SimulationClock) -> Vec<EventSubject> {
        std::iter::from_fn(|| clock.pop_next())
            .filter_map(|e| e.subject)
            .collect()
    }

    #[test]
    fn grants_immediately_while_capacity_remains() {
        let mut clock = SimulationClock::default();
        let mut pool = ResourcePool::new(2).unwrap();

        assert_eq!(pool.acquire(actor(1), &mut clock), Grant::Immediate);
        assert_eq!(pool.acquire(actor(2), &mut clock), Grant::Immediate);
        assert_eq!(
            pool.acquire(actor(3), &mut clock),
            Grant::Queued { position: 0 }
        );
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.waiting(), 1);
        assert_eq!(drain(&mut clock), vec![actor(1), actor(2)]);
    }

    #[test]
    fn release_hands_slot_to_waiters_in_fifo_order() {
        let mut clock = SimulationClock::default();
        let mut pool = ResourcePool::new(1).unwrap();
        pool.acquire(actor(1), &mut clock);
        pool.acquire(actor(2), &mut clock);
        pool.acquire(actor(3), &mut clock);
        pool.acquire(actor(4), &mut clock);
        drain(&mut clock);

        assert_eq!(pool.release(&mut clock).unwrap(), Some(actor(2)));
        assert_eq!(pool.release(&mut clock).unwrap(), Some(actor(3)));
        assert_eq!(pool.release(&mut clock).unwrap(), Some(actor(4)));
        assert_eq!(pool.in_use(), 1, "hand-over keeps the slot occupied");
        assert_eq!(drain(&mut clock), vec![actor(2), actor(3), actor(4)]);

        assert_eq!(pool.release(&mut clock).unwrap(), None);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.peak_in_use(), 1);
        assert_eq!(pool.peak_waiters(), 3);
    }

    #[test]
    fn releasing_unacquired_slot_is_an_error() {
        let mut clock = SimulationClock::default();
        let mut pool = ResourcePool::new(3).unwrap();
        assert_eq!(
            pool.release(&mut clock),
            Err(SimError::OverRelease { capacity: 3 })
        );
        assert_eq!(pool.available(), 3);
        assert!(clock.is_empty());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            ResourcePool::new(0),
            Err(SimError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn fleet_checkout_requires_a_held_slot() {
        let mut clock = SimulationClock::default();
        let v0 = Entity::from_raw(10);
        let v1 = Entity::from_raw(11);
        let mut fleet = Fleet::new(vec![v0, v1]).unwrap();

        assert!(matches!(
            fleet.checkout(),
            Err(SimError::FleetDesync { in_use: 0, .. })
        ));

        fleet.acquire(actor(1), &mut clock);
        assert_eq!(fleet.checkout().unwrap(), v0);
        assert!(fleet.checkout().is_err(), "one slot buys one vehicle");

        fleet.acquire(actor(2), &mut clock);
        assert_eq!(fleet.checkout().unwrap(), v1);
        assert_eq!(fleet.parked_count(), 0);
    }

    #[test]
    fn fleet_check_in_parks_vehicle_before_waiter_is_granted() {
        let mut clock = SimulationClock::default();
        let v0 = Entity::from_raw(10);
        let mut fleet = Fleet::new(vec![v0]).unwrap();

        fleet.acquire(actor(1), &mut clock);
        let vehicle = fleet.checkout().unwrap();
        fleet.acquire(actor(2), &mut clock);
        drain(&mut clock);

        let next = fleet.check_in(vehicle, &mut clock).unwrap();
        assert_eq!(next, Some(actor(2)));
        assert_eq!(fleet.parked_count(), 1);
        assert_eq!(fleet.checkout().unwrap(), v0);
    }
}
