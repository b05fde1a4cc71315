//! The taxi stand: per-neighborhood passenger queues and the vehicle fleet.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

use crate::config::{AcquisitionPolicy, NeighborhoodConfig};
use crate::ecs::{Neighborhood, NeighborhoodId, PassengerId};
use crate::error::{SimError, SimResult};
use crate::pool::Fleet;

/// Passengers waiting for one neighborhood, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct DispatchQueue {
    waiting: VecDeque<Entity>,
}

impl DispatchQueue {
    pub fn push(&mut self, passenger: Entity) {
        self.waiting.push_back(passenger);
    }

    /// Remove exactly `size` passengers from the front, or nothing if fewer wait.
    pub fn take_batch(&mut self, size: usize) -> Option<Vec<Entity>> {
        if self.waiting.len() < size {
            return None;
        }
        Some(self.waiting.drain(..size).collect())
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

#[derive(Debug, Resource)]
pub struct TaxiStand {
    neighborhoods: Vec<Neighborhood>,
    queues: Vec<DispatchQueue>,
    fleet: Fleet,
    seat_capacity: usize,
    policy: AcquisitionPolicy,
    last_passenger_id: PassengerId,
}

impl TaxiStand {
    pub fn new(
        neighborhoods: &[NeighborhoodConfig],
        vehicles: Vec<Entity>,
        seat_capacity: usize,
        policy: AcquisitionPolicy,
    ) -> SimResult<Self> {
        if neighborhoods.is_empty() {
            return Err(SimError::invalid_config(
                "at least one neighborhood is required",
            ));
        }
        if seat_capacity == 0 {
            return Err(SimError::invalid_config("seat_capacity must be positive"));
        }
        let neighborhoods: Vec<Neighborhood> = neighborhoods
            .iter()
            .enumerate()
            .map(|(i, n)| Neighborhood {
                id: NeighborhoodId(i),
                name: n.name.clone(),
                base_distance: n.base_distance,
            })
            .collect();
        let queues = vec![DispatchQueue::default(); neighborhoods.len()];
        Ok(Self {
            neighborhoods,
            queues,
            fleet: Fleet::new(vehicles)?,
            seat_capacity,
            policy,
            last_passenger_id: 0,
        })
    }

    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    pub fn neighborhood(&self, id: NeighborhoodId) -> SimResult<&Neighborhood> {
        self.neighborhoods
            .get(id.0)
            .ok_or_else(|| SimError::UnknownNeighborhood(format!("#{}", id.0)))
    }

    pub fn neighborhood_by_name(&self, name: &str) -> SimResult<&Neighborhood> {
        self.neighborhoods
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| SimError::UnknownNeighborhood(name.to_string()))
    }

    pub fn queue(&self, id: NeighborhoodId) -> SimResult<&DispatchQueue> {
        self.queues
            .get(id.0)
            .ok_or_else(|| SimError::UnknownNeighborhood(format!("#{}", id.0)))
    }

    pub fn queue_by_name(&self, name: &str) -> SimResult<&DispatchQueue> {
        let id = self.neighborhood_by_name(name)?.id;
        self.queue(id)
    }

    /// Append a passenger to its neighborhood queue; returns the new length.
    pub fn enqueue(&mut self, id: NeighborhoodId, passenger: Entity) -> SimResult<usize> {
        let queue = self.queue_mut(id)?;
        queue.push(passenger);
        Ok(queue.len())
    }

    /// Take a full batch from `id` if one is waiting.
    pub fn take_batch(&mut self, id: NeighborhoodId) -> SimResult<Option<Vec<Entity>>> {
        let size = self.seat_capacity;
        Ok(self.queue_mut(id)?.take_batch(size))
    }

    pub fn queue_is_full(&self, id: NeighborhoodId) -> SimResult<bool> {
        Ok(self.queue(id)?.len() >= self.seat_capacity)
    }

    /// Ids start at 1 and never repeat within a run.
    pub fn next_passenger_id(&mut self) -> PassengerId {
        self.last_passenger_id += 1;
        self.last_passenger_id
    }

    pub fn passengers_admitted(&self) -> u64 {
        self.last_passenger_id
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    pub fn seat_capacity(&self) -> usize {
        self.seat_capacity
    }

    pub fn policy(&self) -> AcquisitionPolicy {
        self.policy
    }

    fn queue_mut(&mut self, id: NeighborhoodId) -> SimResult<&mut DispatchQueue> {
        self.queues
            .get_mut(id.0)
            .ok_or_else(|| SimError::UnknownNeighborhood(format!("#{}", id.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stand(seats: usize) -> TaxiStand {
        TaxiStand::new(
            &[
                NeighborhoodConfig::new("A", 1.0),
                NeighborhoodConfig::new("B", 3.0),
            ],
            vec![Entity::from_raw(100)],
            seats,
            AcquisitionPolicy::Eager,
        )
        .unwrap()
    }

    #[test]
    fn batch_drains_queue_exactly_at_capacity() {
        let mut stand = stand(4);
        let a = stand.neighborhood_by_name("A").unwrap().id;
        for i in 0..3 {
            stand.enqueue(a, Entity::from_raw(i)).unwrap();
        }
        assert!(!stand.queue_is_full(a).unwrap());
        assert_eq!(stand.take_batch(a).unwrap(), None);
        assert_eq!(stand.queue(a).unwrap().len(), 3, "short queue is untouched");

        stand.enqueue(a, Entity::from_raw(3)).unwrap();
        let batch = stand.take_batch(a).unwrap().expect("full batch");
        assert_eq!(
            batch,
            (0..4).map(Entity::from_raw).collect::<Vec<_>>()
        );
        assert!(stand.queue(a).unwrap().is_empty());
        assert_eq!(stand.take_batch(a).unwrap(), None);
    }

    #[test]
    fn batches_never_mix_neighborhoods() {
        let mut stand = stand(2);
        let a = stand.neighborhood_by_name("A").unwrap().id;
        let b = stand.neighborhood_by_name("B").unwrap().id;
        stand.enqueue(a, Entity::from_raw(1)).unwrap();
        stand.enqueue(b, Entity::from_raw(2)).unwrap();
        stand.enqueue(a, Entity::from_raw(3)).unwrap();

        let batch = stand.take_batch(a).unwrap().unwrap();
        assert_eq!(batch, vec![Entity::from_raw(1), Entity::from_raw(3)]);
        assert_eq!(stand.queue_by_name("B").unwrap().len(), 1);
    }

    #[test]
    fn passenger_ids_increase_from_one() {
        let mut stand = stand(4);
        assert_eq!(stand.next_passenger_id(), 1);
        assert_eq!(stand.next_passenger_id(), 2);
        assert_eq!(stand.passengers_admitted(), 2);
    }

    #[test]
    fn unknown_neighborhood_is_an_error() {
        let stand = stand(4);
        assert!(matches!(
            stand.queue(NeighborhoodId(9)),
            Err(SimError::UnknownNeighborhood(_))
        ));
        assert!(stand.neighborhood_by_name("Z").is_err());
    }
}
