//! Batch ordering and trip timing.
//!
//! A trip visits stops closest-first. Travel times are measured from the stand:
//! `absolute[i] = round(60 * distance[i] / speed)`, and the vehicle waits
//! `legs[i] = absolute[i] - absolute[i - 1]` between consecutive drop-offs.
//! The return leg mirrors the longest one-way leg.

use serde::Serialize;

use crate::error::{SimError, SimResult};

/// Sort a batch by destination point, keeping queue order between equal points.
pub fn order_by_point<T>(batch: &mut [T], point: impl Fn(&T) -> u8) {
    // `sort_by_key` is stable.
    batch.sort_by_key(|item| point(item));
}

/// Time units needed to cover `distance` at `speed` units per 60 time units.
pub fn travel_time(distance: f64, speed: u64) -> u64 {
    (60.0 * distance / speed as f64).round() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripPlan {
    pub speed: u64,
    /// Time from departure to each drop-off.
    pub absolute: Vec<u64>,
    /// Wait before each drop-off, relative to the previous one. Signed so an
    /// unordered batch surfaces as a negative timeout instead of wrapping.
    pub legs: Vec<i64>,
    pub return_leg: u64,
}

impl TripPlan {
    /// Plan a trip over stops given in visiting order.
    pub fn compute(distances: &[f64], speed: u64) -> SimResult<Self> {
        if speed == 0 {
            return Err(SimError::invalid_config("trip speed must be positive"));
        }
        let absolute: Vec<u64> = distances.iter().map(|d| travel_time(*d, speed)).collect();
        let legs = absolute
            .iter()
            .scan(0i64, |prev, &t| {
                let t = t as i64;
                let leg = t - *prev;
                *prev = t;
                Some(leg)
            })
            .collect();
        let return_leg = absolute.iter().copied().max().unwrap_or(0);
        Ok(Self {
            speed,
            absolute,
            legs,
            return_leg,
        })
    }

    /// Time of the last drop-off, relative to departure.
    pub fn last_drop_off(&self) -> u64 {
        self.absolute.last().copied().unwrap_or(0)
    }

    /// How long the vehicle is away from the stand.
    pub fn total_duration(&self) -> u64 {
        self.last_drop_off() + self.return_leg
    }
}
