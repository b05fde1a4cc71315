//! Error types for the taxi stand simulation.
//!
//! Every failure is a defect or a setup mistake: nothing here is retried.

use thiserror::Error;

/// Errors surfaced by configuration, scheduling and the vehicle pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Rejected at setup time, before any event runs.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A timeout was requested with a negative duration.
    #[error("negative timeout of {delay} requested at t={now}")]
    NegativeTimeout { delay: i64, now: u64 },

    /// An event was scheduled before the current simulated time.
    #[error("event at t={timestamp} would precede current time t={now}")]
    TimeInPast { timestamp: u64, now: u64 },

    /// More units were released than were acquired.
    #[error("release on pool of capacity {capacity} with no unit in use")]
    OverRelease { capacity: usize },

    /// A slot holder found no vehicle in the free list.
    #[error("no free vehicle for a granted slot ({in_use} of {capacity} slots in use)")]
    FleetDesync { in_use: usize, capacity: usize },

    /// An event referenced an entity that no longer carries the expected component.
    #[error("event {kind} references missing {what}")]
    UnknownActor { kind: &'static str, what: &'static str },

    /// A destination point fell outside 1..=10.
    #[error("destination point {point} outside 1..={max}")]
    PointOutOfRange { point: u8, max: u8 },

    /// Neighborhood lookup by index or name failed.
    #[error("unknown neighborhood {0}")]
    UnknownNeighborhood(String),
}

impl SimError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
