//! Event-reacting systems. Each one resumes one kind of actor.
//!
//! Systems return [SimResult] and are piped into [record_fault]; the runner
//! stops at the first recorded fault.

use bevy_ecs::prelude::{ResMut, Resource};
use bevy_ecs::system::In;
use tracing::error;

use crate::error::{SimError, SimResult};

pub mod arrivals;
pub mod drop_off;
pub mod simulation_started;
pub mod slot_granted;
pub mod vehicle_returned;

/// First failure raised by a system during the current run.
#[derive(Debug, Default, Resource)]
pub struct SimFaults(pub Option<SimError>);

pub fn record_fault(In(result): In<SimResult<()>>, mut faults: ResMut<SimFaults>) {
    if let Err(err) = result {
        error!(%err, "simulation fault");
        faults.0.get_or_insert(err);
    }
}
