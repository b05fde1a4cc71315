pub mod clock;
pub mod config;
pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod pool;
pub mod random;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod stand;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
