pub mod schedule;
pub mod world;
