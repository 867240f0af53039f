pub mod config;
pub mod report;
pub mod rng;
pub mod simulation;
pub mod sweep;
