//! Turn Scheduler - daemons and fuses for turn-based games

pub mod core;
pub mod plugin;
pub mod runners;
pub mod scenario;
pub mod scheduler;
pub mod world;
