//! Daemon and fuse scheduling
//!
//! The scheduler runs once per turn, after the player's action and NPC
//! turns have resolved:
//! 1. Player action
//! 2. NPC turns
//! 3. Scheduler tick (daemons run, fuses count down)
//! 4. Turn complete

pub mod context;
pub mod daemon;
pub mod fuse;
pub mod random;
pub mod report;
pub mod service;
pub mod state;

pub use context::{SchedulerContext, WorldModel};
pub use daemon::{CallbackResult, Daemon, DaemonInfo, DaemonState, RunnerStateHooks};
pub use fuse::{Fuse, FuseInfo, FuseState};
pub use random::SeededRandom;
pub use report::{
    CallbackFault, CallbackPhase, CollectingReporter, FaultCause, FaultReporter, TracingReporter,
};
pub use service::{Scheduler, TickResult};
pub use state::SchedulerState;
