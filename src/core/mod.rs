pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::SchedulerConfig;
pub use error::{CallbackError, Result, SchedulerError};
pub use events::SemanticEvent;
pub use types::{EntityId, Priority, Turn};
