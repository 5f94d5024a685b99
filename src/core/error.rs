use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Daemon with id \"{0}\" already exists")]
    DuplicateDaemon(String),

    #[error("Plugin with id \"{0}\" already registered")]
    DuplicatePlugin(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Runner state error for \"{id}\": {reason}")]
    RunnerState { id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Error returned by a daemon or fuse callback. Only the message is
/// reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl From<&str> for CallbackError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

impl From<String> for CallbackError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

impl From<SchedulerError> for CallbackError {
    fn from(err: SchedulerError) -> Self {
        Self(err.to_string())
    }
}
