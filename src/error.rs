use std::path::PathBuf;

use thiserror::Error;

/// Failure of a backend request. Cloneable so it can ride inside UI messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend not reachable at {path:?}: {reason}")]
    Connect { path: PathBuf, reason: String },

    #[error("backend I/O failed during {command}: {reason}")]
    Io { command: &'static str, reason: String },

    #[error("malformed backend reply to {command}: {reason}")]
    Protocol { command: &'static str, reason: String },

    /// The backend processed the request and reported an error.
    #[error("{command} failed: {message}")]
    Remote { command: &'static str, message: String },
}

impl BackendError {
    pub fn io(command: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Io {
            command,
            reason: err.to_string(),
        }
    }

    pub fn protocol(command: &'static str, reason: impl Into<String>) -> Self {
        Self::Protocol {
            command,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    Primary(String),

    #[error("fallback `{program}` failed: {reason}")]
    Fallback { program: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    #[error("unknown event {0:?}")]
    Unknown(String),

    #[error("event {event} needs a payload")]
    MissingPayload { event: &'static str },

    #[error("bad payload for {event}: {reason}")]
    BadPayload { event: &'static str, reason: String },
}
