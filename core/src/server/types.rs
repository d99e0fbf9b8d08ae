use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Server lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Uninitialized,
    Initialized,
    Listening,
    Stopped,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServerState::Uninitialized => "uninitialized",
            ServerState::Initialized => "initialized",
            ServerState::Listening => "listening",
            ServerState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    /// Operation not allowed in the current lifecycle state.
    #[error("cannot {op} while {state}")]
    InvalidState { op: &'static str, state: ServerState },

    #[error("invalid server config: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
