//! Event errors

use crate::NodeId;

/// Listener option that the engine refuses to honor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOption {
    Once,
    Passive,
    Signal,
}

impl UnsupportedOption {
    /// Option name as written by script
    pub fn name(&self) -> &'static str {
        match self {
            UnsupportedOption::Once => "once",
            UnsupportedOption::Passive => "passive",
            UnsupportedOption::Signal => "signal",
        }
    }
}

impl std::fmt::Display for UnsupportedOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors surfaced to callers of the event API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("Unsupported listener option: {0}")]
    UnsupportedOption(UnsupportedOption),

    #[error("Event type must not be empty")]
    EmptyEventType,

    #[error("Handler arena exhausted (capacity {capacity})")]
    AllocationFailed { capacity: usize },

    #[error("Cannot resolve ancestor path for {node}: {reason}")]
    PathResolution { node: NodeId, reason: String },

    #[error("Event is already being dispatched")]
    AlreadyDispatching,

    #[error("Nested dispatch depth {depth} exceeds limit")]
    RecursionLimit { depth: usize },

    #[error("Event session has been torn down")]
    SessionClosed,
}

impl EventError {
    /// Whether the error rejects a request up front (nothing was changed)
    pub fn is_configuration(&self) -> bool {
        matches!(self, EventError::UnsupportedOption(_) | EventError::EmptyEventType)
    }
}

/// Failure raised while a listener callback runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    #[error("Uncaught exception: {0}")]
    Thrown(String),

    #[error("Nested dispatch failed: {0}")]
    Nested(#[from] EventError),
}

impl CallbackError {
    pub fn thrown(message: impl Into<String>) -> Self {
        CallbackError::Thrown(message.into())
    }
}
