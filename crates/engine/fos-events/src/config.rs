//! Dispatch Configuration

use serde::{Deserialize, Serialize};

/// Per-session limits for the event core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum number of handler records the session arena may hold
    /// (clamped to `MAX_HANDLER_CAPACITY`)
    pub handler_capacity: usize,

    /// Maximum nesting of `dispatch_event` calls made from listeners
    pub max_dispatch_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_capacity: 64 * 1024,
            max_dispatch_depth: 64,
        }
    }
}
