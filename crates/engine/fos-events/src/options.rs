//! Listener options
//!
//! `addEventListener` accepts either a bare boolean (legacy capture flag) or
//! an options dictionary. Only `capture` is honored; `once`, `passive` and
//! `signal` are rejected when set rather than silently ignored.

use serde::{Deserialize, Serialize};

use crate::error::{EventError, UnsupportedOption};

/// Structured listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
    /// Whether an abort signal was supplied
    pub signal: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self { capture: true, ..Self::default() }
    }

    /// First requested option the engine cannot honor
    pub fn unsupported(&self) -> Option<UnsupportedOption> {
        if self.once {
            Some(UnsupportedOption::Once)
        } else if self.passive {
            Some(UnsupportedOption::Passive)
        } else if self.signal {
            Some(UnsupportedOption::Signal)
        } else {
            None
        }
    }
}

/// Third argument of `addEventListener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListenerOptionsArg {
    Capture(bool),
    Options(ListenerOptions),
}

impl ListenerOptionsArg {
    /// Normalize and validate, yielding the effective capture flag
    pub fn resolve(self) -> Result<bool, EventError> {
        let options = match self {
            ListenerOptionsArg::Capture(capture) => return Ok(capture),
            ListenerOptionsArg::Options(options) => options,
        };
        match options.unsupported() {
            Some(option) => {
                tracing::warn!("Rejecting addEventListener option '{}'", option);
                Err(EventError::UnsupportedOption(option))
            }
            None => Ok(options.capture),
        }
    }
}

impl Default for ListenerOptionsArg {
    fn default() -> Self {
        ListenerOptionsArg::Capture(false)
    }
}

impl From<bool> for ListenerOptionsArg {
    fn from(capture: bool) -> Self {
        ListenerOptionsArg::Capture(capture)
    }
}

impl From<ListenerOptions> for ListenerOptionsArg {
    fn from(options: ListenerOptions) -> Self {
        ListenerOptionsArg::Options(options)
    }
}

impl From<Option<ListenerOptionsArg>> for ListenerOptionsArg {
    fn from(arg: Option<ListenerOptionsArg>) -> Self {
        arg.unwrap_or_default()
    }
}
