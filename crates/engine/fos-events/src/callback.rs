//! Host callbacks
//!
//! The script layer hands listeners to the engine as [`HostCallable`]s.
//! Identity comes from the host (the underlying function object), not from
//! the wrapper, so two wrappers around one script function compare equal for
//! deduplication and removal.

use crate::dispatch::Invocation;
use crate::error::CallbackError;
use crate::NodeId;

/// Opaque, comparable identity of a script function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub u64);

/// Invocable capability representing a script callback
pub trait HostCallable {
    /// Identity used for deduplication and removal
    fn id(&self) -> CallbackId;

    /// Run the callback. May re-enter the session through `inv.session()`.
    fn invoke(&self, inv: &mut Invocation<'_>) -> Result<(), CallbackError>;
}

type ScriptFn = dyn Fn(&mut Invocation<'_>) -> Result<(), CallbackError>;

/// Closure-backed callable
pub struct ScriptFunction {
    id: CallbackId,
    func: Box<ScriptFn>,
}

impl ScriptFunction {
    pub fn new<F>(id: CallbackId, func: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<(), CallbackError> + 'static,
    {
        Self {
            id,
            func: Box::new(func),
        }
    }
}

impl HostCallable for ScriptFunction {
    fn id(&self) -> CallbackId {
        self.id
    }

    fn invoke(&self, inv: &mut Invocation<'_>) -> Result<(), CallbackError> {
        (self.func)(inv)
    }
}

impl std::fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptFunction").field("id", &self.id).finish()
    }
}

/// Host error channel for failures raised inside listeners
pub trait ErrorReporter {
    fn report(&self, target: NodeId, event_type: &str, err: &CallbackError);
}

/// Reports listener failures through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, target: NodeId, event_type: &str, err: &CallbackError) {
        tracing::error!("Uncaught error in '{}' listener on {}: {}", event_type, target, err);
    }
}
