//! fOS Events - DOM event dispatch
//!
//! Listener registry and the capture/target/bubble propagation algorithm
//! behind `addEventListener`, `removeEventListener` and `dispatchEvent`.
//!
//! Listeners are arbitrary host callbacks. They may add or remove listeners
//! and dispatch further events while a dispatch is in progress; per-dispatch
//! state lives on the call stack so nested dispatch never disturbs the
//! outer one.

mod arena;
mod callback;
mod config;
mod dispatch;
mod error;
mod event;
mod options;
mod path;
mod registry;
mod session;

pub use arena::{EventHandler, HandlerArena, HandlerId, MAX_HANDLER_CAPACITY};
pub use callback::{CallbackId, ErrorReporter, HostCallable, ScriptFunction, TracingReporter};
pub use config::DispatchConfig;
pub use dispatch::Invocation;
pub use error::{CallbackError, EventError, UnsupportedOption};
pub use event::{Event, EventInit, EventPhase};
pub use options::{ListenerOptions, ListenerOptionsArg};
pub use path::{AncestorPathProvider, ParentMap};
pub use registry::{Listener, ListenerRegistry};
pub use session::{EventSession, SessionBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event target identifier (index into the DOM arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
