//! Event object
//!
//! Holds the event's type, its behaviour flags and the signals listeners
//! raise while it is in flight. Phase and current target are not stored
//! here: they belong to the dispatch frame a listener is invoked from.

use crate::NodeId;

/// Which phase of the dispatch algorithm is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum EventPhase {
    #[default]
    None = 0,
    Capturing = 1,
    AtTarget = 2,
    Bubbling = 3,
}

impl EventPhase {
    /// Numeric value as exposed to script (`Event.eventPhase`)
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Event construction flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInit {
    pub bubbles: bool,
    /// When false, `prevent_default` is a no-op and dispatch always
    /// returns `true`, even if a listener asked for prevention.
    pub cancelable: bool,
}

impl Default for EventInit {
    fn default() -> Self {
        Self {
            bubbles: false,
            cancelable: true,
        }
    }
}

/// A DOM event that can be dispatched through the tree
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    dispatching: bool,
}

impl Event {
    /// Create an event with default flags (non-bubbling, cancelable)
    pub fn new(event_type: &str) -> Self {
        Self::with_init(event_type, EventInit::default())
    }

    /// Create a bubbling event
    pub fn bubbling(event_type: &str) -> Self {
        Self::with_init(event_type, EventInit { bubbles: true, ..EventInit::default() })
    }

    pub fn with_init(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            target: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            dispatching: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Node the event was last dispatched at
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Always `None` outside a listener; see [`crate::Invocation::current_target`]
    pub fn current_target(&self) -> Option<NodeId> {
        None
    }

    /// Always `None` outside a listener; see [`crate::Invocation::event_phase`]
    pub fn phase(&self) -> EventPhase {
        EventPhase::None
    }

    /// Prevention requested during the current or most recent dispatch
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Whether the event is currently in flight
    pub fn is_dispatching(&self) -> bool {
        self.dispatching
    }

    /// Prevent the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Finish the current node's listeners, then stop.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop all further processing, including the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Signals raised before this dispatch (or left from a previous one)
    /// do not carry into it.
    pub(crate) fn begin_dispatch(&mut self, target: NodeId) {
        self.dispatching = true;
        self.target = Some(target);
        self.default_prevented = false;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.dispatching = false;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
    }
}
