//! Handler arena
//!
//! Session-scoped storage for event handler records. A record is allocated
//! when a listener is registered and is only ever retired afterwards; the
//! memory goes away in one piece when the session is torn down.

use std::rc::Rc;

use crate::callback::{CallbackId, HostCallable};
use crate::error::EventError;
use crate::NodeId;

/// Index of a handler record in its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub(crate) u32);

/// A callback bound to its target at registration time
pub struct EventHandler {
    this: NodeId,
    callback: Rc<dyn HostCallable>,
    live: bool,
}

impl EventHandler {
    pub fn new(this: NodeId, callback: Rc<dyn HostCallable>) -> Self {
        Self {
            this,
            callback,
            live: true,
        }
    }

    /// The `this` value the callback runs with
    pub fn this(&self) -> NodeId {
        self.this
    }

    pub fn callback_id(&self) -> CallbackId {
        self.callback.id()
    }

    pub fn callback(&self) -> &Rc<dyn HostCallable> {
        &self.callback
    }

    /// False once the owning registry entry is gone
    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler")
            .field("this", &self.this)
            .field("callback", &self.callback.id())
            .field("live", &self.live)
            .finish()
    }
}

/// Largest arena a `u32` handler id can address
pub const MAX_HANDLER_CAPACITY: usize = u32::MAX as usize;

/// Bump arena of handler records
#[derive(Debug)]
pub struct HandlerArena {
    handlers: Vec<EventHandler>,
    capacity: usize,
    retired: usize,
}

impl HandlerArena {
    /// Capacities above [`MAX_HANDLER_CAPACITY`] are clamped to it.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_HANDLER_CAPACITY);
        Self {
            handlers: Vec::with_capacity(capacity.min(64)),
            capacity,
            retired: 0,
        }
    }

    /// Allocate a record. Fails once `capacity` records exist.
    pub fn alloc(&mut self, handler: EventHandler) -> Result<HandlerId, EventError> {
        if self.handlers.len() >= self.capacity {
            return Err(EventError::AllocationFailed {
                capacity: self.capacity,
            });
        }
        let index = u32::try_from(self.handlers.len()).map_err(|_| EventError::AllocationFailed {
            capacity: self.capacity,
        })?;
        let id = HandlerId(index);
        self.handlers.push(handler);
        Ok(id)
    }

    pub fn get(&self, id: HandlerId) -> Option<&EventHandler> {
        self.handlers.get(id.0 as usize)
    }

    pub fn is_live(&self, id: HandlerId) -> bool {
        self.get(id).is_some_and(EventHandler::is_live)
    }

    /// Mark a record as detached from its registry. The slot is kept.
    pub fn retire(&mut self, id: HandlerId) {
        if let Some(handler) = self.handlers.get_mut(id.0 as usize) {
            if handler.live {
                handler.live = false;
                self.retired += 1;
            }
        }
    }

    /// Records allocated (live and retired)
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Records still attached to a registry
    pub fn live(&self) -> usize {
        self.handlers.len() - self.retired
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Release every record at once
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.retired = 0;
    }
}

impl Default for HandlerArena {
    fn default() -> Self {
        Self::new(crate::DispatchConfig::default().handler_capacity)
    }
}
