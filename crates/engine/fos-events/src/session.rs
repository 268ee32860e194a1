//! Event session
//!
//! Owns everything listeners need for one browsing session: the handler
//! arena, one registry per event target, the ancestor path provider and the
//! host error channel. The handle is cheap to clone and is what listener
//! callbacks use to re-enter the engine.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::arena::{EventHandler, HandlerArena};
use crate::callback::{CallbackId, ErrorReporter, HostCallable, TracingReporter};
use crate::config::DispatchConfig;
use crate::error::EventError;
use crate::options::ListenerOptionsArg;
use crate::path::AncestorPathProvider;
use crate::registry::{Listener, ListenerRegistry};
use crate::NodeId;

pub(crate) struct SessionState {
    pub(crate) arena: HandlerArena,
    pub(crate) registries: HashMap<NodeId, ListenerRegistry>,
    pub(crate) closed: bool,
}

pub(crate) struct SessionInner {
    pub(crate) state: RefCell<SessionState>,
    pub(crate) provider: Rc<dyn AncestorPathProvider>,
    pub(crate) reporter: Rc<dyn ErrorReporter>,
    pub(crate) config: DispatchConfig,
    /// Number of `dispatch_event` calls currently on the stack
    pub(crate) depth: Cell<usize>,
}

/// Builder for [`EventSession`]
pub struct SessionBuilder {
    provider: Rc<dyn AncestorPathProvider>,
    reporter: Rc<dyn ErrorReporter>,
    config: DispatchConfig,
}

impl SessionBuilder {
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default `tracing` error channel
    pub fn reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn build(self) -> EventSession {
        let state = SessionState {
            arena: HandlerArena::new(self.config.handler_capacity),
            registries: HashMap::new(),
            closed: false,
        };
        EventSession {
            inner: Rc::new(SessionInner {
                state: RefCell::new(state),
                provider: self.provider,
                reporter: self.reporter,
                config: self.config,
                depth: Cell::new(0),
            }),
        }
    }
}

/// Listener registries and dispatch for one browsing session
#[derive(Clone)]
pub struct EventSession {
    pub(crate) inner: Rc<SessionInner>,
}

impl EventSession {
    /// Session with default configuration and error channel
    pub fn new(provider: Rc<dyn AncestorPathProvider>) -> Self {
        Self::builder(provider).build()
    }

    pub fn builder(provider: Rc<dyn AncestorPathProvider>) -> SessionBuilder {
        SessionBuilder {
            provider,
            reporter: Rc::new(TracingReporter),
            config: DispatchConfig::default(),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// `target.addEventListener(type, callback, options)`
    ///
    /// Registering the same (type, capture, callback) twice is a silent no-op.
    /// Unsupported options fail before anything is registered.
    pub fn add_event_listener(
        &self,
        target: NodeId,
        event_type: &str,
        callback: Rc<dyn HostCallable>,
        options: impl Into<ListenerOptionsArg>,
    ) -> Result<(), EventError> {
        let capture = options.into().resolve()?;
        if event_type.is_empty() {
            return Err(EventError::EmptyEventType);
        }

        let mut state = self.inner.state.borrow_mut();
        if state.closed {
            return Err(EventError::SessionClosed);
        }

        let callback_id = callback.id();
        let registered = state
            .registries
            .get(&target)
            .is_some_and(|r| r.has(event_type, capture, callback_id).is_some());
        if registered {
            tracing::trace!("'{}' listener {:?} already on {}", event_type, callback_id, target);
            return Ok(());
        }

        let handler = state.arena.alloc(EventHandler::new(target, callback))?;
        state.registries.entry(target).or_default().add(Listener {
            event_type: event_type.to_string(),
            capture,
            callback_id,
            handler,
        });

        tracing::debug!(
            "addEventListener '{}' on {} (capture={}, callback={:?})",
            event_type,
            target,
            capture,
            callback_id
        );
        Ok(())
    }

    /// `target.removeEventListener(type, callback, capture)`
    ///
    /// Silent no-op when nothing matches.
    pub fn remove_event_listener(
        &self,
        target: NodeId,
        event_type: &str,
        callback: &dyn HostCallable,
        capture: bool,
    ) {
        let callback_id = callback.id();
        let mut state = self.inner.state.borrow_mut();
        let SessionState { arena, registries, .. } = &mut *state;

        let Some(registry) = registries.get_mut(&target) else {
            return;
        };
        if let Some(handler) = registry.remove(event_type, capture, callback_id) {
            arena.retire(handler);
            if registry.is_empty() {
                registries.remove(&target);
            }
            tracing::debug!(
                "removeEventListener '{}' on {} (capture={}, callback={:?})",
                event_type,
                target,
                capture,
                callback_id
            );
        }
    }

    /// Drop every listener on `target`. Called when the target is destroyed;
    /// repeated calls do nothing.
    pub fn remove_all_event_listeners(&self, target: NodeId) {
        let mut state = self.inner.state.borrow_mut();
        let SessionState { arena, registries, .. } = &mut *state;

        let Some(mut registry) = registries.remove(&target) else {
            return;
        };
        let released = registry.remove_all();
        for &handler in &released {
            arena.retire(handler);
        }
        tracing::debug!("Released {} listeners on {}", released.len(), target);
    }

    pub fn has_event_listener(
        &self,
        target: NodeId,
        event_type: &str,
        capture: bool,
        callback_id: CallbackId,
    ) -> bool {
        self.registry(target)
            .is_some_and(|r| r.has(event_type, capture, callback_id).is_some())
    }

    /// Whether any listener for `event_type` is registered on `target`
    pub fn has_listeners_for(&self, target: NodeId, event_type: &str) -> bool {
        self.registry(target).is_some_and(|r| r.has_type(event_type))
    }

    pub fn listener_count(&self, target: NodeId) -> usize {
        self.registry(target).map_or(0, |r| r.len())
    }

    /// Handler records allocated in the session arena, retired ones included
    pub fn allocated_handlers(&self) -> usize {
        self.inner.state.borrow().arena.len()
    }

    /// Release every registry and the handler arena in one go. Later
    /// registrations and dispatches fail with `SessionClosed`.
    pub fn teardown(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.closed {
            return;
        }
        let released = state.arena.len();
        state.registries.clear();
        state.arena.clear();
        state.closed = true;
        tracing::debug!("Event session torn down ({} handlers released)", released);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.borrow().closed
    }

    fn registry(&self, target: NodeId) -> Option<Ref<'_, ListenerRegistry>> {
        Ref::filter_map(self.inner.state.borrow(), |s| s.registries.get(&target)).ok()
    }
}

impl std::fmt::Debug for EventSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("EventSession")
            .field("targets", &state.registries.len())
            .field("handlers", &state.arena.live())
            .field("closed", &state.closed)
            .field("depth", &self.inner.depth.get())
            .finish()
    }
}
