//! Event dispatch
//!
//! Implements the DOM event propagation algorithm over the ancestor path:
//!   1. **Capture phase** - root → target's parent, capture listeners only.
//!   2. **At-target phase** - both kinds of listener on the target, in
//!      registration order.
//!   3. **Bubble phase** - target's parent → root, non-capture listeners only,
//!      and only for bubbling events.
//!
//! The listeners of each node are snapshotted when the node's step begins.
//! Listeners added during the step wait for the next dispatch; listeners
//! removed during the step are skipped if they have not run yet.
//!
//! Phase and current target live in a dispatch frame owned by the
//! `dispatch_event` call, so a listener that dispatches another event gets a
//! frame of its own and cannot disturb the outer one.

use std::cell::Cell;
use std::rc::Rc;

use crate::arena::HandlerId;
use crate::callback::HostCallable;
use crate::error::EventError;
use crate::event::{Event, EventPhase};
use crate::session::EventSession;
use crate::NodeId;

/// Per-dispatch propagation state
#[derive(Debug)]
struct DispatchFrame {
    target: NodeId,
    current_target: Option<NodeId>,
    phase: EventPhase,
    /// Root first, target last
    path: Vec<NodeId>,
}

impl DispatchFrame {
    fn new(target: NodeId, path: Vec<NodeId>) -> Self {
        Self {
            target,
            current_target: None,
            phase: EventPhase::None,
            path,
        }
    }

    fn enter(&mut self, node: NodeId, phase: EventPhase) {
        self.current_target = Some(node);
        self.phase = phase;
    }

    fn finish(&mut self) {
        self.current_target = None;
        self.phase = EventPhase::None;
    }
}

/// Tracks how many dispatches are on the stack
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// What a listener sees while it runs
pub struct Invocation<'a> {
    session: &'a EventSession,
    event: &'a mut Event,
    frame: &'a DispatchFrame,
    this: NodeId,
}

impl<'a> Invocation<'a> {
    /// Session the listener is registered in. Use it to add or remove
    /// listeners or to dispatch other events.
    pub fn session(&self) -> &'a EventSession {
        self.session
    }

    pub fn event(&self) -> &Event {
        &*self.event
    }

    pub fn event_mut(&mut self) -> &mut Event {
        &mut *self.event
    }

    /// Target the callback was bound to at registration
    pub fn this(&self) -> NodeId {
        self.this
    }

    pub fn target(&self) -> NodeId {
        self.frame.target
    }

    pub fn current_target(&self) -> NodeId {
        self.frame.current_target.unwrap_or(self.frame.target)
    }

    pub fn event_phase(&self) -> EventPhase {
        self.frame.phase
    }

    /// Propagation path, target first (as `Event.composedPath()`)
    pub fn composed_path(&self) -> Vec<NodeId> {
        self.frame.path.iter().rev().copied().collect()
    }

    pub fn prevent_default(&mut self) {
        self.event.prevent_default();
    }

    pub fn stop_propagation(&mut self) {
        self.event.stop_propagation();
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.event.stop_immediate_propagation();
    }
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("event_type", &self.event.event_type())
            .field("this", &self.this)
            .field("frame", self.frame)
            .finish()
    }
}

impl EventSession {
    /// `target.dispatchEvent(event)`
    ///
    /// Returns `Ok(false)` if a listener prevented the default action.
    /// Failures inside listeners go to the session's error reporter and do
    /// not stop the dispatch; a bad ancestor path aborts it before any
    /// listener runs.
    pub fn dispatch_event(&self, target: NodeId, event: &mut Event) -> Result<bool, EventError> {
        if event.is_dispatching() {
            return Err(EventError::AlreadyDispatching);
        }
        if event.event_type().is_empty() {
            return Err(EventError::EmptyEventType);
        }
        if self.is_closed() {
            return Err(EventError::SessionClosed);
        }

        let depth = self.inner.depth.get();
        if depth >= self.inner.config.max_dispatch_depth {
            return Err(EventError::RecursionLimit { depth: depth + 1 });
        }

        let path = self.inner.provider.path_to_root(target)?;
        if path.last() != Some(&target) {
            return Err(EventError::PathResolution {
                node: target,
                reason: "path does not end at the target".to_string(),
            });
        }

        let _depth = DepthGuard::enter(&self.inner.depth);
        let mut frame = DispatchFrame::new(target, path);
        event.begin_dispatch(target);
        tracing::debug!(
            "Dispatching '{}' at {} (bubbles={}, path length {}, depth {})",
            event.event_type(),
            target,
            event.bubbles(),
            frame.path.len(),
            depth + 1
        );

        self.propagate(&mut frame, event);
        frame.finish();
        event.end_dispatch();

        tracing::debug!(
            "Finished '{}' at {} (default prevented: {})",
            event.event_type(),
            target,
            event.default_prevented()
        );
        Ok(!event.default_prevented())
    }

    fn propagate(&self, frame: &mut DispatchFrame, event: &mut Event) {
        let target = frame.target;
        let ancestors = frame.path.len() - 1;

        for i in 0..ancestors {
            frame.enter(frame.path[i], EventPhase::Capturing);
            self.invoke_listeners(frame, event, Some(true));
            if event.propagation_stopped() {
                return;
            }
        }

        frame.enter(target, EventPhase::AtTarget);
        self.invoke_listeners(frame, event, None);
        if event.propagation_stopped() || !event.bubbles() {
            return;
        }

        for i in (0..ancestors).rev() {
            frame.enter(frame.path[i], EventPhase::Bubbling);
            self.invoke_listeners(frame, event, Some(false));
            if event.propagation_stopped() {
                return;
            }
        }
    }

    /// Run the listeners of the frame's current node. `capture = None`
    /// selects both kinds (target phase).
    fn invoke_listeners(&self, frame: &DispatchFrame, event: &mut Event, capture: Option<bool>) {
        let Some(node) = frame.current_target else {
            return;
        };
        let snapshot = self.snapshot(node, event.event_type(), capture);
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(
            "{:?} step on {}: {} listener(s) for '{}'",
            frame.phase,
            node,
            snapshot.len(),
            event.event_type()
        );

        for handler in snapshot {
            if event.immediate_propagation_stopped() {
                break;
            }
            // Removed since the snapshot was taken
            let Some((this, callback)) = self.live_handler(handler) else {
                continue;
            };

            let mut inv = Invocation {
                session: self,
                event: &mut *event,
                frame,
                this,
            };
            tracing::trace!("Invoking {:?} on {}", callback.id(), node);
            if let Err(err) = callback.invoke(&mut inv) {
                self.inner.reporter.report(node, event.event_type(), &err);
            }
        }
    }

    fn snapshot(&self, node: NodeId, event_type: &str, capture: Option<bool>) -> Vec<HandlerId> {
        self.inner
            .state
            .borrow()
            .registries
            .get(&node)
            .map(|r| r.snapshot(event_type, capture))
            .unwrap_or_default()
    }

    fn live_handler(&self, id: HandlerId) -> Option<(NodeId, Rc<dyn HostCallable>)> {
        let state = self.inner.state.borrow();
        let handler = state.arena.get(id).filter(|h| h.is_live())?;
        Some((handler.this(), Rc::clone(handler.callback())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{CallbackId, ScriptFunction};
    use crate::path::ParentMap;
    use std::cell::RefCell;

    /// root → parent → child
    fn setup() -> (EventSession, NodeId, NodeId, NodeId) {
        let tree = Rc::new(ParentMap::new());
        let (root, parent, child) = (NodeId::ROOT, NodeId(1), NodeId(2));
        tree.set_parent(parent, root);
        tree.set_parent(child, parent);
        (EventSession::new(tree), root, parent, child)
    }

    fn recorder(id: u64, log: &Rc<RefCell<Vec<String>>>, label: &str) -> Rc<ScriptFunction> {
        let log = log.clone();
        let label = label.to_string();
        Rc::new(ScriptFunction::new(CallbackId(id), move |inv| {
            log.borrow_mut().push(format!(
                "{}:{}:{}",
                label,
                inv.current_target().0,
                inv.event_phase().as_u16()
            ));
            Ok(())
        }))
    }

    #[test]
    fn test_full_propagation_order() {
        let (session, root, parent, child) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut id = 0;
        for node in [root, parent, child] {
            id += 1;
            session.add_event_listener(node, "click", recorder(id, &log, "capture"), true).unwrap();
        }
        for node in [root, parent, child] {
            id += 1;
            session.add_event_listener(node, "click", recorder(id, &log, "bubble"), false).unwrap();
        }

        let mut event = Event::bubbling("click");
        assert!(session.dispatch_event(child, &mut event).unwrap());

        assert_eq!(
            *log.borrow(),
            vec![
                "capture:0:1",
                "capture:1:1",
                "capture:2:2",
                "bubble:2:2",
                "bubble:1:3",
                "bubble:0:3",
            ]
        );
    }

    #[test]
    fn test_stop_propagation_finishes_current_node() {
        let (session, root, parent, child) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let stopper = Rc::new(ScriptFunction::new(CallbackId(1), move |inv| {
            l.borrow_mut().push("stopper".to_string());
            inv.stop_propagation();
            Ok(())
        }));
        session.add_event_listener(parent, "click", stopper, true).unwrap();
        session.add_event_listener(parent, "click", recorder(2, &log, "sibling"), true).unwrap();
        session.add_event_listener(child, "click", recorder(3, &log, "target"), false).unwrap();
        session.add_event_listener(root, "click", recorder(4, &log, "root"), false).unwrap();

        let mut event = Event::bubbling("click");
        session.dispatch_event(child, &mut event).unwrap();

        assert_eq!(*log.borrow(), vec!["stopper", "sibling:1:1"]);
    }

    #[test]
    fn test_stop_immediate_skips_remaining_listeners() {
        let (session, _root, parent, child) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let stopper = Rc::new(ScriptFunction::new(CallbackId(1), move |inv| {
            l.borrow_mut().push("first".to_string());
            inv.stop_immediate_propagation();
            Ok(())
        }));
        session.add_event_listener(child, "click", stopper, false).unwrap();
        session.add_event_listener(child, "click", recorder(2, &log, "second"), false).unwrap();
        session.add_event_listener(parent, "click", recorder(3, &log, "parent"), false).unwrap();

        let mut event = Event::bubbling("click");
        session.dispatch_event(child, &mut event).unwrap();

        assert_eq!(*log.borrow(), vec!["first"]);
        // Stop flags are cleared once dispatch is over
        assert!(!event.propagation_stopped());
    }

    #[test]
    fn test_phase_state_reset_after_dispatch() {
        let (session, _root, _parent, child) = setup();
        let mut event = Event::new("click");
        session.dispatch_event(child, &mut event).unwrap();

        assert_eq!(event.target(), Some(child));
        assert_eq!(event.current_target(), None);
        assert_eq!(event.phase(), EventPhase::None);
        assert!(!event.is_dispatching());
    }

    #[test]
    fn test_composed_path_is_target_first() {
        let (session, root, parent, child) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let cb = Rc::new(ScriptFunction::new(CallbackId(1), move |inv| {
            *s.borrow_mut() = inv.composed_path();
            Ok(())
        }));
        session.add_event_listener(root, "ping", cb, true).unwrap();

        session.dispatch_event(child, &mut Event::new("ping")).unwrap();
        assert_eq!(*seen.borrow(), vec![child, parent, root]);
    }

    #[test]
    fn test_path_must_end_at_target() {
        let provider = Rc::new(|_node: NodeId| Ok::<_, EventError>(vec![NodeId::ROOT]));
        let session = EventSession::new(provider);

        let mut event = Event::new("click");
        assert!(matches!(
            session.dispatch_event(NodeId(5), &mut event),
            Err(EventError::PathResolution { node: NodeId(5), .. })
        ));
        assert!(!event.is_dispatching());
    }
}
