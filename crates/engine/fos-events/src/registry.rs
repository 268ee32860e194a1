//! Listener registry
//!
//! Per-target listener list keyed by (event type, capture, callback id),
//! kept in registration order.

use crate::arena::HandlerId;
use crate::callback::CallbackId;

/// A registered listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub event_type: String,
    pub capture: bool,
    pub callback_id: CallbackId,
    pub handler: HandlerId,
}

impl Listener {
    fn matches(&self, event_type: &str, capture: bool, callback_id: CallbackId) -> bool {
        self.capture == capture && self.callback_id == callback_id && self.event_type == event_type
    }
}

/// Listeners registered on one event target
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the entry for this key, if any
    pub fn has(&self, event_type: &str, capture: bool, callback_id: CallbackId) -> Option<&Listener> {
        self.listeners
            .iter()
            .find(|l| l.matches(event_type, capture, callback_id))
    }

    /// Append a listener. Returns false (and changes nothing) for a duplicate key.
    pub fn add(&mut self, listener: Listener) -> bool {
        if self
            .has(&listener.event_type, listener.capture, listener.callback_id)
            .is_some()
        {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Remove the entry for this key, returning its handler
    pub fn remove(&mut self, event_type: &str, capture: bool, callback_id: CallbackId) -> Option<HandlerId> {
        let pos = self
            .listeners
            .iter()
            .position(|l| l.matches(event_type, capture, callback_id))?;
        Some(self.listeners.remove(pos).handler)
    }

    /// Drop every entry, returning their handlers in registration order
    pub fn remove_all(&mut self) -> Vec<HandlerId> {
        self.listeners.drain(..).map(|l| l.handler).collect()
    }

    /// Handlers for `event_type` in registration order, copied out so the
    /// registry can change while they run. `capture = None` takes both kinds.
    pub fn snapshot(&self, event_type: &str, capture: Option<bool>) -> Vec<HandlerId> {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .filter(|l| capture.is_none_or(|c| l.capture == c))
            .map(|l| l.handler)
            .collect()
    }

    pub fn has_type(&self, event_type: &str) -> bool {
        self.listeners.iter().any(|l| l.event_type == event_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.listeners.iter()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener(event_type: &str, capture: bool, cb: u64, handler: u32) -> Listener {
        Listener {
            event_type: event_type.to_string(),
            capture,
            callback_id: CallbackId(cb),
            handler: HandlerId(handler),
        }
    }

    #[test]
    fn test_duplicate_key_is_skipped() {
        let mut registry = ListenerRegistry::new();
        assert!(registry.add(listener("click", false, 1, 0)));
        assert!(!registry.add(listener("click", false, 1, 1)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.has("click", false, CallbackId(1)).map(|l| l.handler), Some(HandlerId(0)));
    }

    #[test]
    fn test_capture_is_part_of_key() {
        let mut registry = ListenerRegistry::new();
        registry.add(listener("click", false, 1, 0));
        registry.add(listener("click", true, 1, 1));
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.remove("click", true, CallbackId(1)), Some(HandlerId(1)));
        assert!(registry.has("click", false, CallbackId(1)).is_some());
        assert_eq!(registry.remove("click", true, CallbackId(1)), None);
    }

    #[test]
    fn test_snapshot_filters_and_keeps_order() {
        let mut registry = ListenerRegistry::new();
        registry.add(listener("click", false, 1, 0));
        registry.add(listener("keydown", false, 2, 1));
        registry.add(listener("click", true, 3, 2));
        registry.add(listener("click", false, 4, 3));

        assert_eq!(registry.snapshot("click", Some(false)), vec![HandlerId(0), HandlerId(3)]);
        assert_eq!(registry.snapshot("click", Some(true)), vec![HandlerId(2)]);
        assert_eq!(
            registry.snapshot("click", None),
            vec![HandlerId(0), HandlerId(2), HandlerId(3)]
        );
        assert!(registry.snapshot("input", None).is_empty());
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        let mut registry = ListenerRegistry::new();
        registry.add(listener("click", false, 1, 0));
        registry.add(listener("focus", true, 2, 1));

        assert_eq!(registry.remove_all(), vec![HandlerId(0), HandlerId(1)]);
        assert!(registry.remove_all().is_empty());
        assert!(!registry.has_type("click"));
    }
}
