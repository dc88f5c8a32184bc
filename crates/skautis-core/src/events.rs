// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed publish/subscribe for call lifecycle events.

use std::sync::{Arc, Mutex, PoisonError};

use crate::query::SkautisQuery;
use crate::types::EventKind;

/// Callback invoked with every completed call of the subscribed kind.
pub type Listener = Arc<dyn Fn(&SkautisQuery) + Send + Sync>;

/// Ordered listener list keyed by [`EventKind`].
///
/// Listeners run synchronously, in subscription order, and cannot change
/// the outcome of the call that triggered them.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Mutex<Vec<(EventKind, Listener)>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener for one event kind.
    pub fn subscribe(&self, kind: EventKind, listener: Listener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, listener));
    }

    /// Whether any listener is subscribed, for any kind.
    pub fn has_listeners(&self) -> bool {
        !self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Number of listeners subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Invokes every listener of `kind` with the completed call.
    pub fn dispatch(&self, kind: EventKind, query: &SkautisQuery) {
        // Snapshot so listeners may subscribe further without deadlocking.
        let matching: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in matching {
            listener(query);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("success", &self.listener_count(EventKind::Success))
            .field("failure", &self.listener_count(EventKind::Failure))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PendingQuery;
    use serde_json::json;

    fn completed() -> SkautisQuery {
        PendingQuery::begin("Welcome", json!({})).succeeded(&json!(null))
    }

    #[test]
    fn dispatch_runs_listeners_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = EventDispatcher::new();
        for id in 1..=3 {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(
                EventKind::Success,
                Arc::new(move |_| seen.lock().unwrap().push(id)),
            );
        }

        dispatcher.dispatch(EventKind::Success, &completed());
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn dispatch_only_reaches_matching_kind() {
        let hits = Arc::new(Mutex::new(0));
        let dispatcher = EventDispatcher::new();
        let counter = Arc::clone(&hits);
        dispatcher.subscribe(
            EventKind::Failure,
            Arc::new(move |_| *counter.lock().unwrap() += 1),
        );

        dispatcher.dispatch(EventKind::Success, &completed());
        assert_eq!(*hits.lock().unwrap(), 0);
        assert!(dispatcher.has_listeners());
        assert_eq!(dispatcher.listener_count(EventKind::Failure), 1);
        assert_eq!(dispatcher.listener_count(EventKind::Success), 0);
    }

    #[test]
    fn empty_dispatcher_has_no_listeners() {
        let dispatcher = EventDispatcher::new();
        assert!(!dispatcher.has_listeners());
        dispatcher.dispatch(EventKind::Failure, &completed());
    }
}
