//! # Shared Event Registry
//!
//! Identifier-based subscriptions: "listen on every bus that answers to X".
//!
//! A registry is an explicit object handed to each [`EventBus`] that should
//! consult it, via [`EventBus::with_shared`]. Buses merge the registry's
//! listeners with their own by priority; equal priorities put local
//! listeners first.
//!
//! [`EventBus`]: crate::EventBus
//! [`EventBus::with_shared`]: crate::EventBus::with_shared

use crate::{bus::ListenerHandle, event::WILDCARD, listener::Listener};
use std::{fmt, sync::Arc};

struct SharedRegistration {
    handle: ListenerHandle,
    identifier: String,
    event: String,
    priority: i32,
    listener: Arc<dyn Listener>,
}

/// Listeners keyed by bus identifier.
#[derive(Default)]
pub struct SharedEventRegistry {
    entries: Vec<SharedRegistration>,
    next_id: u64,
}

impl SharedEventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event` on every bus answering to `identifier`.
    ///
    /// The identifier `*` matches every bus.
    pub fn attach<L: Listener>(
        &mut self,
        identifier: impl Into<String>,
        event: impl Into<String>,
        listener: L,
        priority: i32,
    ) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_id);
        self.next_id += 1;
        self.entries.push(SharedRegistration {
            handle,
            identifier: identifier.into(),
            event: event.into(),
            priority,
            listener: Arc::new(listener),
        });
        handle
    }

    /// Remove one registration. Returns `false` if it was already removed.
    pub fn detach(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    /// Remove every registration for `identifier`, optionally limited to one event.
    pub fn clear_listeners(&mut self, identifier: &str, event: Option<&str>) {
        self.entries.retain(|e| {
            e.identifier != identifier || event.is_some_and(|event| e.event != event)
        });
    }

    /// Listeners registered for `event` under any of `identifiers`, in
    /// registration order.
    pub fn listeners<'a>(
        &'a self,
        identifiers: &'a [String],
        event: &'a str,
    ) -> impl Iterator<Item = (i32, &'a Arc<dyn Listener>)> + 'a {
        self.entries
            .iter()
            .filter(move |e| {
                (e.event == event || e.event == WILDCARD)
                    && (e.identifier == WILDCARD || identifiers.contains(&e.identifier))
            })
            .map(|e| (e.priority, &e.listener))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SharedEventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBus, MvcContext, Request};
    use std::sync::Mutex;

    #[test]
    fn bus_merges_shared_listeners_by_priority() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut shared = SharedEventRegistry::new();
        let o = Arc::clone(&order);
        shared.attach(
            "application",
            "route",
            move |_: &mut MvcContext, _: &EventBus| o.lock().unwrap().push("shared-high"),
            50,
        );
        let o = Arc::clone(&order);
        shared.attach(
            "other",
            "route",
            move |_: &mut MvcContext, _: &EventBus| o.lock().unwrap().push("other-bus"),
            100,
        );
        let o = Arc::clone(&order);
        shared.attach(
            WILDCARD,
            "route",
            move |_: &mut MvcContext, _: &EventBus| o.lock().unwrap().push("shared-tie"),
            1,
        );

        let mut bus = EventBus::with_shared(Arc::new(shared), ["application"]);
        let o = Arc::clone(&order);
        bus.attach(
            "route",
            move |_: &mut MvcContext, _: &EventBus| o.lock().unwrap().push("local-tie"),
            1,
        );

        bus.trigger("route", &mut MvcContext::new(Request::get("/")))
            .unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec!["shared-high", "local-tie", "shared-tie"]
        );
    }

    #[test]
    fn clear_listeners_by_identifier_and_event() {
        let mut shared = SharedEventRegistry::new();
        shared.attach("app", "route", |_: &mut MvcContext, _: &EventBus| (), 1);
        shared.attach("app", "finish", |_: &mut MvcContext, _: &EventBus| (), 1);
        let keep = shared.attach("other", "route", |_: &mut MvcContext, _: &EventBus| (), 1);

        shared.clear_listeners("app", Some("route"));
        assert_eq!(shared.len(), 2);

        shared.clear_listeners("app", None);
        assert_eq!(shared.len(), 1);
        assert!(shared.detach(keep));
        assert!(shared.is_empty());
    }
}
