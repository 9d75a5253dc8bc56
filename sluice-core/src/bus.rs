//! # Event Bus
//!
//! A synchronous, priority-ordered publish/subscribe dispatcher.
//!
//! - Listeners for an event fire in descending priority; ties fire in
//!   registration order.
//! - Each trigger clears the context's stop flag on entry and restores the
//!   caller's flag on exit, so a nested trigger never halts the loop that
//!   started it.
//! - Listener errors are returned to the caller untouched, except during
//!   [`EventBus::escalate`], which wraps them in [`EscalationFailed`].
//!
//! Registrations are immutable while a trigger runs. Cloning a bus is cheap
//! and yields an independent copy of its registrations, suitable as a
//! template for per-request applications.

use crate::{
    context::MvcContext,
    error::{BoxError, EscalationFailed, MvcError},
    event::WILDCARD,
    listener::Listener,
    result::ActionResult,
    shared::SharedEventRegistry,
};
use std::{cmp::Reverse, fmt, sync::Arc};
use tracing::{debug, trace, warn};

/// Default listener priority.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Identifies one registration for later detachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Clone)]
struct Registration {
    handle: ListenerHandle,
    event: String,
    priority: i32,
    listener: Arc<dyn Listener>,
}

/// The outcome of one trigger.
#[derive(Debug, Default)]
pub struct TriggerResult {
    stopped: bool,
    last: Option<ActionResult>,
}

impl TriggerResult {
    /// Whether a listener halted the loop.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// The last value a listener returned.
    pub fn last(&self) -> Option<&ActionResult> {
        self.last.as_ref()
    }

    /// Take the last value a listener returned.
    pub fn into_last(self) -> Option<ActionResult> {
        self.last
    }

    /// Whether the loop halted on a response-like value.
    pub fn short_circuited(&self) -> bool {
        self.stopped && self.last.as_ref().is_some_and(ActionResult::is_response)
    }
}

/// Priority-ordered dispatcher for named events.
#[derive(Clone, Default)]
pub struct EventBus {
    registrations: Vec<Registration>,
    next_id: u64,
    identifiers: Vec<String>,
    shared: Option<Arc<SharedEventRegistry>>,
}

impl EventBus {
    /// Create a bus with no listeners and no shared registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus that also consults `shared` for listeners registered
    /// under any of `identifiers`.
    pub fn with_shared<I, S>(shared: Arc<SharedEventRegistry>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            shared: Some(shared),
            ..Self::default()
        }
    }

    /// The identifiers this bus answers to in the shared registry.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// The shared registry, if one was supplied.
    pub fn shared(&self) -> Option<&Arc<SharedEventRegistry>> {
        self.shared.as_ref()
    }

    /// Register `listener` for `event` at `priority`.
    ///
    /// The same listener may be attached any number of times.
    pub fn attach<L: Listener>(
        &mut self,
        event: impl Into<String>,
        listener: L,
        priority: i32,
    ) -> ListenerHandle {
        self.attach_arc(event, Arc::new(listener), priority)
    }

    /// Register an already shared listener.
    pub fn attach_arc(
        &mut self,
        event: impl Into<String>,
        listener: Arc<dyn Listener>,
        priority: i32,
    ) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            handle,
            event: event.into(),
            priority,
            listener,
        });
        handle
    }

    /// Remove one registration. Returns `false` if it was already removed.
    pub fn detach(&mut self, handle: ListenerHandle) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.handle != handle);
        before != self.registrations.len()
    }

    /// Remove every registration for `event`.
    pub fn clear_listeners(&mut self, event: &str) {
        self.registrations.retain(|r| r.event != event);
    }

    /// Number of local registrations for `event`, wildcard ones excluded.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registrations.iter().filter(|r| r.event == event).count()
    }

    /// Every listener that fires for `event`, in firing order.
    fn listeners_for(&self, event: &str) -> Vec<Arc<dyn Listener>> {
        let local = self
            .registrations
            .iter()
            .filter(|r| r.event == event || r.event == WILDCARD)
            .map(|r| (r.priority, Arc::clone(&r.listener)));

        let mut ordered: Vec<(i32, Arc<dyn Listener>)> = local.collect();
        if let Some(shared) = &self.shared {
            ordered.extend(
                shared
                    .listeners(&self.identifiers, event)
                    .map(|(priority, listener)| (priority, Arc::clone(listener))),
            );
        }

        // Stable: equal priorities keep registration order, local before shared.
        ordered.sort_by_key(|(priority, _)| Reverse(*priority));
        ordered.into_iter().map(|(_, listener)| listener).collect()
    }

    /// Fire `event`, halting only when a listener stops propagation.
    pub fn trigger(&self, event: &str, ctx: &mut MvcContext) -> Result<TriggerResult, BoxError> {
        self.trigger_until(event, ctx, |_| false)
    }

    /// Fire `event`, additionally halting as soon as `until` accepts a
    /// listener's return value.
    pub fn trigger_until<P>(
        &self,
        event: &str,
        ctx: &mut MvcContext,
        until: P,
    ) -> Result<TriggerResult, BoxError>
    where
        P: FnMut(&ActionResult) -> bool,
    {
        let outer_stopped = ctx.is_propagation_stopped();
        ctx.set_name(event);
        ctx.stop_propagation(false);

        let outcome = self.run_listeners(event, ctx, until);

        ctx.stop_propagation(outer_stopped);
        outcome
    }

    fn run_listeners<P>(
        &self,
        event: &str,
        ctx: &mut MvcContext,
        mut until: P,
    ) -> Result<TriggerResult, BoxError>
    where
        P: FnMut(&ActionResult) -> bool,
    {
        let mut result = TriggerResult::default();

        for (index, listener) in self.listeners_for(event).into_iter().enumerate() {
            trace!(event, index, "invoking listener");
            let returned = listener.on_event(ctx, self)?;

            if let Some(value) = returned {
                let halt = until(&value);
                result.last = Some(value);
                if halt {
                    debug!(event, index, "listener short-circuited");
                    result.stopped = true;
                    return Ok(result);
                }
            }

            if ctx.is_propagation_stopped() {
                debug!(event, index, "propagation stopped");
                result.stopped = true;
                return Ok(result);
            }
        }

        Ok(result)
    }

    /// Record `error` on the context and synchronously fire `event`
    /// (normally `dispatch.error` or `render.error`).
    ///
    /// A listener failure is returned as a boxed [`EscalationFailed`].
    pub fn escalate(
        &self,
        event: &str,
        ctx: &mut MvcContext,
        error: MvcError,
    ) -> Result<TriggerResult, BoxError> {
        warn!(event, error = %error, "escalating to error event");
        ctx.set_error(error);
        self.trigger(event, ctx).map_err(|source| {
            Box::new(EscalationFailed {
                event: event.to_string(),
                source,
            }) as BoxError
        })
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("registrations", &self.registrations.len())
            .field("identifiers", &self.identifiers)
            .field("shared", &self.shared.is_some())
            .finish()
    }
}
