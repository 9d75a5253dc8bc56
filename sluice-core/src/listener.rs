//! # Listener Layer
//!
//! A listener receives the request context for one event and may:
//!
//! - do nothing (return `()` / `Ok(None)`),
//! - mutate the context,
//! - return a value (a [`Response`](crate::Response) is "response-like" and
//!   short-circuits `route` and `dispatch`),
//! - halt the current trigger via [`MvcContext::stop_propagation`],
//! - re-enter the bus it was called from (used for error escalation).
//!
//! Closures of the shape `Fn(&mut MvcContext, &EventBus) -> R` are listeners
//! whenever `R` implements [`IntoListenerResult`].

use crate::{
    bus::{EventBus, ListenerHandle},
    context::MvcContext,
    result::{IntoListenerResult, ListenerResult},
};

/// A callback attached to a named event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener`",
    label = "missing `Listener` implementation",
    note = "Implement `on_event`, or use a closure `Fn(&mut MvcContext, &EventBus) -> R`."
)]
pub trait Listener: Send + Sync + 'static {
    /// Called when the event this listener is attached to fires.
    fn on_event(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult;
}

// Blanket implementation: closures taking the context and the bus.
impl<F, R> Listener for F
where
    F: Fn(&mut MvcContext, &EventBus) -> R + Send + Sync + 'static,
    R: IntoListenerResult,
{
    fn on_event(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult {
        (self)(ctx, bus).into_listener_result()
    }
}

/// A group of related registrations attached in one step.
///
/// Aggregates choose their own events and priorities and return the handles
/// of everything they attached so the group can be detached later.
pub trait ListenerAggregate {
    /// Attach this aggregate's listeners to `bus`.
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle>;
}
