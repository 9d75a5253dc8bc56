//! Logging listener - observability for the pipeline.

use super::priority;
use sluice_core::{EventBus, ListenerAggregate, ListenerHandle, MvcContext, event};

/// Logs every event it sees and lets processing continue.
///
/// Attached to the wildcard event, so it observes the full lifecycle
/// including error events.
///
/// # Example
///
/// ```rust,ignore
/// use sluice_std::listeners::LoggingListener;
///
/// LoggingListener::named("frontend").attach(&mut bus);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingListener {
    name: &'static str,
    priority: i32,
}

impl LoggingListener {
    /// Create a `LoggingListener` with a default name.
    pub fn new() -> Self {
        Self::named("mvc")
    }

    /// Create a `LoggingListener` with a custom name.
    ///
    /// The name is used in log records to identify the application.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            priority: priority::LOGGING,
        }
    }

    /// Attach at a different priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Log the current state of `ctx`.
    pub fn log(&self, ctx: &MvcContext) {
        let route = ctx.route_match().map(|m| m.matched_route_name());
        match ctx.error() {
            Some(error) => tracing::info!(
                app = %self.name,
                event = ctx.name(),
                path = ctx.request().path(),
                route = ?route,
                error = %error,
                "mvc event"
            ),
            None => tracing::debug!(
                app = %self.name,
                event = ctx.name(),
                path = ctx.request().path(),
                route = ?route,
                status = ctx.response().status().as_u16(),
                "mvc event"
            ),
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerAggregate for LoggingListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = *self;
        vec![bus.attach(
            event::WILDCARD,
            move |ctx: &mut MvcContext, _: &EventBus| this.log(ctx),
            self.priority,
        )]
    }
}
