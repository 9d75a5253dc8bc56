//! The `route` phase listener.

use super::priority;
use sluice_core::{
    ErrorCode, EventBus, ListenerAggregate, ListenerHandle, ListenerResult, MvcContext, MvcError,
    event,
};
use tracing::debug;

/// Matches the request against the context's router.
///
/// On success the route match is recorded and nothing is returned. On
/// failure the context enters `ROUTER_NO_MATCH` and `dispatch.error` fires
/// inline; its last value becomes this listener's return value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteListener;

impl RouteListener {
    /// Create the listener.
    pub fn new() -> Self {
        Self
    }

    /// Handle the `route` event.
    pub fn on_route(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult {
        let matched = ctx
            .router()
            .and_then(|router| router.match_request(ctx.request()));

        match matched {
            Some(route_match) => {
                debug!(
                    route = route_match.matched_route_name(),
                    path = ctx.request().path(),
                    "route matched"
                );
                ctx.set_route_match(route_match);
                Ok(None)
            }
            None => {
                let mut error = MvcError::new(ErrorCode::RouterNoMatch);
                if ctx.router().is_none() {
                    error = error.with_cause("no router attached to the request context");
                }
                let outcome = bus.escalate(event::DISPATCH_ERROR, ctx, error)?;
                Ok(outcome.into_last())
            }
        }
    }
}

impl ListenerAggregate for RouteListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = *self;
        vec![bus.attach(
            event::ROUTE,
            move |ctx: &mut MvcContext, bus: &EventBus| this.on_route(ctx, bus),
            priority::ROUTE,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingListener, StubRouter};
    use sluice_core::{Request, RouteMatch};
    use std::sync::Arc;

    fn bus_with_route() -> (EventBus, RecordingListener) {
        let mut bus = EventBus::new();
        RouteListener::new().attach(&mut bus);
        let errors = RecordingListener::new();
        bus.attach(event::DISPATCH_ERROR, errors.clone(), 1);
        (bus, errors)
    }

    #[test]
    fn records_match() {
        let (bus, errors) = bus_with_route();
        let mut ctx = MvcContext::new(Request::get("/path"));
        ctx.set_router(Arc::new(StubRouter::new().route(
            "/path",
            RouteMatch::new("path").with_param("controller", "path"),
        )));

        bus.trigger(event::ROUTE, &mut ctx).unwrap();

        assert_eq!(ctx.route_match().unwrap().matched_route_name(), "path");
        assert!(!ctx.is_error());
        assert_eq!(errors.count(), 0);
    }

    #[test]
    fn no_match_escalates() {
        let (bus, errors) = bus_with_route();
        let mut ctx = MvcContext::new(Request::get("/nowhere"));
        ctx.set_router(Arc::new(StubRouter::new()));

        bus.trigger(event::ROUTE, &mut ctx).unwrap();

        assert!(ctx.route_match().is_none());
        assert_eq!(ctx.error_code(), Some(ErrorCode::RouterNoMatch));
        assert_eq!(errors.events(), vec![event::DISPATCH_ERROR.to_string()]);
    }

    #[test]
    fn missing_router_is_no_match() {
        let (bus, _errors) = bus_with_route();
        let mut ctx = MvcContext::new(Request::get("/"));

        bus.trigger(event::ROUTE, &mut ctx).unwrap();

        let error = ctx.error().unwrap();
        assert_eq!(error.code(), ErrorCode::RouterNoMatch);
        assert!(error.cause().is_some());
    }
}
