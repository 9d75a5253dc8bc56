//! The `dispatch` phase listener for middleware routes.

use super::{dispatch, priority};
use sluice_core::{
    ActionResult, CannotDispatch, ControllerResolver, ErrorCode, EventBus, ListenerAggregate,
    ListenerHandle, ListenerResult, MIDDLEWARE_PARAM, MvcContext, MvcError, event,
};
use std::sync::Arc;
use tracing::debug;

/// Dispatches middleware named by the route match's `middleware` parameter.
///
/// Runs ahead of [`DispatchListener`] and declines routes that name no
/// middleware. Once it has handled a route it stops propagation so the
/// controller listener never sees the request.
///
/// [`DispatchListener`]: crate::listeners::DispatchListener
#[derive(Clone)]
pub struct MiddlewareListener {
    middleware: Arc<dyn ControllerResolver>,
}

impl MiddlewareListener {
    /// Create a listener resolving middleware through `middleware`.
    pub fn new(middleware: Arc<dyn ControllerResolver>) -> Self {
        Self { middleware }
    }

    /// Handle the `dispatch` event.
    pub fn on_dispatch(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult {
        if ctx.result().is_some_and(ActionResult::is_response) {
            return Ok(None);
        }
        let Some(name) = ctx
            .route_match()
            .and_then(|m| m.param(MIDDLEWARE_PARAM))
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let outcome = match self.middleware.resolve(&name) {
            Ok(middleware) => {
                debug!(middleware = %name, "dispatching middleware");
                ctx.set_controller_name(&name);
                match middleware.dispatch(ctx) {
                    Ok(returned) => dispatch::complete(ctx, returned),
                    Err(e) => {
                        let code = if e.is::<CannotDispatch>() {
                            ErrorCode::MiddlewareCannotDispatch
                        } else {
                            ErrorCode::Exception
                        };
                        let error = MvcError::new(code).with_controller(&name).with_cause(e);
                        dispatch::escalate(ctx, bus, error)
                    }
                }
            }
            Err(e) => {
                let error = MvcError::new(ErrorCode::MiddlewareCannotDispatch)
                    .with_controller(&name)
                    .with_cause(e);
                dispatch::escalate(ctx, bus, error)
            }
        };

        ctx.stop_propagation(true);
        outcome
    }
}

impl ListenerAggregate for MiddlewareListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = self.clone();
        vec![bus.attach(
            event::DISPATCH,
            move |ctx: &mut MvcContext, bus: &EventBus| this.on_dispatch(ctx, bus),
            priority::MIDDLEWARE,
        )]
    }
}
