//! The `dispatch` phase listener for controllers.

use super::priority;
use sluice_core::{
    ActionResult, CONTROLLER_PARAM, CannotDispatch, ControllerResolver, ErrorCode, EventBus,
    ListenerAggregate, ListenerHandle, ListenerResult, MIDDLEWARE_PARAM, MvcContext, MvcError,
    event,
};
use std::sync::Arc;
use tracing::debug;

/// Controller name used when the route match does not name one.
pub const NOT_FOUND_CONTROLLER: &str = "not-found";

/// Resolves the controller named by the route match and dispatches it.
///
/// Declines (does nothing) when the route match names middleware and no
/// controller, leaving the request to [`MiddlewareListener`].
///
/// [`MiddlewareListener`]: crate::listeners::MiddlewareListener
#[derive(Clone)]
pub struct DispatchListener {
    controllers: Arc<dyn ControllerResolver>,
}

impl DispatchListener {
    /// Create a listener resolving controllers through `controllers`.
    pub fn new(controllers: Arc<dyn ControllerResolver>) -> Self {
        Self { controllers }
    }

    /// Handle the `dispatch` event.
    pub fn on_dispatch(&self, ctx: &mut MvcContext, bus: &EventBus) -> ListenerResult {
        if ctx.result().is_some_and(ActionResult::is_response) {
            return Ok(None);
        }
        let Some(route_match) = ctx.route_match() else {
            return Ok(None);
        };
        if route_match.param(MIDDLEWARE_PARAM).is_some()
            && route_match.param(CONTROLLER_PARAM).is_none()
        {
            return Ok(None);
        }

        let name = route_match
            .param_or(CONTROLLER_PARAM, NOT_FOUND_CONTROLLER)
            .to_string();
        ctx.set_controller_name(&name);

        let controller = match self.controllers.resolve(&name) {
            Ok(controller) => controller,
            Err(e) => {
                let error = MvcError::new(e.error_code())
                    .with_controller(&name)
                    .with_cause(e);
                return escalate(ctx, bus, error);
            }
        };

        debug!(controller = %name, "dispatching controller");
        ctx.set_controller(Arc::clone(&controller));
        match controller.dispatch(ctx) {
            Ok(returned) => complete(ctx, returned),
            Err(e) => {
                let code = if e.downcast_ref::<CannotDispatch>().is_some() {
                    ErrorCode::ControllerCannotDispatch
                } else {
                    ErrorCode::Exception
                };
                escalate(ctx, bus, MvcError::new(code).with_controller(&name).with_cause(e))
            }
        }
    }
}

impl ListenerAggregate for DispatchListener {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let this = self.clone();
        vec![bus.attach(
            event::DISPATCH,
            move |ctx: &mut MvcContext, bus: &EventBus| this.on_dispatch(ctx, bus),
            priority::DISPATCH,
        )]
    }
}

/// Fire `dispatch.error` and record whatever its listeners produced.
pub(crate) fn escalate(ctx: &mut MvcContext, bus: &EventBus, error: MvcError) -> ListenerResult {
    let outcome = bus.escalate(event::DISPATCH_ERROR, ctx, error)?;
    complete(ctx, outcome.into_last())
}

/// Store a dispatch outcome as the context result.
///
/// Responses are also returned so the caller can short-circuit on them.
pub(crate) fn complete(ctx: &mut MvcContext, returned: Option<ActionResult>) -> ListenerResult {
    match returned {
        Some(ActionResult::Response(response)) => {
            ctx.set_result(ActionResult::Response(response.clone()));
            Ok(Some(ActionResult::Response(response)))
        }
        Some(other) => {
            ctx.set_result(other);
            Ok(None)
        }
        None => Ok(None),
    }
}
