//! Error view strategies for `dispatch.error` and `render.error`.
//!
//! Without one of these attached, an error leaves the response as the other
//! listeners produced it; there is no implicit error page.

use super::priority;
use sluice_core::{
    ActionResult, EventBus, ListenerAggregate, ListenerHandle, MvcContext, StatusCode, ViewModel,
    event,
};

/// Turns not-found errors into a 404 view.
///
/// Handles `ROUTER_NO_MATCH`, `CONTROLLER_NOT_FOUND` and `CONTROLLER_INVALID`
/// on `dispatch.error`, and also reshapes a plain 404 set by a controller
/// during `dispatch` into the same view.
#[derive(Debug, Clone)]
pub struct RouteNotFoundStrategy {
    template: String,
    display_reason: bool,
}

impl Default for RouteNotFoundStrategy {
    fn default() -> Self {
        Self::new("error/404")
    }
}

impl RouteNotFoundStrategy {
    /// Create a strategy rendering `template` for not-found pages.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            display_reason: false,
        }
    }

    /// Expose the error code and controller name in the view.
    pub fn display_reason(mut self, display: bool) -> Self {
        self.display_reason = display;
        self
    }

    /// Handle `dispatch.error`.
    pub fn on_dispatch_error(&self, ctx: &mut MvcContext) {
        let Some(error) = ctx.error() else {
            return;
        };
        if !error.code().is_not_found() {
            return;
        }
        let reason = error.code().as_str();
        let controller = error.controller().map(str::to_string);

        let mut view = self.not_found_view();
        if self.display_reason {
            view.set_variable("reason", reason);
            if let Some(controller) = controller {
                view.set_variable("controller", controller);
            }
        }
        ctx.response_mut().set_status(StatusCode::NOT_FOUND);
        ctx.set_result(view.into());
    }

    /// Handle `dispatch` after controllers ran.
    pub fn on_dispatch(&self, ctx: &mut MvcContext) {
        if ctx.response().status() != StatusCode::NOT_FOUND {
            return;
        }
        let already_shaped = match ctx.result() {
            Some(ActionResult::Response(_)) => true,
            Some(ActionResult::View(view)) => view.template() == Some(self.template.as_str()),
            _ => false,
        };
        if !already_shaped {
            ctx.set_result(self.not_found_view().into());
        }
    }

    fn not_found_view(&self) -> ViewModel {
        ViewModel::new()
            .with_template(&self.template)
            .with_variable("message", "Page not found.")
    }
}

impl ListenerAggregate for RouteNotFoundStrategy {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        let on_error = self.clone();
        let on_dispatch = self.clone();
        vec![
            bus.attach(
                event::DISPATCH_ERROR,
                move |ctx: &mut MvcContext, _: &EventBus| on_error.on_dispatch_error(ctx),
                priority::ERROR_VIEW,
            ),
            bus.attach(
                event::DISPATCH,
                move |ctx: &mut MvcContext, _: &EventBus| on_dispatch.on_dispatch(ctx),
                priority::NOT_FOUND_VIEW,
            ),
        ]
    }
}

/// Turns faults into a 500 view.
///
/// Handles every code that is not a not-found code, on both
/// `dispatch.error` and `render.error`.
#[derive(Debug, Clone)]
pub struct ExceptionStrategy {
    template: String,
    display_exceptions: bool,
}

impl Default for ExceptionStrategy {
    fn default() -> Self {
        Self::new("error")
    }
}

impl ExceptionStrategy {
    /// Create a strategy rendering `template` for error pages.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            display_exceptions: false,
        }
    }

    /// Expose the cause's message in the view.
    pub fn display_exceptions(mut self, display: bool) -> Self {
        self.display_exceptions = display;
        self
    }

    /// Handle `dispatch.error` or `render.error`.
    pub fn on_error(&self, ctx: &mut MvcContext) {
        let Some(error) = ctx.error() else {
            return;
        };
        if error.code().is_not_found() || ctx.result().is_some_and(ActionResult::is_response) {
            return;
        }

        let mut view = ViewModel::new().with_template(&self.template).with_variable(
            "message",
            "An error occurred during execution; please try again later.",
        );
        view.set_variable("reason", error.code().as_str());
        if self.display_exceptions {
            if let Some(cause) = error.cause() {
                view.set_variable("exception", cause.to_string());
            }
        }
        ctx.response_mut().set_status(StatusCode::INTERNAL_SERVER_ERROR);
        ctx.set_result(view.into());
    }
}

impl ListenerAggregate for ExceptionStrategy {
    fn attach(&self, bus: &mut EventBus) -> Vec<ListenerHandle> {
        [event::DISPATCH_ERROR, event::RENDER_ERROR]
            .into_iter()
            .map(|name| {
                let this = self.clone();
                bus.attach(
                    name,
                    move |ctx: &mut MvcContext, _: &EventBus| this.on_error(ctx),
                    priority::ERROR_VIEW,
                )
            })
            .collect()
    }
}
