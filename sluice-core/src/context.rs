//! # Request State (MvcContext)
//!
//! The mutable state threaded through every listener of one request: the
//! request and response, the router, the route match, the dispatched
//! controller, the dispatch result and the error state.
//!
//! # Invariants
//!
//! - `request` and `response` always exist; a context is never built without them.
//! - `route_match` is `None` until routing succeeds.
//! - The context is in the error state exactly when an [`MvcError`] is
//!   recorded; [`MvcContext::is_error`] reads it directly.

use crate::{
    controller::Dispatchable,
    error::{ErrorCode, MvcError},
    request::{Request, Response},
    result::ActionResult,
    router::{RouteMatch, Router},
};
use std::{fmt, sync::Arc};

/// Per-request state shared by reference with every listener.
pub struct MvcContext {
    name: String,
    request: Request,
    response: Response,
    router: Option<Arc<dyn Router>>,
    route_match: Option<RouteMatch>,
    controller_name: Option<String>,
    controller: Option<Arc<dyn Dispatchable>>,
    result: Option<ActionResult>,
    error: Option<MvcError>,
    propagation_stopped: bool,
}

impl MvcContext {
    /// Create a context for `request` with a fresh response.
    pub fn new(request: Request) -> Self {
        Self::with_response(request, Response::new())
    }

    /// Create a context for `request` around an existing response.
    pub fn with_response(request: Request, response: Response) -> Self {
        Self {
            name: String::new(),
            request,
            response,
            router: None,
            route_match: None,
            controller_name: None,
            controller: None,
            result: None,
            error: None,
            propagation_stopped: false,
        }
    }

    /// The name of the event currently being triggered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the current event.
    ///
    /// The bus sets this on every trigger; renaming mid-event only affects
    /// what later listeners of the same trigger observe.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The inbound request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Mutable access to the inbound request.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// The outbound response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the outbound response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Replace the outbound response.
    pub fn set_response(&mut self, response: Response) {
        self.response = response;
    }

    /// The router, once bootstrap has attached one.
    pub fn router(&self) -> Option<&Arc<dyn Router>> {
        self.router.as_ref()
    }

    /// Attach the router.
    pub fn set_router(&mut self, router: Arc<dyn Router>) {
        self.router = Some(router);
    }

    /// The route match, once routing succeeded.
    pub fn route_match(&self) -> Option<&RouteMatch> {
        self.route_match.as_ref()
    }

    /// Mutable access to the route match.
    pub fn route_match_mut(&mut self) -> Option<&mut RouteMatch> {
        self.route_match.as_mut()
    }

    /// Record the route match.
    pub fn set_route_match(&mut self, route_match: RouteMatch) {
        self.route_match = Some(route_match);
    }

    /// The identifier of the dispatched controller.
    pub fn controller_name(&self) -> Option<&str> {
        self.controller_name.as_deref()
    }

    /// Record the identifier of the controller being dispatched.
    pub fn set_controller_name(&mut self, name: impl Into<String>) {
        self.controller_name = Some(name.into());
    }

    /// The resolved controller instance.
    pub fn controller(&self) -> Option<&Arc<dyn Dispatchable>> {
        self.controller.as_ref()
    }

    /// Record the resolved controller instance.
    pub fn set_controller(&mut self, controller: Arc<dyn Dispatchable>) {
        self.controller = Some(controller);
    }

    /// The dispatch result consumed by the render phase.
    pub fn result(&self) -> Option<&ActionResult> {
        self.result.as_ref()
    }

    /// Mutable access to the dispatch result.
    pub fn result_mut(&mut self) -> Option<&mut ActionResult> {
        self.result.as_mut()
    }

    /// Replace the dispatch result.
    pub fn set_result(&mut self, result: ActionResult) {
        self.result = Some(result);
    }

    /// Take the dispatch result out of the context.
    pub fn take_result(&mut self) -> Option<ActionResult> {
        self.result.take()
    }

    /// The recorded error.
    pub fn error(&self) -> Option<&MvcError> {
        self.error.as_ref()
    }

    /// Mutable access to the recorded error.
    pub fn error_mut(&mut self) -> Option<&mut MvcError> {
        self.error.as_mut()
    }

    /// The recorded error code.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(MvcError::code)
    }

    /// Enter the error state.
    ///
    /// The controller named by the error, if any, also becomes the context's
    /// controller name.
    pub fn set_error(&mut self, error: MvcError) {
        if let Some(controller) = error.controller() {
            self.controller_name = Some(controller.to_string());
        }
        self.error = Some(error);
    }

    /// Leave the error state, returning the error that was recorded.
    pub fn clear_error(&mut self) -> Option<MvcError> {
        self.error.take()
    }

    /// Whether processing is on the error-recovery path.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Halt (or resume) the current trigger loop after the running listener.
    pub fn stop_propagation(&mut self, stop: bool) {
        self.propagation_stopped = stop;
    }

    /// Whether the current trigger loop has been asked to halt.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl fmt::Debug for MvcContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MvcContext")
            .field("name", &self.name)
            .field("request", &self.request)
            .field("response", &self.response)
            .field("route_match", &self.route_match)
            .field("controller_name", &self.controller_name)
            .field("result", &self.result)
            .field("error", &self.error)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish_non_exhaustive()
    }
}
