//! Testing utilities for Sluice.
//!
//! This module provides stand-ins for the pipeline's collaborators so
//! listeners and applications can be exercised without real routing,
//! controllers, templates or transports.
//!
//! # Features
//!
//! - [`RecordingListener`]: A listener that records the events it sees
//! - [`CountingListener`]: A listener that only counts invocations
//! - [`StubRouter`]: A router with fixed path → route-match entries
//! - [`StubResolver`]: A resolver with fixed controllers and failure modes
//! - [`StaticController`] / [`FailingController`]: Canned controllers
//! - [`FailingRenderer`]: A renderer that always errors
//! - [`RecordingSender`]: A response sender that keeps what it was given

use sluice_core::{
    ActionResult, BoxError, CannotDispatch, ControllerResolver, Dispatchable, EventBus, Listener,
    ListenerResult, MvcContext, Renderer, Request, ResolveError, Response, ResponseSender,
    RouteMatch, Router, ViewModel,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records the name of every event it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// bus.attach("*", recorder.clone(), 1);
///
/// app.run()?;
///
/// assert_eq!(recorder.events(), ["route", "dispatch", "render", "finish"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<String>>>,
    response: Option<Response>,
    stop: bool,
}

impl RecordingListener {
    /// Create a recorder that returns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that returns `response` from every invocation.
    pub fn with_response(response: Response) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Create a recorder that stops propagation after recording.
    pub fn stopping() -> Self {
        Self {
            stop: true,
            ..Self::default()
        }
    }

    /// Get a copy of the recorded event names.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Listener for RecordingListener {
    fn on_event(&self, ctx: &mut MvcContext, _bus: &EventBus) -> ListenerResult {
        self.events.lock().unwrap().push(ctx.name().to_string());
        if self.stop {
            ctx.stop_propagation(true);
        }
        Ok(self.response.clone().map(ActionResult::Response))
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Listener for CountingListener {
    fn on_event(&self, _ctx: &mut MvcContext, _bus: &EventBus) -> ListenerResult {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

// ============================================================================
// Stub Router
// ============================================================================

/// A router mapping exact paths to canned route matches.
#[derive(Debug, Clone, Default)]
pub struct StubRouter {
    routes: HashMap<String, RouteMatch>,
}

impl StubRouter {
    /// Create a router that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `route_match` for requests to `path`.
    pub fn route(mut self, path: impl Into<String>, route_match: RouteMatch) -> Self {
        self.routes.insert(path.into(), route_match);
        self
    }
}

impl Router for StubRouter {
    fn match_request(&self, request: &Request) -> Option<RouteMatch> {
        self.routes.get(request.path()).cloned()
    }
}

// ============================================================================
// Stub Resolver
// ============================================================================

#[derive(Clone)]
enum Stub {
    Controller(Arc<dyn Dispatchable>),
    Invalid,
    Refusing,
    Failing(String),
}

/// A resolver with fixed entries, including each failure outcome.
#[derive(Clone, Default)]
pub struct StubResolver {
    entries: HashMap<String, Stub>,
}

impl StubResolver {
    /// Create a resolver that knows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` to `controller`.
    pub fn controller<D: Dispatchable + 'static>(
        mut self,
        name: impl Into<String>,
        controller: D,
    ) -> Self {
        self.entries
            .insert(name.into(), Stub::Controller(Arc::new(controller)));
        self
    }

    /// Resolve `name` to [`ResolveError::Invalid`].
    pub fn invalid(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), Stub::Invalid);
        self
    }

    /// Resolve `name` to [`ResolveError::CannotDispatch`].
    pub fn refusing(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), Stub::Refusing);
        self
    }

    /// Resolve `name` to [`ResolveError::Failed`] carrying `message`.
    pub fn failing(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), Stub::Failing(message.into()));
        self
    }
}

impl ControllerResolver for StubResolver {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Dispatchable>, ResolveError> {
        match self.entries.get(name) {
            Some(Stub::Controller(controller)) => Ok(Arc::clone(controller)),
            Some(Stub::Invalid) => Err(ResolveError::Invalid {
                name: name.to_string(),
                reason: "stub".to_string(),
            }),
            Some(Stub::Refusing) => Err(ResolveError::CannotDispatch(name.to_string())),
            Some(Stub::Failing(message)) => Err(ResolveError::Failed {
                name: name.to_string(),
                source: message.clone().into(),
            }),
            None => Err(ResolveError::NotFound(name.to_string())),
        }
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// A controller returning a copy of a fixed result.
#[derive(Debug, Clone)]
pub enum StaticController {
    /// Return this view.
    View(ViewModel),
    /// Return this response.
    Response(Response),
}

impl StaticController {
    /// A controller returning `view`.
    pub fn view(view: ViewModel) -> Self {
        StaticController::View(view)
    }

    /// A controller returning `response`.
    pub fn response(response: Response) -> Self {
        StaticController::Response(response)
    }
}

impl Dispatchable for StaticController {
    fn dispatch(&self, _ctx: &mut MvcContext) -> ListenerResult {
        Ok(Some(match self {
            StaticController::View(view) => ActionResult::View(view.clone()),
            StaticController::Response(response) => ActionResult::Response(response.clone()),
        }))
    }
}

/// A controller that always errors.
#[derive(Debug, Clone)]
pub struct FailingController {
    message: String,
    refuse: bool,
}

impl FailingController {
    /// Fail with a plain error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            refuse: false,
        }
    }

    /// Fail with [`CannotDispatch`] for the controller `name`.
    pub fn refusing(name: impl Into<String>) -> Self {
        Self {
            message: name.into(),
            refuse: true,
        }
    }
}

impl Dispatchable for FailingController {
    fn dispatch(&self, _ctx: &mut MvcContext) -> ListenerResult {
        if self.refuse {
            Err(CannotDispatch::new(self.message.clone(), "refused by test").into())
        } else {
            Err(self.message.clone().into())
        }
    }
}

// ============================================================================
// Renderer and Sender
// ============================================================================

/// A renderer that fails every call.
#[derive(Debug, Clone)]
pub struct FailingRenderer {
    message: String,
}

impl FailingRenderer {
    /// Fail with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Renderer for FailingRenderer {
    fn render(&self, _view: &ViewModel) -> Result<String, BoxError> {
        Err(self.message.clone().into())
    }
}

/// A sender that records every response it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<Response>>>,
}

impl RecordingSender {
    /// Create a new sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the sent responses.
    pub fn sent(&self) -> Vec<Response> {
        self.sent.lock().unwrap().clone()
    }
}

impl ResponseSender for RecordingSender {
    fn send(&self, response: &Response) -> Result<(), BoxError> {
        self.sent.lock().unwrap().push(response.clone());
        Ok(())
    }
}
