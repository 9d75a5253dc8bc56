#![allow(dead_code)]

use sluice::{
    Application, ApplicationConfig, BoxError, EventBus, Listener, ListenerResult, MvcContext,
    Request, RouteMatch, ViewModel, controller::ControllerManager, routing::LiteralRouter,
    testing::RecordingSender,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Fixtures
// ============================================================================

/// `/path` → `path`, `/bad` → `bad`, `/mw` → middleware `auth`.
pub fn router() -> LiteralRouter {
    LiteralRouter::new()
        .route("path", "/path", [("controller", "path")])
        .and_then(|r| r.route("bad", "/bad", [("controller", "bad")]))
        .and_then(|r| r.route("mw", "/mw", [("middleware", "auth")]))
        .and_then(|r| r.route("missing", "/missing", [("controller", "missing")]))
        .expect("fixture routes are valid")
}

pub fn path_controller(_ctx: &mut MvcContext) -> ListenerResult {
    Ok(Some(
        ViewModel::new()
            .with_variable("content", "PathController")
            .into(),
    ))
}

/// `path` dispatches; `bad` fails to construct.
pub fn controllers() -> ControllerManager {
    ControllerManager::new()
        .register("path", path_controller)
        .register_factory("bad", || Err::<_, BoxError>("factory exploded".into()))
}

/// A bootstrapped application for `path` with a recording sender.
pub fn app(path: &str, config: ApplicationConfig) -> (Application, RecordingSender) {
    let sender = RecordingSender::new();
    let mut app = Application::builder()
        .request(Request::get(path))
        .router(router())
        .controllers(controllers())
        .sender(sender.clone())
        .config(config)
        .build();
    app.bootstrap(&[]).expect("bootstrap");
    (app, sender)
}

// ============================================================================
// Observers
// ============================================================================

/// Appends its label to a shared log every time it fires.
#[derive(Clone)]
pub struct Labelled {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl Labelled {
    pub fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log: Arc::clone(log),
        }
    }
}

impl Listener for Labelled {
    fn on_event(&self, _ctx: &mut MvcContext, _bus: &EventBus) -> ListenerResult {
        self.log.lock().unwrap().push(self.label.to_string());
        Ok(None)
    }
}

/// Records the route match seen at each event it is attached to.
#[derive(Clone, Default)]
pub struct RouteMatchSpy {
    pub seen: Arc<Mutex<Vec<(String, Option<RouteMatch>)>>>,
}

impl Listener for RouteMatchSpy {
    fn on_event(&self, ctx: &mut MvcContext, _bus: &EventBus) -> ListenerResult {
        self.seen
            .lock()
            .unwrap()
            .push((ctx.name().to_string(), ctx.route_match().cloned()));
        Ok(None)
    }
}
