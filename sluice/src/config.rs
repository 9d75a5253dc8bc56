//! Application configuration and builder.

use crate::application::Application;
use sluice_core::{
    ControllerResolver, EventBus, Renderer, Request, ResponseSender, Router,
    SharedEventRegistry,
};
use sluice_std::{controller::ControllerManager, listeners::ContentRenderer, routing::LiteralRouter};
use std::sync::Arc;

/// Identifier every application answers to in a [`SharedEventRegistry`].
pub const APPLICATION_IDENTIFIER: &str = "application";

/// Settings that shape the default listener set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    /// Expose error causes and codes in error views.
    pub display_exceptions: bool,
    /// Template of the not-found view.
    pub not_found_template: String,
    /// Template of the exception view.
    pub exception_template: String,
    /// Attach the not-found and exception view strategies.
    pub error_views: bool,
    /// Attach a logging listener to every event.
    pub log_events: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            display_exceptions: false,
            not_found_template: "error/404".to_string(),
            exception_template: "error".to_string(),
            error_views: false,
            log_events: false,
        }
    }
}

impl ApplicationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether error causes are shown.
    pub fn with_display_exceptions(mut self, display: bool) -> Self {
        self.display_exceptions = display;
        self
    }

    /// Set the not-found template.
    pub fn with_not_found_template(mut self, template: impl Into<String>) -> Self {
        self.not_found_template = template.into();
        self
    }

    /// Set the exception template.
    pub fn with_exception_template(mut self, template: impl Into<String>) -> Self {
        self.exception_template = template.into();
        self
    }

    /// Set whether error view strategies are attached.
    pub fn with_error_views(mut self, enabled: bool) -> Self {
        self.error_views = enabled;
        self
    }

    /// Set whether every event is logged.
    pub fn with_log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }
}

/// Collects an [`Application`]'s collaborators.
///
/// Every collaborator has a default: a `GET /` request, a router with no
/// routes, empty controller and middleware registries, the content renderer
/// and no response sender.
///
/// # Example
///
/// ```rust,ignore
/// let mut app = Application::builder()
///     .request(Request::get("/path"))
///     .router(router)
///     .controllers(controllers)
///     .sender(sender)
///     .build();
/// app.bootstrap(&[])?;
/// app.run()?;
/// ```
pub struct ApplicationBuilder {
    pub(crate) request: Request,
    pub(crate) router: Arc<dyn Router>,
    pub(crate) controllers: Arc<dyn ControllerResolver>,
    pub(crate) middleware: Arc<dyn ControllerResolver>,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) sender: Option<Arc<dyn ResponseSender>>,
    pub(crate) events: EventBus,
    pub(crate) config: ApplicationConfig,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self {
            request: Request::get("/"),
            router: Arc::new(LiteralRouter::new()),
            controllers: Arc::new(ControllerManager::new()),
            middleware: Arc::new(ControllerManager::new()),
            renderer: Arc::new(ContentRenderer),
            sender: None,
            events: EventBus::new(),
            config: ApplicationConfig::default(),
        }
    }
}

impl ApplicationBuilder {
    /// Create a builder with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request to serve.
    pub fn request(mut self, request: Request) -> Self {
        self.request = request;
        self
    }

    /// Set the router.
    pub fn router<R: Router + 'static>(self, router: R) -> Self {
        self.router_arc(Arc::new(router))
    }

    /// Set an already shared router.
    pub fn router_arc(mut self, router: Arc<dyn Router>) -> Self {
        self.router = router;
        self
    }

    /// Set the controller resolver.
    pub fn controllers<C: ControllerResolver + 'static>(self, controllers: C) -> Self {
        self.controllers_arc(Arc::new(controllers))
    }

    /// Set an already shared controller resolver.
    pub fn controllers_arc(mut self, controllers: Arc<dyn ControllerResolver>) -> Self {
        self.controllers = controllers;
        self
    }

    /// Set the middleware resolver.
    pub fn middleware<C: ControllerResolver + 'static>(mut self, middleware: C) -> Self {
        self.middleware = Arc::new(middleware);
        self
    }

    /// Set the view renderer.
    pub fn renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Send the final response through `sender` on `finish`.
    pub fn sender<S: ResponseSender + 'static>(self, sender: S) -> Self {
        self.sender_arc(Arc::new(sender))
    }

    /// Send the final response through an already shared sender.
    pub fn sender_arc(mut self, sender: Arc<dyn ResponseSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Start from `events` instead of an empty bus.
    ///
    /// Registrations already on the template fire alongside the defaults
    /// attached by [`Application::bootstrap`].
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Start from an empty bus that consults `shared` for listeners
    /// registered under [`APPLICATION_IDENTIFIER`].
    pub fn shared(self, shared: Arc<SharedEventRegistry>) -> Self {
        self.events(EventBus::with_shared(shared, [APPLICATION_IDENTIFIER]))
    }

    /// Set the configuration.
    pub fn config(mut self, config: ApplicationConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the application in the `Created` state.
    pub fn build(self) -> Application {
        Application::from_builder(self)
    }
}
