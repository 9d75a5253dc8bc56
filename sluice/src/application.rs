//! # Application
//!
//! Owns the event bus and the request context, and drives one request
//! through `route → dispatch → render → finish`.
//!
//! - `finish` fires exactly once per [`Application::run`], whatever happened
//!   before it.
//! - A response returned from `route` skips `dispatch` but is still rendered.
//! - A listener error raised during `route` or `dispatch` is recorded as
//!   `EXCEPTION` and escalated to `dispatch.error`. Errors raised during
//!   `render` or `finish` are returned to the caller.
//! - A failure inside a `dispatch.error` listener is returned to the caller
//!   and never escalated a second time.

use crate::config::{ApplicationBuilder, ApplicationConfig};
use sluice_core::{
    ActionResult, BoxError, ControllerResolver, ErrorCode, EscalationFailed, EventBus,
    ListenerAggregate, MvcContext, MvcError, Renderer, Request, ResponseSender, Router, event,
};
use sluice_std::listeners::{
    DispatchListener, ExceptionStrategy, LoggingListener, MiddlewareListener, RouteListener,
    RouteNotFoundStrategy, SendResponseListener, ViewListener,
};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by [`Application`].
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// `bootstrap` was called a second time.
    #[error("application is already bootstrapped")]
    AlreadyBootstrapped,

    /// `run` or `reset` was called before `bootstrap`.
    #[error("application is not bootstrapped")]
    NotBootstrapped,

    /// `run` was called again without a `reset`.
    #[error("application already ran; reset it with a new request first")]
    AlreadyRun,

    /// A listener failed outside the recoverable phases.
    #[error("listener failed during `{event}`")]
    Listener {
        /// The event being triggered.
        event: &'static str,
        /// The listener error.
        #[source]
        source: BoxError,
    },
}

/// Where an [`Application`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationState {
    /// Built, listeners not attached yet.
    Created,
    /// Listeners attached; ready to run.
    Bootstrapped,
    /// Triggering `route`.
    Routing,
    /// Triggering `dispatch`.
    Dispatching,
    /// Escalating a `route`/`dispatch` failure to `dispatch.error`.
    ErrorRecovery,
    /// Triggering `render`.
    Rendering,
    /// `finish` has fired.
    Finished,
}

/// The request pipeline orchestrator.
///
/// # Example
///
/// ```rust,ignore
/// let mut app = Application::builder()
///     .request(Request::get("/path"))
///     .router(LiteralRouter::new().route("path", "/path", [("controller", "path")])?)
///     .controllers(ControllerManager::new().register("path", path_controller))
///     .build();
///
/// app.bootstrap(&[])?;
/// let ctx = app.run()?;
/// assert_eq!(ctx.response().content(), "PathController");
/// ```
pub struct Application {
    config: ApplicationConfig,
    events: EventBus,
    context: MvcContext,
    router: Arc<dyn Router>,
    controllers: Arc<dyn ControllerResolver>,
    middleware: Arc<dyn ControllerResolver>,
    renderer: Arc<dyn Renderer>,
    sender: Option<Arc<dyn ResponseSender>>,
    state: ApplicationState,
}

impl Application {
    /// Start building an application.
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub(crate) fn from_builder(builder: ApplicationBuilder) -> Self {
        Self {
            config: builder.config,
            events: builder.events,
            context: MvcContext::new(builder.request),
            router: builder.router,
            controllers: builder.controllers,
            middleware: builder.middleware,
            renderer: builder.renderer,
            sender: builder.sender,
            state: ApplicationState::Created,
        }
    }

    /// Attach the default listeners plus `extra`, then fire `bootstrap`.
    ///
    /// The defaults are the route, middleware, dispatch and view listeners,
    /// plus the send-response, error-view and logging listeners when
    /// configured.
    pub fn bootstrap(&mut self, extra: &[&dyn ListenerAggregate]) -> Result<(), ApplicationError> {
        if self.state != ApplicationState::Created {
            return Err(ApplicationError::AlreadyBootstrapped);
        }

        let mut defaults: Vec<Box<dyn ListenerAggregate>> = vec![
            Box::new(RouteListener::new()),
            Box::new(MiddlewareListener::new(Arc::clone(&self.middleware))),
            Box::new(DispatchListener::new(Arc::clone(&self.controllers))),
            Box::new(ViewListener::new(Arc::clone(&self.renderer))),
        ];
        if let Some(sender) = &self.sender {
            defaults.push(Box::new(SendResponseListener::new(Arc::clone(sender))));
        }
        if self.config.error_views {
            defaults.push(Box::new(
                RouteNotFoundStrategy::new(&self.config.not_found_template)
                    .display_reason(self.config.display_exceptions),
            ));
            defaults.push(Box::new(
                ExceptionStrategy::new(&self.config.exception_template)
                    .display_exceptions(self.config.display_exceptions),
            ));
        }
        if self.config.log_events {
            defaults.push(Box::new(LoggingListener::new()));
        }

        for aggregate in &defaults {
            aggregate.attach(&mut self.events);
        }
        for aggregate in extra {
            aggregate.attach(&mut self.events);
        }

        self.prepare_context();
        self.state = ApplicationState::Bootstrapped;
        debug!(listeners = defaults.len() + extra.len(), "application bootstrapped");

        self.events
            .trigger(event::BOOTSTRAP, &mut self.context)
            .map_err(|source| ApplicationError::Listener {
                event: event::BOOTSTRAP,
                source,
            })?;
        Ok(())
    }

    /// Run the request through the pipeline and return the final context.
    pub fn run(&mut self) -> Result<&MvcContext, ApplicationError> {
        match self.state {
            ApplicationState::Created => return Err(ApplicationError::NotBootstrapped),
            ApplicationState::Bootstrapped => {}
            _ => return Err(ApplicationError::AlreadyRun),
        }

        let outcome = self.route_and_dispatch().and_then(|()| self.render());
        let finished = self.finish();
        self.state = ApplicationState::Finished;

        match (outcome, finished) {
            (Err(e), Err(finish_error)) => {
                warn!(error = %finish_error, "finish failed after an earlier failure");
                Err(e)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
            (Ok(()), Ok(())) => Ok(&self.context),
        }
    }

    /// Prepare a fresh context for `request`, keeping every registration.
    pub fn reset(&mut self, request: Request) -> Result<(), ApplicationError> {
        if self.state == ApplicationState::Created {
            return Err(ApplicationError::NotBootstrapped);
        }
        self.context = MvcContext::new(request);
        self.prepare_context();
        self.state = ApplicationState::Bootstrapped;
        Ok(())
    }

    /// The current state.
    pub fn state(&self) -> ApplicationState {
        self.state
    }

    /// The configuration.
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// The request context.
    pub fn context(&self) -> &MvcContext {
        &self.context
    }

    /// Mutable access to the request context.
    pub fn context_mut(&mut self) -> &mut MvcContext {
        &mut self.context
    }

    /// The event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable access to the event bus, for attaching listeners.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Consume the application, keeping the context.
    pub fn into_context(self) -> MvcContext {
        self.context
    }

    fn prepare_context(&mut self) {
        self.context.set_router(Arc::clone(&self.router));
    }

    fn route_and_dispatch(&mut self) -> Result<(), ApplicationError> {
        self.state = ApplicationState::Routing;
        self.guarded(event::ROUTE)?;
        if self.context.result().is_some_and(ActionResult::is_response) {
            debug!("route returned a response; skipping dispatch");
            return Ok(());
        }
        if self.context.is_error() {
            debug!(error = ?self.context.error_code(), "routing failed; skipping dispatch");
            return Ok(());
        }

        self.state = ApplicationState::Dispatching;
        self.guarded(event::DISPATCH)
    }

    /// Trigger a recoverable phase, keeping any response it returns.
    fn guarded(&mut self, phase: &'static str) -> Result<(), ApplicationError> {
        match self
            .events
            .trigger_until(phase, &mut self.context, ActionResult::is_response)
        {
            Ok(outcome) => {
                self.keep_response(outcome.into_last());
                Ok(())
            }
            Err(source) if source.is::<EscalationFailed>() => {
                warn!(event = phase, error = %source, "error listener failed");
                Err(ApplicationError::Listener {
                    event: event::DISPATCH_ERROR,
                    source,
                })
            }
            Err(source) => {
                warn!(event = phase, error = %source, "listener failed; escalating");
                self.state = ApplicationState::ErrorRecovery;
                let error = MvcError::new(ErrorCode::Exception).with_cause(source);
                let outcome = self
                    .events
                    .escalate(event::DISPATCH_ERROR, &mut self.context, error)
                    .map_err(|source| ApplicationError::Listener {
                        event: event::DISPATCH_ERROR,
                        source,
                    })?;
                self.keep_response(outcome.into_last());
                Ok(())
            }
        }
    }

    fn keep_response(&mut self, returned: Option<ActionResult>) {
        if let Some(ActionResult::Response(response)) = returned {
            self.context.set_result(ActionResult::Response(response));
        }
    }

    fn render(&mut self) -> Result<(), ApplicationError> {
        self.state = ApplicationState::Rendering;
        self.events
            .trigger(event::RENDER, &mut self.context)
            .map(drop)
            .map_err(|source| ApplicationError::Listener {
                event: event::RENDER,
                source,
            })
    }

    fn finish(&mut self) -> Result<(), ApplicationError> {
        debug!(status = %self.context.response().status(), "finishing request");
        self.events
            .trigger(event::FINISH, &mut self.context)
            .map(drop)
            .map_err(|source| ApplicationError::Listener {
                event: event::FINISH,
                source,
            })
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("events", &self.events)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_std::testing::RecordingListener;

    #[test]
    fn lifecycle_misuse_is_rejected() {
        let mut app = Application::builder().build();
        assert!(matches!(app.run(), Err(ApplicationError::NotBootstrapped)));
        assert!(matches!(
            app.reset(Request::get("/")),
            Err(ApplicationError::NotBootstrapped)
        ));

        app.bootstrap(&[]).unwrap();
        assert!(matches!(
            app.bootstrap(&[]),
            Err(ApplicationError::AlreadyBootstrapped)
        ));

        app.run().unwrap();
        assert_eq!(app.state(), ApplicationState::Finished);
        assert!(matches!(app.run(), Err(ApplicationError::AlreadyRun)));

        app.reset(Request::get("/again")).unwrap();
        assert_eq!(app.state(), ApplicationState::Bootstrapped);
        assert_eq!(app.run().unwrap().request().path(), "/again");
    }

    #[test]
    fn bootstrap_event_fires_once_after_defaults() {
        let recorder = RecordingListener::new();
        let mut app = Application::builder().build();
        app.events_mut().attach(event::BOOTSTRAP, recorder.clone(), 1);

        app.bootstrap(&[]).unwrap();

        assert_eq!(recorder.events(), [event::BOOTSTRAP]);
        assert!(app.context().router().is_some());
        assert_eq!(app.events().listener_count(event::ROUTE), 1);
        assert_eq!(app.events().listener_count(event::DISPATCH), 2);
        assert_eq!(app.events().listener_count(event::RENDER), 1);
    }
}
