//! # sluice - Event-Driven MVC Request Pipeline
//!
//! `sluice` drives a request through a fixed sequence of events,
//! `route → dispatch → render → finish`, on a priority-ordered event bus.
//! Listeners may short-circuit a phase by returning a response, and failures
//! in `route` or `dispatch` are recorded on the context and escalated to
//! `dispatch.error` instead of unwinding. `finish` always fires.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sluice::prelude::*;
//!
//! let router = LiteralRouter::new().route("home", "/", [("controller", "home")])?;
//! let controllers = ControllerManager::new().register("home", |_ctx: &mut MvcContext| {
//!     Ok(Some(ViewModel::new().with_variable("content", "Hello").into()))
//! });
//!
//! let mut app = Application::builder()
//!     .request(Request::get("/"))
//!     .router(router)
//!     .controllers(controllers)
//!     .build();
//!
//! app.bootstrap(&[])?;
//! assert_eq!(app.run()?.response().content(), "Hello");
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod application;
mod config;

pub use application::{Application, ApplicationError, ApplicationState};
pub use config::{APPLICATION_IDENTIFIER, ApplicationBuilder, ApplicationConfig};

pub use sluice_core::{
    // Results
    ActionResult,
    // Errors
    BoxError,
    CannotDispatch,
    // Collaborators
    ControllerResolver,
    // Bus
    DEFAULT_PRIORITY,
    Dispatchable,
    ErrorCode,
    EscalationFailed,
    EventBus,
    IntoListenerResult,
    // Listeners
    Listener,
    ListenerAggregate,
    ListenerHandle,
    ListenerResult,
    // Context
    MvcContext,
    MvcError,
    Renderer,
    // HTTP values
    Request,
    ResolveError,
    Response,
    ResponseSender,
    RouteMatch,
    Router,
    SharedEventRegistry,
    StatusCode,
    TriggerResult,
    ViewModel,
    event,
};

/// Standard listener implementations.
pub mod listeners {
    #![allow(clippy::wildcard_imports)]
    pub use sluice_std::listeners::*;
}

/// Router implementations.
pub mod routing {
    #![allow(clippy::wildcard_imports)]
    pub use sluice_std::routing::*;
}

/// Controller registry, action controllers and plugins.
pub mod controller {
    #![allow(clippy::wildcard_imports)]
    pub use sluice_std::controller::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use sluice_std::testing::*;
}

/// Prelude module - common imports for Sluice.
///
/// # Usage
///
/// ```rust,ignore
/// use sluice::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ActionResult, Application, ApplicationConfig, ApplicationError, BoxError,
        ControllerResolver, Dispatchable, ErrorCode, EventBus, Listener, ListenerAggregate,
        ListenerResult, MvcContext, Request, Response, RouteMatch, Router, StatusCode, ViewModel,
        controller::{ActionController, ControllerManager, PluginManager},
        event,
        routing::LiteralRouter,
    };
}
