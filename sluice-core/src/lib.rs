//! # sluice-core
//!
//! Core types for the Sluice MVC dispatch pipeline.
//!
//! This crate has minimal dependencies and is what listener and controller
//! authors import. Standard listeners live in `sluice-std`; the
//! `Application` that drives them lives in `sluice`.
//!
//! # Pipeline
//!
//! One request flows through four events, always in this order:
//!
//! ```text
//! route ──► dispatch ──► render ──► finish
//!   │          │           │
//!   └──────────┴─► dispatch.error   └─► render.error
//! ```
//!
//! - [`EventBus`] fires an event's listeners by priority and honours
//!   short-circuits.
//! - [`MvcContext`] is the state every listener reads and mutates.
//! - [`Listener`] is a callback; [`ListenerAggregate`] attaches a group.
//! - [`Router`], [`ControllerResolver`], [`Dispatchable`], [`Renderer`] and
//!   [`ResponseSender`] are the collaborators the pipeline consumes.
//!
//! # Error Types
//!
//! - [`ErrorCode`] / [`MvcError`] - Error state recorded in the context
//! - [`ResolveError`] - Controller lookup failures
//! - [`CannotDispatch`] - Controller refusal
//! - [`EscalationFailed`] - Failure inside an error event

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bus;
mod context;
mod controller;
mod error;
pub mod event;
mod listener;
mod request;
mod result;
mod router;
mod shared;
mod view;

// Re-exports
pub use bus::{DEFAULT_PRIORITY, EventBus, ListenerHandle, TriggerResult};
pub use context::MvcContext;
pub use controller::{ControllerResolver, Dispatchable};
pub use error::{BoxError, CannotDispatch, ErrorCode, EscalationFailed, MvcError, ResolveError};
pub use listener::{Listener, ListenerAggregate};
pub use request::{Request, Response, ResponseSender};
pub use result::{ActionResult, IntoListenerResult, ListenerResult};
pub use router::{ACTION_PARAM, CONTROLLER_PARAM, MIDDLEWARE_PARAM, RouteMatch, Router};
pub use shared::SharedEventRegistry;
pub use view::{Renderer, ViewModel};

/// Method, status and header types used by [`Request`] and [`Response`].
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
