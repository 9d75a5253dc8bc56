//! # sluice-std
//!
//! Standard implementations for the Sluice MVC dispatch pipeline.
//!
//! This crate provides:
//! - **Phase listeners**: route, dispatch, middleware, view rendering and
//!   response sending, see [`listeners`]
//! - **Error views**: [`RouteNotFoundStrategy`] and [`ExceptionStrategy`]
//! - **Routers**: [`LiteralRouter`] and, with the `matchit` feature,
//!   [`MatchitRouter`]
//! - **Controllers**: [`ControllerManager`], [`ActionController`] and plugins
//! - **Testing**: stand-in collaborators, see [`testing`]
//!
//! [`RouteNotFoundStrategy`]: listeners::RouteNotFoundStrategy
//! [`ExceptionStrategy`]: listeners::ExceptionStrategy
//! [`LiteralRouter`]: routing::LiteralRouter
//! [`MatchitRouter`]: routing::MatchitRouter
//! [`ControllerManager`]: controller::ControllerManager
//! [`ActionController`]: controller::ActionController

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use sluice_core;

// Modules
pub mod controller;
pub mod listeners;
pub mod routing;
pub mod testing;

pub use listeners::priority;
