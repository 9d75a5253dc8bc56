//! Controller-side building blocks.
//!
//! - [`ControllerManager`] - A name-keyed [`ControllerResolver`] with aliases and factories
//! - [`ActionController`] - Maps the route `action` parameter onto handlers
//! - [`PluginManager`] / [`Plugins`] - Lazily created helpers available to actions
//!
//! [`ControllerResolver`]: sluice_core::ControllerResolver

mod action;
mod manager;
mod plugin;

pub use action::{ActionController, DEFAULT_ACTION};
pub use manager::{ControllerManager, InvalidController};
pub use plugin::{
    PARAMS_PLUGIN, Params, PluginError, PluginManager, Plugins, REDIRECT_PLUGIN, Redirect,
};
