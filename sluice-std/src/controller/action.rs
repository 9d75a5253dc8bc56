//! Action-based controllers.

use super::plugin::{PluginManager, Plugins};
use sluice_core::{
    ACTION_PARAM, Dispatchable, IntoListenerResult, ListenerResult, MvcContext, StatusCode,
    ViewModel,
};
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::debug;

/// Action used when the route match does not name one.
pub const DEFAULT_ACTION: &str = "index";

type Action = Box<dyn Fn(&mut MvcContext, &Plugins) -> ListenerResult + Send + Sync>;

/// A controller that dispatches to one of several named actions.
///
/// The action is read from the route-match `action` parameter. An unknown
/// action sets a 404 status and returns a not-found view.
///
/// # Example
///
/// ```rust,ignore
/// let users = ActionController::new("users", plugins)
///     .action("index", |_ctx, _plugins| ViewModel::new().with_template("users/index"))
///     .action("view", |ctx, plugins| {
///         let id = plugins.params()?.from_route(ctx, "id").unwrap_or("0").to_string();
///         Ok::<_, BoxError>(ViewModel::new().with_variable("id", id))
///     });
/// ```
pub struct ActionController {
    name: String,
    actions: HashMap<String, Action>,
    plugins: Plugins,
}

impl ActionController {
    /// Create a controller with no actions.
    pub fn new(name: impl Into<String>, plugins: Arc<PluginManager>) -> Self {
        Self {
            name: name.into(),
            actions: HashMap::new(),
            plugins: Plugins::new(plugins),
        }
    }

    /// Register an action handler.
    pub fn action<F, R>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut MvcContext, &Plugins) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.actions.insert(
            name.into(),
            Box::new(move |ctx, plugins| handler(ctx, plugins).into_listener_result()),
        );
        self
    }

    /// The controller name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an action is registered under `name`.
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// The controller's plugin cache.
    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    fn not_found(ctx: &mut MvcContext) -> ListenerResult {
        ctx.response_mut().set_status(StatusCode::NOT_FOUND);
        Ok(Some(
            ViewModel::new()
                .with_template("not-found")
                .with_variable("content", "Page not found")
                .into(),
        ))
    }
}

impl Dispatchable for ActionController {
    fn dispatch(&self, ctx: &mut MvcContext) -> ListenerResult {
        let action = ctx
            .route_match()
            .map_or(DEFAULT_ACTION, |m| m.param_or(ACTION_PARAM, DEFAULT_ACTION))
            .to_string();

        match self.actions.get(&action) {
            Some(handler) => {
                debug!(controller = %self.name, action = %action, "running action");
                handler(ctx, &self.plugins)
            }
            None => {
                debug!(controller = %self.name, action = %action, "unknown action");
                Self::not_found(ctx)
            }
        }
    }
}

impl fmt::Debug for ActionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ActionController")
            .field("name", &self.name)
            .field("actions", &actions)
            .finish()
    }
}
