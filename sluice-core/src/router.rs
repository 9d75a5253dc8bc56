//! The routing collaborator and its match result.

use crate::request::Request;
use std::collections::HashMap;

/// Route-match parameter naming the controller to dispatch.
pub const CONTROLLER_PARAM: &str = "controller";
/// Route-match parameter naming the controller action.
pub const ACTION_PARAM: &str = "action";
/// Route-match parameter naming middleware to dispatch instead of a controller.
pub const MIDDLEWARE_PARAM: &str = "middleware";

/// The structured result of successful routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    route_name: String,
    params: HashMap<String, String>,
}

impl RouteMatch {
    /// A match for the named route with no parameters.
    pub fn new(route_name: impl Into<String>) -> Self {
        Self {
            route_name: route_name.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The matched route name.
    pub fn matched_route_name(&self) -> &str {
        &self.route_name
    }

    /// Replace the matched route name.
    pub fn set_matched_route_name(&mut self, name: impl Into<String>) {
        self.route_name = name.into();
    }

    /// Look up a parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Look up a parameter, falling back to `default`.
    pub fn param_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.param(name).unwrap_or(default)
    }

    /// Set a parameter, returning the previous value.
    pub fn set_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.params.insert(name.into(), value.into())
    }

    /// All parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Maps a request onto a [`RouteMatch`].
///
/// Pattern matching is the implementor's concern; the route phase only
/// records the outcome.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Router`",
    label = "missing `Router` implementation",
    note = "Routers must implement `match_request`."
)]
pub trait Router: Send + Sync {
    /// Match the request, or `None` when no route applies.
    fn match_request(&self, request: &Request) -> Option<RouteMatch>;
}
