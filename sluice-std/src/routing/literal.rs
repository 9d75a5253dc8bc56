//! Exact-path router.

use super::RouteBuildError;
use sluice_core::{Request, RouteMatch, Router};
use std::collections::HashMap;

/// Matches request paths exactly, returning a preconfigured route match.
///
/// # Example
///
/// ```rust,ignore
/// let router = LiteralRouter::new()
///     .route("home", "/", [("controller", "index")])?
///     .route("path", "/path", [("controller", "path")])?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LiteralRouter {
    routes: HashMap<String, RouteMatch>,
}

impl LiteralRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route named `name` for `path` with default parameters.
    pub fn route<I, K, V>(
        mut self,
        name: &str,
        path: &str,
        defaults: I,
    ) -> Result<Self, RouteBuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.routes.contains_key(path) {
            return Err(RouteBuildError::Conflict {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
        let route_match = defaults
            .into_iter()
            .fold(RouteMatch::new(name), |m, (k, v)| m.with_param(k, v));
        self.routes.insert(path.to_string(), route_match);
        Ok(self)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the router has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Router for LiteralRouter {
    fn match_request(&self, request: &Request) -> Option<RouteMatch> {
        self.routes.get(request.path()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_paths_only() {
        let router = LiteralRouter::new()
            .route("path", "/path", [("controller", "path")])
            .unwrap();

        let matched = router.match_request(&Request::get("/path?x=1")).unwrap();
        assert_eq!(matched.matched_route_name(), "path");
        assert_eq!(matched.param("controller"), Some("path"));
        assert!(router.match_request(&Request::get("/path/more")).is_none());
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let result = LiteralRouter::new()
            .route("a", "/", [("controller", "a")])
            .unwrap()
            .route("b", "/", [("controller", "b")]);
        assert!(matches!(result, Err(RouteBuildError::Conflict { .. })));
    }
}
