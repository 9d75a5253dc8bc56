//! Matchit-based router implementation.
//!
//! Provides parameter and wildcard matching for paths (e.g. `/users/{id}`,
//! `/static/{*file}`). Captured segments become route-match parameters and
//! override the route's defaults.

use super::RouteBuildError;
use matchit::{InsertError, Match, Router as InnerRouter};
use sluice_core::{Request, RouteMatch, Router};

/// A router based on `matchit`.
pub struct MatchitRouter {
    router: InnerRouter<RouteMatch>,
    len: usize,
}

impl Default for MatchitRouter {
    fn default() -> Self {
        Self {
            router: InnerRouter::new(),
            len: 0,
        }
    }
}

impl MatchitRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route named `name` for the `pattern` with default parameters.
    pub fn route<I, K, V>(
        mut self,
        name: &str,
        pattern: &str,
        defaults: I,
    ) -> Result<Self, RouteBuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let route_match = defaults
            .into_iter()
            .fold(RouteMatch::new(name), |m, (k, v)| m.with_param(k, v));

        self.router
            .insert(pattern, route_match)
            .map_err(|e| match e {
                InsertError::Conflict { .. } => RouteBuildError::Conflict {
                    name: name.to_string(),
                    path: pattern.to_string(),
                },
                other => RouteBuildError::InvalidPattern {
                    name: name.to_string(),
                    path: pattern.to_string(),
                    reason: other.to_string(),
                },
            })?;
        self.len += 1;
        Ok(self)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the router has no routes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Router for MatchitRouter {
    fn match_request(&self, request: &Request) -> Option<RouteMatch> {
        let Match { value, params } = self.router.at(request.path()).ok()?;
        let mut route_match = value.clone();
        for (key, param) in params.iter() {
            route_match.set_param(key, param);
        }
        Some(route_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> MatchitRouter {
        MatchitRouter::new()
            .route("user", "/users/{id}", [("controller", "user"), ("action", "view")])
            .unwrap()
            .route("assets", "/static/{*file}", [("middleware", "assets")])
            .unwrap()
    }

    #[test]
    fn captures_parameters_over_defaults() {
        let matched = router().match_request(&Request::get("/users/42")).unwrap();
        assert_eq!(matched.matched_route_name(), "user");
        assert_eq!(matched.param("id"), Some("42"));
        assert_eq!(matched.param("controller"), Some("user"));
        assert_eq!(matched.param("action"), Some("view"));
    }

    #[test]
    fn catch_all_and_no_match() {
        let router = router();
        let matched = router
            .match_request(&Request::get("/static/css/site.css"))
            .unwrap();
        assert_eq!(matched.param("file"), Some("css/site.css"));
        assert!(router.match_request(&Request::get("/files/image.png")).is_none());
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn conflicting_route_is_rejected() {
        let result = router().route("again", "/users/{id}", [("controller", "other")]);
        assert!(matches!(result, Err(RouteBuildError::Conflict { .. })));
    }
}
