//! Router implementations.
//!
//! - [`LiteralRouter`] - exact path matching, no dependencies
//! - [`MatchitRouter`] - parameterized paths (`/users/{id}`), behind the
//!   `matchit` feature

mod literal;
#[cfg(feature = "matchit")]
mod matchit;

pub use literal::LiteralRouter;
#[cfg(feature = "matchit")]
pub use self::matchit::MatchitRouter;

use thiserror::Error;

/// Errors raised while building a router.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteBuildError {
    /// Another route already claims the path.
    #[error("route `{name}` conflicts with an existing route for `{path}`")]
    Conflict {
        /// The rejected route.
        name: String,
        /// The contested path.
        path: String,
    },

    /// The path pattern could not be parsed.
    #[error("invalid pattern `{path}` for route `{name}`: {reason}")]
    InvalidPattern {
        /// The rejected route.
        name: String,
        /// The pattern.
        path: String,
        /// Parser message.
        reason: String,
    },
}
