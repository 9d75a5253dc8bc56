//! Standard listener implementations.
//!
//! Each listener is a [`ListenerAggregate`](sluice_core::ListenerAggregate)
//! that attaches itself at the priorities in [`priority`].

mod dispatch;
mod error_view;
mod logging;
mod middleware;
mod route;
mod send_response;
mod view;

pub use dispatch::DispatchListener;
pub use error_view::{ExceptionStrategy, RouteNotFoundStrategy};
pub use logging::LoggingListener;
pub use middleware::MiddlewareListener;
pub use route::RouteListener;
pub use send_response::SendResponseListener;
pub use view::{ContentRenderer, ViewListener};

/// Priorities the standard listeners attach at.
pub mod priority {
    /// `route`: match the request.
    pub const ROUTE: i32 = 1;
    /// `dispatch`: middleware runs ahead of controllers.
    pub const MIDDLEWARE: i32 = 2;
    /// `dispatch`: controller dispatch.
    pub const DISPATCH: i32 = 1;
    /// `dispatch`: shape a 404 set by a controller into a not-found view.
    pub const NOT_FOUND_VIEW: i32 = -90;
    /// `dispatch.error` / `render.error`: error view strategies.
    pub const ERROR_VIEW: i32 = 1;
    /// `render`: the default view strategy runs last.
    pub const RENDER: i32 = -10000;
    /// `finish`: send the response after everything else.
    pub const SEND_RESPONSE: i32 = -10000;
    /// Logging runs ahead of everything.
    pub const LOGGING: i32 = 10000;
}
