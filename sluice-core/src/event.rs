//! Names of the pipeline events.

/// Fired once by `bootstrap()` after default listeners are attached.
pub const BOOTSTRAP: &str = "bootstrap";
/// Matches the request against the router.
pub const ROUTE: &str = "route";
/// Invokes the matched controller or middleware.
pub const DISPATCH: &str = "dispatch";
/// Error recovery for failures during `route` or `dispatch`.
pub const DISPATCH_ERROR: &str = "dispatch.error";
/// Turns the dispatch result into response content.
pub const RENDER: &str = "render";
/// Error recovery for failures during `render`.
pub const RENDER_ERROR: &str = "render.error";
/// Always fired last; the flush point.
pub const FINISH: &str = "finish";

/// Listeners attached under this name receive every event.
pub const WILDCARD: &str = "*";

/// All lifecycle events in firing order.
pub const LIFECYCLE: [&str; 4] = [ROUTE, DISPATCH, RENDER, FINISH];
