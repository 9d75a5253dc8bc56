//! Controller-side collaborators.

use crate::{context::MvcContext, error::ResolveError, result::ListenerResult};
use std::sync::Arc;

/// Capability for "can handle a context and produce a result".
///
/// Return [`CannotDispatch`](crate::CannotDispatch) as the error to signal a
/// controller that was found but refuses the request; any other error is
/// treated as a fault.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not `Dispatchable`",
    label = "missing `Dispatchable` implementation",
    note = "Controllers and middleware must implement `dispatch`."
)]
pub trait Dispatchable: Send + Sync {
    /// Handle the request held by `ctx`.
    fn dispatch(&self, ctx: &mut MvcContext) -> ListenerResult;
}

impl<F> Dispatchable for F
where
    F: Fn(&mut MvcContext) -> ListenerResult + Send + Sync,
{
    fn dispatch(&self, ctx: &mut MvcContext) -> ListenerResult {
        (self)(ctx)
    }
}

/// Looks up a dispatchable by identifier.
///
/// Used for both controllers and middleware.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ControllerResolver`",
    label = "missing `ControllerResolver` implementation",
    note = "Resolvers must implement `resolve`."
)]
pub trait ControllerResolver: Send + Sync {
    /// Produce the dispatchable registered under `name`.
    fn resolve(&self, name: &str) -> Result<Arc<dyn Dispatchable>, ResolveError>;

    /// Whether anything is registered under `name`.
    fn has(&self, name: &str) -> bool {
        !matches!(self.resolve(name), Err(ResolveError::NotFound(_)))
    }
}
