//! Listener return values.

use crate::{error::BoxError, request::Response, view::ViewModel};
use std::any::Any;

/// What a listener or controller produced.
///
/// A [`ActionResult::Response`] is "response-like": returned from `route` or
/// `dispatch` it short-circuits the rest of that event.
#[derive(Debug)]
pub enum ActionResult {
    /// A finished response.
    Response(Response),
    /// A model for the render phase.
    View(ViewModel),
    /// Anything else; left for render listeners to interpret.
    Data(Box<dyn Any + Send + Sync>),
}

impl ActionResult {
    /// Wrap an arbitrary value.
    pub fn data<T: Any + Send + Sync>(value: T) -> Self {
        ActionResult::Data(Box::new(value))
    }

    /// Whether this is a response.
    pub fn is_response(&self) -> bool {
        matches!(self, ActionResult::Response(_))
    }

    /// The response, if this is one.
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            ActionResult::Response(response) => Some(response),
            _ => None,
        }
    }

    /// The view model, if this is one.
    pub fn as_view(&self) -> Option<&ViewModel> {
        match self {
            ActionResult::View(view) => Some(view),
            _ => None,
        }
    }

    /// Mutable access to the view model, if this is one.
    pub fn as_view_mut(&mut self) -> Option<&mut ViewModel> {
        match self {
            ActionResult::View(view) => Some(view),
            _ => None,
        }
    }

    /// Downcast arbitrary data.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ActionResult::Data(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<Response> for ActionResult {
    fn from(response: Response) -> Self {
        ActionResult::Response(response)
    }
}

impl From<ViewModel> for ActionResult {
    fn from(view: ViewModel) -> Self {
        ActionResult::View(view)
    }
}

/// The outcome of a single listener invocation.
pub type ListenerResult = Result<Option<ActionResult>, BoxError>;

/// Trait for converting a listener's output into a [`ListenerResult`].
///
/// # Default Implementations
///
/// - `()` → no value
/// - `ActionResult`, `Response`, `ViewModel` → that value
/// - `Option<ActionResult>` → as is
/// - `Result<T, E>` → delegates to `T` or boxes the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoListenerResult`",
    label = "missing `IntoListenerResult` implementation",
    note = "Listener closures must return `()`, an `ActionResult`, or a `Result` of one."
)]
pub trait IntoListenerResult {
    /// Convert the output.
    fn into_listener_result(self) -> ListenerResult;
}

impl IntoListenerResult for () {
    fn into_listener_result(self) -> ListenerResult {
        Ok(None)
    }
}

impl IntoListenerResult for ActionResult {
    fn into_listener_result(self) -> ListenerResult {
        Ok(Some(self))
    }
}

impl IntoListenerResult for Response {
    fn into_listener_result(self) -> ListenerResult {
        Ok(Some(ActionResult::Response(self)))
    }
}

impl IntoListenerResult for ViewModel {
    fn into_listener_result(self) -> ListenerResult {
        Ok(Some(ActionResult::View(self)))
    }
}

impl IntoListenerResult for Option<ActionResult> {
    fn into_listener_result(self) -> ListenerResult {
        Ok(self)
    }
}

impl<T, E> IntoListenerResult for Result<T, E>
where
    T: IntoListenerResult,
    E: Into<BoxError>,
{
    fn into_listener_result(self) -> ListenerResult {
        match self {
            Ok(value) => value.into_listener_result(),
            Err(e) => Err(e.into()),
        }
    }
}
