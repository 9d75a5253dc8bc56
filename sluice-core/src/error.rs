//! Error types for Sluice.
//!
//! - [`ErrorCode`] - The closed taxonomy recorded in a request context
//! - [`MvcError`] - An error code plus the controller and cause involved
//! - [`ResolveError`] - Outcome of a failed controller/middleware lookup
//! - [`CannotDispatch`] - Returned by a controller that refuses a request
//! - [`EscalationFailed`] - A listener failed while handling an error event

use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Symbolic error codes recorded in [`MvcContext`](crate::MvcContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The routing phase found no matching route.
    RouterNoMatch,
    /// The resolver could not locate the named controller.
    ControllerNotFound,
    /// The resolved object does not satisfy the dispatchable capability.
    ControllerInvalid,
    /// The controller was located but failed to handle the request.
    ControllerCannotDispatch,
    /// The matched middleware identifier could not be resolved or invoked.
    MiddlewareCannotDispatch,
    /// A fault occurred inside `route` or `dispatch`.
    Exception,
}

impl ErrorCode {
    /// The stable string form of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RouterNoMatch => "error-router-no-match",
            ErrorCode::ControllerNotFound => "error-controller-not-found",
            ErrorCode::ControllerInvalid => "error-controller-invalid",
            ErrorCode::ControllerCannotDispatch => "error-controller-cannot-dispatch",
            ErrorCode::MiddlewareCannotDispatch => "error-middleware-cannot-dispatch",
            ErrorCode::Exception => "error-exception",
        }
    }

    /// Whether the code describes a missing target rather than a fault.
    ///
    /// Not-found codes map to a 404; the rest to a 500.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::RouterNoMatch | ErrorCode::ControllerNotFound | ErrorCode::ControllerInvalid
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error state of a request: a code, the controller involved and the cause.
#[derive(Debug)]
pub struct MvcError {
    code: ErrorCode,
    controller: Option<String>,
    cause: Option<BoxError>,
}

impl MvcError {
    /// Create an error with no controller and no cause attached.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            controller: None,
            cause: None,
        }
    }

    /// Record the controller the error relates to.
    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The controller involved, if any.
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// The attached cause, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Take ownership of the attached cause.
    pub fn take_cause(&mut self) -> Option<BoxError> {
        self.cause.take()
    }
}

impl fmt::Display for MvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(controller) = &self.controller {
            write!(f, " (controller `{controller}`)")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Errors returned by a [`ControllerResolver`](crate::ControllerResolver).
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Nothing is registered under the name.
    #[error("no controller registered under `{0}`")]
    NotFound(String),

    /// Something is registered but it is not usable as a dispatchable.
    #[error("controller `{name}` is invalid: {reason}")]
    Invalid {
        /// The requested name.
        name: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The controller exists but refuses to dispatch.
    #[error("controller `{0}` cannot dispatch")]
    CannotDispatch(String),

    /// Creating the controller raised an error.
    #[error("failed to create controller `{name}`")]
    Failed {
        /// The requested name.
        name: String,
        /// The factory error.
        #[source]
        source: BoxError,
    },
}

impl ResolveError {
    /// Map the resolver outcome onto the context error taxonomy.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ResolveError::NotFound(_) => ErrorCode::ControllerNotFound,
            ResolveError::Invalid { .. } => ErrorCode::ControllerInvalid,
            ResolveError::CannotDispatch(_) => ErrorCode::ControllerCannotDispatch,
            ResolveError::Failed { .. } => ErrorCode::Exception,
        }
    }
}

/// Returned by a [`Dispatchable`](crate::Dispatchable) that was located but
/// cannot handle the current request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("controller `{controller}` cannot dispatch: {reason}")]
pub struct CannotDispatch {
    /// The controller that refused.
    pub controller: String,
    /// Why it refused.
    pub reason: String,
}

impl CannotDispatch {
    /// Create a refusal for the named controller.
    pub fn new(controller: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            reason: reason.into(),
        }
    }
}

/// Returned by [`EventBus::escalate`](crate::EventBus::escalate) when a
/// listener on the error event fails.
///
/// The error already recorded in the context is left untouched, so callers
/// can tell this apart from a fresh failure and must not escalate it again.
#[derive(Error, Debug)]
#[error("listener failed during `{event}`")]
pub struct EscalationFailed {
    /// The error event being triggered.
    pub event: String,
    /// The listener error.
    #[source]
    pub source: BoxError,
}
