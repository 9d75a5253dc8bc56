//! Request and response values carried through the pipeline.
//!
//! Parsing and writing HTTP happens outside the pipeline. These types hold
//! only what listeners read and mutate, built on the `http` crate's method,
//! status and header types.

use crate::error::BoxError;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header::HeaderName};

/// An inbound request handle.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
}

impl Request {
    /// Create a request for `target`, which may carry a `?query` suffix.
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method,
            path: if path.is_empty() { "/".into() } else { path.into() },
            query,
            headers: HeaderMap::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(target: impl AsRef<str>) -> Self {
        Self::new(Method::GET, target)
    }

    /// Shorthand for a `POST` request.
    pub fn post(target: impl AsRef<str>) -> Self {
        Self::new(Method::POST, target)
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path component, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Look up a single query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

/// The outbound response builder, mutated by listeners across phases.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    content: String,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// An empty `200 OK` response.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            content: String::new(),
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set the body content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// A `302 Found` response pointing at `location`.
    pub fn redirect(location: &str) -> Result<Self, BoxError> {
        let value = HeaderValue::from_str(location)?;
        Ok(Self::new()
            .with_status(StatusCode::FOUND)
            .with_header(http::header::LOCATION, value))
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Replace the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The body content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the body content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Append to the body content.
    pub fn append_content(&mut self, content: &str) {
        self.content.push_str(content);
    }

    /// Whether the status is a 3xx redirect.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }
}

/// Writes a finished response to the client.
///
/// Invoked from a `finish` listener; nothing it returns feeds back into the
/// pipeline except a failure.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ResponseSender`",
    label = "missing `ResponseSender` implementation",
    note = "Response senders must implement `send`."
)]
pub trait ResponseSender: Send + Sync {
    /// Emit the response.
    fn send(&self, response: &Response) -> Result<(), BoxError>;
}
