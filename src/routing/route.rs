//! Route matching and dispatch contracts.
//!
//! # Responsibilities
//! - Describe an incoming request as seen by route matching
//! - Define the matcher (`Route`) and dispatcher (`RouteHandler`) capabilities
//! - Describe the outcome of dispatch as a `HandlerAction`
//!
//! # Design Decisions
//! - Matching and dispatching are separate traits so one type can implement both
//! - A match borrows its handler from the table snapshot it came from
//! - Query strings are kept as raw pairs; nothing is decoded or re-encoded

use std::fmt;

use axum::http::StatusCode;

use crate::routing::values::RouteValues;

/// The parts of an HTTP request route matching looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Attach a raw query string (without the leading `?`).
    ///
    /// Pairs keep their original encoding. A bare key becomes a pair with an
    /// empty value.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Query pairs joined back as `key=value&...`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A request together with the route values matched for it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    request: RouteRequest,
    route_values: RouteValues,
}

impl RequestContext {
    pub fn new(request: RouteRequest, route_values: RouteValues) -> Self {
        Self {
            request,
            route_values,
        }
    }

    pub fn request(&self) -> &RouteRequest {
        &self.request
    }

    pub fn route_values(&self) -> &RouteValues {
        &self.route_values
    }
}

/// A generated path, relative to the application root (no leading `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath(String);

impl VirtualPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(path.as_ref().trim_start_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the response pipeline should do for a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerAction {
    /// Redirect to `location`. A leading `~/` stands for the application root.
    Redirect { location: String, permanent: bool },
    /// Reply with a bare status code.
    Status(StatusCode),
    /// Reply with a status code and a text body.
    Respond { status: StatusCode, body: String },
}

impl HandlerAction {
    pub fn redirect(location: impl Into<String>, permanent: bool) -> Self {
        Self::Redirect {
            location: location.into(),
            permanent,
        }
    }

    pub fn not_found() -> Self {
        Self::Status(StatusCode::NOT_FOUND)
    }

    /// The status code the response will carry.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Redirect { permanent: true, .. } => StatusCode::MOVED_PERMANENTLY,
            Self::Redirect { permanent: false, .. } => StatusCode::FOUND,
            Self::Status(status) | Self::Respond { status, .. } => *status,
        }
    }
}

/// Dispatcher capability: turns a selected match into a response action.
pub trait RouteHandler: Send + Sync {
    fn handler(&self, ctx: &RequestContext) -> HandlerAction;
}

/// Handler replying with a fixed status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResponse {
    status: StatusCode,
    body: String,
}

impl StaticResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "")
    }
}

impl RouteHandler for StaticResponse {
    fn handler(&self, _ctx: &RequestContext) -> HandlerAction {
        if self.body.is_empty() {
            HandlerAction::Status(self.status)
        } else {
            HandlerAction::Respond {
                status: self.status,
                body: self.body.clone(),
            }
        }
    }
}

/// Result of a successful match: the matched values and the handler that
/// will dispatch the request.
pub struct RouteMatch<'a> {
    values: RouteValues,
    handler: &'a dyn RouteHandler,
}

impl<'a> RouteMatch<'a> {
    pub fn new(values: RouteValues, handler: &'a dyn RouteHandler) -> Self {
        Self { values, handler }
    }

    pub fn values(&self) -> &RouteValues {
        &self.values
    }

    pub fn handler(&self) -> &'a dyn RouteHandler {
        self.handler
    }

    /// Keep the matched values but dispatch through `handler`.
    pub fn with_handler<'b>(self, handler: &'b dyn RouteHandler) -> RouteMatch<'b> {
        RouteMatch {
            values: self.values,
            handler,
        }
    }

    /// Dispatch `request` through the selected handler.
    pub fn dispatch(self, request: RouteRequest) -> HandlerAction {
        let ctx = RequestContext::new(request, self.values);
        self.handler.handler(&ctx)
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Matcher capability: recognizes requests and generates URLs.
pub trait Route: Send + Sync + fmt::Debug {
    /// Match `request`, returning the matched values and handler, or `None`.
    fn match_request(&self, request: &RouteRequest) -> Option<RouteMatch<'_>>;

    /// Generate a path for `values`, or `None` if this route cannot.
    fn generate_url(&self, ctx: &RequestContext, values: &RouteValues) -> Option<VirtualPath>;
}
