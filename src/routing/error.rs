//! Routing error definitions.

use thiserror::Error;

/// Errors raised while building or populating a route table.
///
/// These indicate a caller or configuration bug and surface at the call
/// site. A target route that cannot generate a path at request time is not
/// an error; it dispatches as `404 Not Found`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The redirect already has a target route.
    #[error("redirect target route is already bound")]
    TargetAlreadyBound,

    /// The redirect already has additional route values.
    #[error("redirect additional route values are already bound")]
    ValuesAlreadyBound,

    /// A redirect named a target route the table does not contain.
    #[error("unknown redirect target route '{name}'")]
    UnknownTarget { name: String },

    /// Two routes were registered under the same name.
    #[error("route name '{0}' is already registered")]
    DuplicateName(String),

    /// The matching engine rejected a route pattern.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A configured response status is not a valid HTTP status code.
    #[error("invalid response status {0}")]
    InvalidStatus(u16),

    /// A value could not be represented as a set of route values.
    #[error("route values must be a key/value map: {0}")]
    InvalidValues(String),
}
