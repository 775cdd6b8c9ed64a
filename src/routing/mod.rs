//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → table.rs (live snapshot, first match wins)
//!     → route.rs contracts: Route::match_request → RouteMatch
//!         pattern.rs   plain routes
//!         redirect.rs  redirect routes (match via source, dispatch to target)
//!     → RouteHandler::handler → HandlerAction
//!
//! Table population:
//!     registrar.rs (RouteCompiler → RouteRegistrar)
//!     → reload.rs (build new table, publish atomically)
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once published; reloads replace them whole
//! - Deterministic: same input always matches same route
//! - Route values merge with explicit precedence (values.rs)

pub mod error;
pub mod pattern;
pub mod redirect;
pub mod registrar;
pub mod reload;
pub mod route;
pub mod table;
pub mod values;

pub use error::RouteError;
pub use pattern::PatternRoute;
pub use redirect::{OnRedirect, RedirectRoute};
pub use registrar::{ConfigSource, RouteCompiler, RouteRegistrar};
pub use reload::{ReloadError, ReloadOutcome, RouteTableReloader};
pub use route::{HandlerAction, RequestContext, Route, RouteHandler, RouteMatch, RouteRequest, StaticResponse, VirtualPath};
pub use table::{RouteTable, RouteTableHandle};
pub use values::{IntoRouteValues, RouteValues};
