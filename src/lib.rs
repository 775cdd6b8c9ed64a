//! Hot-reloadable route table with redirect routes.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RedirectRoute, RouteTable, RouteTableHandle, RouteTableReloader, RouteValues};
