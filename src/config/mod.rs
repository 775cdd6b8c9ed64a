//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → compiler.rs (ConfigRegistrar populates a fresh RouteTable)
//!
//! On change:
//!     watcher.rs detects change
//!     → routing::reload recompiles the file
//!     → atomic swap of the live RouteTable
//! ```
//!
//! # Design Decisions
//! - Listener, app and observability settings are read once at startup
//! - Routes and redirects are the hot-reloadable part of the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod compiler;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use compiler::{ConfigRegistrar, TomlRouteCompiler};
pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ListenerConfig, ObservabilityConfig, RedirectConfig, RouteConfig, RouterConfig};
pub use watcher::{ChangeNotifier, FileChangeNotifier, Subscription};
