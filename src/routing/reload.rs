//! Hot reload of the live route table.
//!
//! # Data Flow
//! ```text
//! register(source)
//!     → reload(source)                       initial load
//!     → notifier.listen(source, reload)      re-armed on every change
//!
//! reload(source)   (serialized per source)
//!     → compiler.compile(source)             Some(registrar) | None
//!     → new empty RouteTable
//!     → registrar.register_routes(&mut table)
//!     → handle.publish(table)                atomic swap
//! ```
//!
//! # Design Decisions
//! - Tables are built off to the side and swapped in whole; readers never see
//!   a half-populated table
//! - A source that compiles to nothing publishes an empty table instead of
//!   keeping the previous generation
//! - Reloads of the same source never overlap, whatever the notifier does

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::config::watcher::{ChangeNotifier, Subscription};
use crate::observability::metrics;
use crate::routing::registrar::{ConfigSource, RouteCompiler};
use crate::routing::table::{RouteTable, RouteTableHandle};

/// Errors raised when registering a configuration source.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// The configuration source identifier is empty.
    #[error("configuration source identifier is empty")]
    EmptySource,

    /// The change notifier could not watch the source.
    #[error("failed to watch {config}: {error}")]
    Watch {
        config: ConfigSource,
        #[source]
        error: notify::Error,
    },
}

/// Result of one reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    /// Generation number of the published table.
    pub generation: u64,
    /// Number of routes in the published table.
    pub routes: usize,
    /// Whether a registrar populated the table.
    pub registered: bool,
}

/// Compiles configuration sources into the live route table and keeps it
/// current as sources change.
pub struct RouteTableReloader {
    table: RouteTableHandle,
    compiler: Arc<dyn RouteCompiler>,
    notifier: Arc<dyn ChangeNotifier>,
    serials: Mutex<HashMap<ConfigSource, Arc<Mutex<()>>>>,
}

impl RouteTableReloader {
    pub fn new(
        table: RouteTableHandle,
        compiler: Arc<dyn RouteCompiler>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            table,
            compiler,
            notifier,
            serials: Mutex::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &RouteTableHandle {
        &self.table
    }

    /// Load `source` now and reload it on every change.
    ///
    /// Dropping the returned subscription stops the reloads.
    pub fn register(&self, source: ConfigSource) -> Result<Subscription, ReloadError> {
        if source.is_empty() {
            return Err(ReloadError::EmptySource);
        }

        let task = self.task_for(&source);
        task.run();

        let listener = task.clone();
        self.notifier
            .listen(&source, Box::new(move || {
                listener.run();
            }))
            .map_err(|error| ReloadError::Watch {
                config: source,
                error,
            })
    }

    /// Reload `source` once.
    pub fn reload(&self, source: &ConfigSource) -> ReloadOutcome {
        self.task_for(source).run()
    }

    fn task_for(&self, source: &ConfigSource) -> ReloadTask {
        let serial = self
            .serials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(source.clone())
            .or_default()
            .clone();

        ReloadTask {
            source: source.clone(),
            table: self.table.clone(),
            compiler: Arc::clone(&self.compiler),
            serial,
        }
    }
}

#[derive(Clone)]
struct ReloadTask {
    source: ConfigSource,
    table: RouteTableHandle,
    compiler: Arc<dyn RouteCompiler>,
    serial: Arc<Mutex<()>>,
}

impl ReloadTask {
    fn run(&self) -> ReloadOutcome {
        let _serial = self.serial.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = RouteTable::new();
        let registered = match self.compiler.compile(&self.source) {
            Some(registrar) => match registrar.register_routes(&mut table) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(source = %self.source, error = %e, "Route registration failed");
                    table.clear();
                    false
                }
            },
            None => {
                tracing::warn!(source = %self.source, "No route registrar produced; publishing empty table");
                false
            }
        };

        let routes = table.len();
        let generation = self.table.publish(table);
        metrics::record_reload(registered, routes);

        tracing::info!(
            source = %self.source,
            generation,
            routes,
            "Route table reloaded"
        );

        ReloadOutcome {
            generation,
            routes,
            registered,
        }
    }
}
