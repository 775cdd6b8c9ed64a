//! Compiler and registrar contracts used by hot reload.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::routing::error::RouteError;
use crate::routing::table::RouteTable;

/// Identifies one configuration source, e.g. a routes file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigSource(PathBuf);

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Populates a fresh route table.
pub trait RouteRegistrar: Send {
    fn register_routes(&self, table: &mut RouteTable) -> Result<(), RouteError>;
}

impl<F> RouteRegistrar for F
where
    F: Fn(&mut RouteTable) -> Result<(), RouteError> + Send,
{
    fn register_routes(&self, table: &mut RouteTable) -> Result<(), RouteError> {
        self(table)
    }
}

/// Turns a configuration source into a registrar.
///
/// Returns `None` when the source yields nothing usable; the compiler reports
/// its own diagnostics.
pub trait RouteCompiler: Send + Sync {
    fn compile(&self, source: &ConfigSource) -> Option<Box<dyn RouteRegistrar>>;
}

impl<F> RouteCompiler for F
where
    F: Fn(&ConfigSource) -> Option<Box<dyn RouteRegistrar>> + Send + Sync,
{
    fn compile(&self, source: &ConfigSource) -> Option<Box<dyn RouteRegistrar>> {
        self(source)
    }
}
