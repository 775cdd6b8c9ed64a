//! Route tables and the live-table handle.
//!
//! # Responsibilities
//! - Store routes in registration order, with an optional name index
//! - Match requests (first match wins) and dispatch them
//! - Generate URLs, by route name when the values carry a name tag
//! - Publish whole new tables atomically
//!
//! # Design Decisions
//! - A `RouteTable` is immutable once published; reloads build a new one
//! - Readers load an `Arc` snapshot through `arc-swap` and never lock
//! - A request that loaded a snapshot finishes against that snapshot, even if
//!   a reload publishes a newer table meanwhile

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::error::RouteError;
use crate::routing::route::{HandlerAction, RequestContext, Route, RouteMatch, RouteRequest, VirtualPath};
use crate::routing::values::RouteValues;

/// An ordered collection of routes.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<Arc<dyn Route>>,
    names: HashMap<String, usize>,
    generation: u64,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unnamed route.
    pub fn add(&mut self, route: Arc<dyn Route>) {
        self.entries.push(route);
    }

    /// Append a route reachable by `name` for URL generation.
    pub fn add_named(&mut self, name: impl Into<String>, route: Arc<dyn Route>) -> Result<(), RouteError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RouteError::DuplicateName(name));
        }
        self.names.insert(name, self.entries.len());
        self.entries.push(route);
        Ok(())
    }

    /// Remove every route.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.names.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Route>> {
        self.names.get(name).map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generation number assigned when the table was published (0 if never).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Route>> {
        self.entries.iter()
    }

    /// First route matching `request`, in registration order.
    pub fn match_request(&self, request: &RouteRequest) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|route| route.match_request(request))
    }

    /// Match and dispatch `request`. `None` when no route matches.
    pub fn route(&self, request: RouteRequest) -> Option<HandlerAction> {
        let matched = self.match_request(&request)?;
        Some(matched.dispatch(request))
    }

    /// Generate a URL for `values`.
    ///
    /// Values tagged with a route name generate through that route only,
    /// without the tag. Otherwise each route is tried in order.
    pub fn generate_url(&self, ctx: &RequestContext, values: &RouteValues) -> Option<VirtualPath> {
        if let Some(name) = values.route_name() {
            return self.get(name)?.generate_url(ctx, &values.without_route_name());
        }
        self.entries
            .iter()
            .find_map(|route| route.generate_url(ctx, values))
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("generation", &self.generation)
            .field("routes", &self.entries.len())
            .field("names", &self.names.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Shared handle to the live route table.
#[derive(Clone)]
pub struct RouteTableHandle {
    current: Arc<ArcSwap<RouteTable>>,
    generations: Arc<AtomicU64>,
}

impl RouteTableHandle {
    /// A handle to an empty, never-published table.
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(RouteTable::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the live table.
    pub fn load(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    /// Replace the live table with `table`, returning its generation number.
    pub fn publish(&self, mut table: RouteTable) -> u64 {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        table.generation = generation;
        self.current.store(Arc::new(table));
        generation
    }
}

impl Default for RouteTableHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteTableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTableHandle")
            .field("current", &*self.current.load())
            .finish()
    }
}
