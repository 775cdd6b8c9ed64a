//! Compiles route configuration files into registrars.
//!
//! # Responsibilities
//! - Load and validate a routes file (loader.rs, validation.rs)
//! - Turn route and redirect definitions into table entries
//!
//! # Design Decisions
//! - Load failures are logged here and yield no registrar
//! - Redirects are registered ahead of plain routes so a redirect wins when
//!   both patterns match the same request
//! - Redirect targets are resolved by route name at registration time

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::loader::load_config;
use crate::config::schema::{RedirectConfig, RouteConfig, RouterConfig};
use crate::routing::error::RouteError;
use crate::routing::pattern::PatternRoute;
use crate::routing::redirect::RedirectRoute;
use crate::routing::registrar::{ConfigSource, RouteCompiler, RouteRegistrar};
use crate::routing::route::{RequestContext, Route, StaticResponse};
use crate::routing::table::RouteTable;

/// Compiles TOML route files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlRouteCompiler;

impl RouteCompiler for TomlRouteCompiler {
    fn compile(&self, source: &ConfigSource) -> Option<Box<dyn RouteRegistrar>> {
        match load_config(source.path()) {
            Ok(config) => Some(Box::new(ConfigRegistrar::from(config))),
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Failed to load route configuration");
                None
            }
        }
    }
}

/// Registers the routes and redirects of one configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistrar {
    routes: Vec<RouteConfig>,
    redirects: Vec<RedirectConfig>,
}

impl ConfigRegistrar {
    pub fn new(routes: Vec<RouteConfig>, redirects: Vec<RedirectConfig>) -> Self {
        Self { routes, redirects }
    }
}

impl From<RouterConfig> for ConfigRegistrar {
    fn from(config: RouterConfig) -> Self {
        Self::new(config.routes, config.redirects)
    }
}

impl RouteRegistrar for ConfigRegistrar {
    fn register_routes(&self, table: &mut RouteTable) -> Result<(), RouteError> {
        let mut targets: HashMap<&str, Arc<dyn Route>> = HashMap::new();
        let mut compiled = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let status = StatusCode::from_u16(route.status).map_err(|_| RouteError::InvalidStatus(route.status))?;
            let pattern = PatternRoute::new(&route.pattern, StaticResponse::new(status, route.body.clone()))?
                .with_defaults(route.defaults.clone());
            let pattern: Arc<dyn Route> = Arc::new(pattern);
            targets.insert(route.name.as_str(), Arc::clone(&pattern));
            compiled.push((route.name.as_str(), pattern));
        }

        for redirect in &self.redirects {
            let target = targets
                .get(redirect.to.as_str())
                .cloned()
                .ok_or_else(|| RouteError::UnknownTarget {
                    name: redirect.to.clone(),
                })?;
            let source: Arc<dyn Route> = Arc::new(PatternRoute::new(&redirect.from, StaticResponse::not_found())?);
            let additional = (!redirect.values.is_empty()).then(|| redirect.values.clone());

            let mut entry = RedirectRoute::new(source, redirect.permanent).on_redirect(audit_redirect);
            entry.to_with_values(target, additional)?;

            match &redirect.name {
                Some(name) => table.add_named(name.as_str(), Arc::new(entry))?,
                None => table.add(Arc::new(entry)),
            }
        }

        for (name, route) in compiled {
            table.add_named(name, route)?;
        }
        Ok(())
    }
}

fn audit_redirect(ctx: &RequestContext, route: &RedirectRoute) {
    tracing::info!(
        path = %ctx.request().path(),
        values = ?ctx.route_values(),
        permanent = route.is_permanent(),
        "Redirect route selected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use crate::routing::route::{HandlerAction, RouteRequest};

    fn registered(toml: &str) -> RouteTable {
        let config = parse_config(toml).unwrap();
        let mut table = RouteTable::new();
        ConfigRegistrar::from(config).register_routes(&mut table).unwrap();
        table
    }

    #[test]
    fn test_registers_routes_and_redirects() {
        let table = registered(
            r#"
            [[routes]]
            name = "item"
            pattern = "/items/{id}"
            body = "item"

            [[redirects]]
            name = "legacy-item"
            from = "/old/{id}"
            to = "item"
            values = { lang = "en" }
            "#,
        );

        assert_eq!(table.len(), 2);
        assert!(table.get("item").is_some());
        assert!(table.get("legacy-item").is_some());

        let action = table.route(RouteRequest::new("/old/5").with_query("debug=1")).unwrap();
        assert_eq!(action, HandlerAction::redirect("~/items/5?debug=1", true));

        let action = table.route(RouteRequest::new("/items/5")).unwrap();
        assert_eq!(action, HandlerAction::Respond { status: StatusCode::OK, body: "item".into() });
    }

    #[test]
    fn test_redirect_wins_over_overlapping_route() {
        let table = registered(
            r#"
            [[routes]]
            name = "catalog"
            pattern = "/catalog/{id}"

            [[routes]]
            name = "item"
            pattern = "/items/{id}"

            [[redirects]]
            from = "/catalog/{id}"
            to = "item"
            permanent = false
            "#,
        );

        let action = table.route(RouteRequest::new("/catalog/7")).unwrap();
        assert_eq!(action, HandlerAction::redirect("~/items/7", false));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let registrar = ConfigRegistrar::new(
            Vec::new(),
            vec![RedirectConfig {
                name: None,
                from: "/old".into(),
                to: "missing".into(),
                permanent: true,
                values: Default::default(),
            }],
        );
        let mut table = RouteTable::new();
        assert_eq!(
            registrar.register_routes(&mut table).unwrap_err(),
            RouteError::UnknownTarget { name: "missing".into() }
        );
    }

    #[test]
    fn test_compile_missing_file_yields_nothing() {
        let compiler = TomlRouteCompiler;
        assert!(compiler.compile(&ConfigSource::new("/definitely/not/here.toml")).is_none());
    }
}
