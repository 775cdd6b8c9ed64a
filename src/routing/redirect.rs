//! Redirect routes.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → source route matches (values kept, handler swapped for the redirect)
//!     → redirect handler runs:
//!         on_redirect hook (audit only)
//!         → merge(additional values, matched values)   matched values win
//!         → target route generates a path
//!         → "~/" + path [+ "?" + raw query]          → 301 / 302
//!         → no path                                   → 404
//! ```
//!
//! # Design Decisions
//! - A redirect route is both the matcher and the dispatcher for its entries
//! - Matching is exactly the source route's matching, never stricter or looser
//! - Redirect routes never generate URLs, so URL generation skips them
//! - Target route and additional values bind at most once; once the route is
//!   shared through a table it is immutable

use std::fmt;
use std::sync::Arc;

use crate::routing::error::RouteError;
use crate::routing::route::{
    HandlerAction, RequestContext, Route, RouteHandler, RouteMatch, RouteRequest, VirtualPath,
};
use crate::routing::values::{merge, RouteValues};

/// Hook run when a redirect is dispatched. It cannot influence the outcome.
pub type OnRedirect = Arc<dyn Fn(&RequestContext, &RedirectRoute) + Send + Sync>;

/// A route that matches like `source` and redirects to `target`.
pub struct RedirectRoute {
    source: Arc<dyn Route>,
    target: Option<Arc<dyn Route>>,
    permanent: bool,
    additional_values: Option<RouteValues>,
    on_redirect: Option<OnRedirect>,
}

impl RedirectRoute {
    /// A redirect with no target yet; bind one with [`RedirectRoute::to`].
    pub fn new(source: Arc<dyn Route>, permanent: bool) -> Self {
        Self {
            source,
            target: None,
            permanent,
            additional_values: None,
            on_redirect: None,
        }
    }

    /// A fully specified redirect.
    pub fn with_target(
        source: Arc<dyn Route>,
        target: Arc<dyn Route>,
        permanent: bool,
        additional_values: Option<RouteValues>,
    ) -> Self {
        Self {
            source,
            target: Some(target),
            permanent,
            additional_values,
            on_redirect: None,
        }
    }

    /// Install the dispatch hook.
    pub fn on_redirect<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext, &RedirectRoute) + Send + Sync + 'static,
    {
        self.on_redirect = Some(Arc::new(hook));
        self
    }

    /// Bind the target route.
    pub fn to(&mut self, target: Arc<dyn Route>) -> Result<&mut Self, RouteError> {
        self.to_with_values(target, None)
    }

    /// Bind the target route together with additional route values.
    ///
    /// Fails without changing anything if either field is already bound.
    pub fn to_with_values(
        &mut self,
        target: Arc<dyn Route>,
        additional_values: Option<RouteValues>,
    ) -> Result<&mut Self, RouteError> {
        if self.target.is_some() {
            return Err(RouteError::TargetAlreadyBound);
        }
        if self.additional_values.is_some() {
            return Err(RouteError::ValuesAlreadyBound);
        }
        self.target = Some(target);
        self.additional_values = additional_values;
        Ok(self)
    }

    pub fn source(&self) -> &Arc<dyn Route> {
        &self.source
    }

    pub fn target(&self) -> Option<&Arc<dyn Route>> {
        self.target.as_ref()
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    pub fn additional_values(&self) -> Option<&RouteValues> {
        self.additional_values.as_ref()
    }
}

impl Route for RedirectRoute {
    fn match_request(&self, request: &RouteRequest) -> Option<RouteMatch<'_>> {
        let matched = self.source.match_request(request)?;
        Some(matched.with_handler(self))
    }

    fn generate_url(&self, _ctx: &RequestContext, _values: &RouteValues) -> Option<VirtualPath> {
        None
    }
}

impl RouteHandler for RedirectRoute {
    fn handler(&self, ctx: &RequestContext) -> HandlerAction {
        if let Some(hook) = &self.on_redirect {
            hook(ctx, self);
        }

        let Some(target) = &self.target else {
            tracing::warn!(path = %ctx.request().path(), "Redirect route has no target bound");
            return HandlerAction::not_found();
        };

        let merged = merge(self.additional_values.as_ref(), ctx.route_values());
        let Some(path) = target.generate_url(ctx, &merged) else {
            tracing::debug!(
                path = %ctx.request().path(),
                values = ?merged,
                "Redirect target could not generate a path"
            );
            return HandlerAction::not_found();
        };

        let mut location = format!("~/{path}");
        let query = ctx.request().query_string();
        if !query.is_empty() {
            location.push('?');
            location.push_str(&query);
        }
        HandlerAction::redirect(location, self.permanent)
    }
}

impl fmt::Debug for RedirectRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectRoute")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("permanent", &self.permanent)
            .field("additional_values", &self.additional_values)
            .field("on_redirect", &self.on_redirect.is_some())
            .finish()
    }
}
