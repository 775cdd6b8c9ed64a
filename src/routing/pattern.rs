//! Path-pattern routes.
//!
//! # Responsibilities
//! - Match request paths against a single pattern (delegated to `matchit`)
//! - Generate a path back from route values
//! - Apply per-route default values
//!
//! # Design Decisions
//! - Pattern syntax is whatever `matchit` accepts (`/items/{id}`, `/files/{*path}`)
//! - Matched values win over defaults
//! - Generation fails (no path) when any placeholder has no non-empty value
//! - Values not named by the pattern are ignored during generation

use std::fmt;

use matchit::Router as Matcher;

use crate::routing::error::RouteError;
use crate::routing::route::{RequestContext, Route, RouteHandler, RouteMatch, RouteRequest, VirtualPath};
use crate::routing::values::{merge, RouteValues};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Check that `pattern` is accepted by the matching engine.
pub fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    compile(pattern).map(|_| ())
}

fn compile(pattern: &str) -> Result<(Matcher<()>, Vec<Segment>), RouteError> {
    let mut matcher = Matcher::new();
    matcher
        .insert(pattern, ())
        .map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
    Ok((matcher, parse_segments(pattern)))
}

fn parse_segments(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                segments.push(Segment::Param(name.trim_start_matches('*').to_string()));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// A route matching one path pattern.
pub struct PatternRoute {
    pattern: String,
    matcher: Matcher<()>,
    segments: Vec<Segment>,
    defaults: RouteValues,
    handler: Box<dyn RouteHandler>,
}

impl PatternRoute {
    /// Compile `pattern`, dispatching matches through `handler`.
    pub fn new(pattern: &str, handler: impl RouteHandler + 'static) -> Result<Self, RouteError> {
        let (matcher, segments) = compile(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
            segments,
            defaults: RouteValues::new(),
            handler: Box::new(handler),
        })
    }

    /// Default values used when a match or generation lacks a parameter.
    pub fn with_defaults(mut self, defaults: RouteValues) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn defaults(&self) -> &RouteValues {
        &self.defaults
    }

    /// Names of the pattern's placeholders, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl Route for PatternRoute {
    fn match_request(&self, request: &RouteRequest) -> Option<RouteMatch<'_>> {
        let matched = self.matcher.at(request.path()).ok()?;
        let captured: RouteValues = matched.params.iter().collect();
        let values = merge(Some(&self.defaults), &captured);
        Some(RouteMatch::new(values, self.handler.as_ref()))
    }

    fn generate_url(&self, _ctx: &RequestContext, values: &RouteValues) -> Option<VirtualPath> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = values
                        .param(name)
                        .filter(|v| !v.is_empty())
                        .or_else(|| self.defaults.param(name).filter(|v| !v.is_empty()))?;
                    path.push_str(&value);
                }
            }
        }
        Some(VirtualPath::new(path))
    }
}

impl fmt::Debug for PatternRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRoute")
            .field("pattern", &self.pattern)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
