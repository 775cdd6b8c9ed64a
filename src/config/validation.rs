//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (redirects target existing routes)
//! - Validate value ranges (status codes) and patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::pattern::validate_pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{0} has an empty name")]
    EmptyRouteName(usize),

    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    #[error("route '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("{0}")]
    InvalidPattern(String),

    #[error("route '{route}' has invalid status {status}")]
    InvalidStatus { route: String, status: u16 },

    #[error("redirect #{0} has an empty source pattern")]
    EmptyRedirectSource(usize),

    #[error("redirect from '{from}' targets unknown route '{to}'")]
    UnknownTarget { from: String, to: String },
}

/// Validate routes and redirects, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName(index));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern(route.name.clone()));
        } else if let Err(e) = validate_pattern(&route.pattern) {
            errors.push(ValidationError::InvalidPattern(e.to_string()));
        }

        if !(100..=599).contains(&route.status) {
            errors.push(ValidationError::InvalidStatus {
                route: route.name.clone(),
                status: route.status,
            });
        }
    }

    for (index, redirect) in config.redirects.iter().enumerate() {
        if redirect.from.is_empty() {
            errors.push(ValidationError::EmptyRedirectSource(index));
        } else if let Err(e) = validate_pattern(&redirect.from) {
            errors.push(ValidationError::InvalidPattern(e.to_string()));
        }

        if !names.contains(redirect.to.as_str()) {
            errors.push(ValidationError::UnknownTarget {
                from: redirect.from.clone(),
                to: redirect.to.clone(),
            });
        }

        if let Some(name) = &redirect.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateName(name.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
