//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::values::RouteValues;

/// Root configuration for the redirect router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, timeouts).
    pub listener: ListenerConfig,

    /// Application settings.
    pub app: AppConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions. Replaced on every reload.
    pub routes: Vec<RouteConfig>,

    /// Redirect definitions. Replaced on every reload.
    pub redirects: Vec<RedirectConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path the `~/` application-root marker expands to.
    pub base_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
        }
    }
}

/// A route answering with a fixed response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route name, used as a redirect target.
    pub name: String,

    /// Path pattern, e.g. "/items/{id}".
    pub pattern: String,

    /// Response status.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body.
    #[serde(default)]
    pub body: String,

    /// Default route values.
    #[serde(default)]
    pub defaults: RouteValues,
}

fn default_status() -> u16 {
    200
}

/// A redirect from one pattern to a named route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedirectConfig {
    /// Optional name for the redirect entry.
    #[serde(default)]
    pub name: Option<String>,

    /// Source path pattern.
    pub from: String,

    /// Name of the target route.
    pub to: String,

    /// 301 when true, 302 otherwise.
    #[serde(default = "default_permanent")]
    pub permanent: bool,

    /// Additional route values merged under the matched ones.
    #[serde(default)]
    pub values: RouteValues,
}

fn default_permanent() -> bool {
    true
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
