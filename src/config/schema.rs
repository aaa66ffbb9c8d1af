//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the route
//! generator. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::HttpMethod;

/// Root configuration for a generation pass.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteGenConfig {
    /// Operator options for synthetic routes.
    pub options: GeneratorOptions,

    /// The service whose methods are routed to the local backend.
    pub service: ServiceConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Operator-supplied generator options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Health check path. Empty disables the health check route.
    pub healthz: String,

    /// Prefix for operation names of autogenerated routes.
    pub health_check_operation_prefix: String,

    /// Logical API name the health check operation is reported under.
    pub health_check_operation: String,

    /// Keep single-segment wildcards from matching `:`.
    pub disallow_colon_in_wildcard_path_segment: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            healthz: String::new(),
            health_check_operation_prefix: "ESPv2_Autogenerated".to_string(),
            health_check_operation: "espv2_deployment".to_string(),
            disallow_colon_in_wildcard_path_segment: false,
        }
    }
}

/// Minimal service description.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name (e.g., "myapi.endpoints.example.com").
    pub name: String,

    /// HTTP bindings of the service's methods.
    pub http_rules: Vec<HttpRuleConfig>,
}

/// One HTTP binding of a service method.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpRuleConfig {
    /// Method selector, unique within the service (e.g., "ListShelves").
    pub selector: String,

    /// HTTP method (case-insensitive).
    pub method: HttpMethod,

    /// Path template (e.g., "/v1/shelves/{shelf}").
    pub path: String,

    /// Backend deadline in seconds. Falls back to the default deadline.
    #[serde(default)]
    pub deadline_secs: Option<f64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
