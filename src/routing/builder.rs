//! Route materialization.
//!
//! # Responsibilities
//! - Turn a `MethodConfig` into a concrete `RouteDescriptor`
//! - Reject configs that cannot produce a servable route
//! - Order routes so the most specific candidate is evaluated first
//!
//! # Ordering
//! ```text
//! literal (/a/b)  <  single capture (/a/{x}, /a/*)  <  multi capture (/a/**)
//! ```
//! Ties keep the order in which the owning generator produced them.
//!
//! # Design Decisions
//! - Pure functions, no shared state
//! - One descriptor per `MethodConfig`
//! - Literal templates become exact path matches, everything else an anchored regex

use std::collections::HashMap;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::routing::pattern::{HttpMethod, HttpPattern};
use crate::routing::uri_template::{ParseError, UriTemplate};

/// Deadline applied when a method does not configure its own.
pub const DEFAULT_RESPONSE_DEADLINE: Duration = Duration::from_secs(15);

/// Errors that abort a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("operation {operation:?} has no backend cluster")]
    EmptyCluster { operation: String },

    #[error("route for {pattern} has no operation name")]
    EmptyOperation { pattern: String },

    #[error("operation {operation:?} has a zero deadline")]
    InvalidDeadline { operation: String },

    #[error("operation {operation:?} has a deadline of {secs} seconds, which is negative or out of range")]
    DeadlineOutOfRange { operation: String, secs: String },

    #[error("pattern {pattern} is bound to both {first:?} and {second:?}")]
    DuplicatePattern {
        pattern: String,
        first: String,
        second: String,
    },

    #[error("operation {0:?} is generated more than once")]
    DuplicateOperation(String),
}

/// Routing metadata for one method, produced by a route generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodConfig {
    pub operation_name: String,
    pub backend_cluster_name: String,
    pub deadline: Duration,
    pub http_pattern: HttpPattern,
}

/// How the proxy matches the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMatch {
    Exact(String),
    Regex(String),
}

/// A concrete route handed to the route table sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub operation: String,
    pub method: HttpMethod,
    pub template: UriTemplate,
    pub path_match: PathMatch,
    pub cluster: String,
    #[serde(serialize_with = "serialize_secs")]
    pub timeout: Duration,
}

fn serialize_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// Builds routes for method configs.
#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    disallow_colon_in_wildcard_path_segment: bool,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `*` and `{name}` from matching `:` in a path segment.
    pub fn disallow_colon_in_wildcard_path_segment(mut self, disallow: bool) -> Self {
        self.disallow_colon_in_wildcard_path_segment = disallow;
        self
    }

    /// Materialize the route(s) for a single method.
    pub fn build(&self, cfg: &MethodConfig) -> Result<Vec<RouteDescriptor>, GenerationError> {
        Ok(vec![self.build_route(cfg)?])
    }

    /// Build every config and return the routes ordered most-specific first.
    ///
    /// Two configs sharing an `HttpPattern` are rejected since the proxy
    /// could only ever dispatch to the first one.
    pub fn build_all(&self, cfgs: &[MethodConfig]) -> Result<Vec<RouteDescriptor>, GenerationError> {
        let mut owners: HashMap<&HttpPattern, &str> = HashMap::with_capacity(cfgs.len());
        let mut shapes: HashMap<(&HttpMethod, UriTemplate), &str> = HashMap::with_capacity(cfgs.len());
        let mut routes = Vec::with_capacity(cfgs.len());

        for cfg in cfgs {
            if let Some(first) = owners.insert(&cfg.http_pattern, &cfg.operation_name) {
                return Err(GenerationError::DuplicatePattern {
                    pattern: cfg.http_pattern.to_string(),
                    first: first.to_string(),
                    second: cfg.operation_name.clone(),
                });
            }

            let shape = (&cfg.http_pattern.method, cfg.http_pattern.uri_template.shape());
            if let Some(first) = shapes.get(&shape) {
                tracing::warn!(
                    pattern = %cfg.http_pattern,
                    shadowed_by = %first,
                    operation = %cfg.operation_name,
                    "Route matches the same requests as an earlier route and is unreachable"
                );
            } else {
                shapes.insert(shape, &cfg.operation_name);
            }

            routes.extend(self.build(cfg)?);
        }

        order_routes(&mut routes);
        Ok(routes)
    }

    fn build_route(&self, cfg: &MethodConfig) -> Result<RouteDescriptor, GenerationError> {
        if cfg.operation_name.is_empty() {
            return Err(GenerationError::EmptyOperation {
                pattern: cfg.http_pattern.to_string(),
            });
        }
        if cfg.backend_cluster_name.is_empty() {
            return Err(GenerationError::EmptyCluster {
                operation: cfg.operation_name.clone(),
            });
        }
        if cfg.deadline.is_zero() {
            return Err(GenerationError::InvalidDeadline {
                operation: cfg.operation_name.clone(),
            });
        }

        let template = &cfg.http_pattern.uri_template;
        let path_match = if template.is_literal() {
            PathMatch::Exact(template.to_string())
        } else {
            PathMatch::Regex(template.to_regex(self.disallow_colon_in_wildcard_path_segment))
        };

        tracing::debug!(
            operation = %cfg.operation_name,
            pattern = %cfg.http_pattern,
            cluster = %cfg.backend_cluster_name,
            "Built route"
        );

        Ok(RouteDescriptor {
            operation: cfg.operation_name.clone(),
            method: cfg.http_pattern.method.clone(),
            template: template.clone(),
            path_match,
            cluster: cfg.backend_cluster_name.clone(),
            timeout: cfg.deadline,
        })
    }
}

/// Stable sort by template specificity, most specific first.
pub fn order_routes(routes: &mut [RouteDescriptor]) {
    routes.sort_by_key(|r| r.template.specificity());
}
