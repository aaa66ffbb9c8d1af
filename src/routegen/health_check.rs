//! Health check route generation.
//!
//! # Responsibilities
//! - Emit one GET route for the operator's health check path
//! - Bind it to the local backend cluster so the proxy can health check it
//! - Give it an operation name so downstream filters see a known operation
//!
//! # Design Decisions
//! - An empty health check path means no generator at all, not an error
//! - A malformed path is fatal to the whole generation pass
//! - Remote clusters are never targeted

use crate::config::schema::GeneratorOptions;
use crate::routegen::cluster::ClusterNameResolver;
use crate::routegen::RouteGenerator;
use crate::routing::{
    GenerationError, HttpMethod, HttpPattern, MethodConfig, RouteBuilder, RouteDescriptor,
    UriTemplate, DEFAULT_RESPONSE_DEADLINE,
};

/// Creates the route the proxy uses to health check the local backend.
#[derive(Debug, Clone)]
pub struct HealthCheckGenerator {
    pub healthz_path: String,
    pub operation_prefix: String,
    pub operation_api: String,
    /// Health checks are answered by the proxy, but the route still needs a
    /// cluster for the check to be performed against.
    pub local_cluster_name: String,
    pub builder: RouteBuilder,
}

impl HealthCheckGenerator {
    /// Returns `None` when no health check path is configured.
    pub fn from_options(opts: &GeneratorOptions, resolver: &dyn ClusterNameResolver) -> Option<Self> {
        if opts.healthz.is_empty() {
            tracing::info!("Not adding health check route because healthz path is not specified");
            return None;
        }

        Some(Self {
            healthz_path: opts.healthz.clone(),
            operation_prefix: opts.health_check_operation_prefix.clone(),
            operation_api: opts.health_check_operation.clone(),
            local_cluster_name: resolver.local_backend_cluster(),
            builder: RouteBuilder::new()
                .disallow_colon_in_wildcard_path_segment(opts.disallow_colon_in_wildcard_path_segment),
        })
    }

    pub fn operation_name(&self) -> String {
        format!("{}.{}_HealthCheck", self.operation_api, self.operation_prefix)
    }
}

/// Zero or one health check generators, ready for the orchestrator.
pub fn health_check_generators(
    opts: &GeneratorOptions,
    resolver: &dyn ClusterNameResolver,
) -> Vec<Box<dyn RouteGenerator>> {
    HealthCheckGenerator::from_options(opts, resolver)
        .into_iter()
        .map(|g| Box::new(g) as Box<dyn RouteGenerator>)
        .collect()
}

impl RouteGenerator for HealthCheckGenerator {
    fn name(&self) -> &str {
        "health_check"
    }

    fn generate(&self) -> Result<Vec<RouteDescriptor>, GenerationError> {
        let uri_template = UriTemplate::parse(&self.healthz_path)?;

        let method_cfg = MethodConfig {
            operation_name: self.operation_name(),
            backend_cluster_name: self.local_cluster_name.clone(),
            deadline: DEFAULT_RESPONSE_DEADLINE,
            http_pattern: HttpPattern::new(HttpMethod::Get, uri_template),
        };

        self.builder.build(&method_cfg)
    }
}
