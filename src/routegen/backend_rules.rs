//! Routes for the service's own HTTP rules.
//!
//! Every rule becomes one route to the local backend cluster. Routes are
//! ordered most-specific first so that `/v1/shelves/featured` is evaluated
//! before `/v1/shelves/{shelf}`.

use std::time::Duration;

use crate::config::schema::{GeneratorOptions, HttpRuleConfig, ServiceConfig};
use crate::routegen::cluster::ClusterNameResolver;
use crate::routegen::RouteGenerator;
use crate::routing::{
    GenerationError, HttpPattern, MethodConfig, RouteBuilder, RouteDescriptor, UriTemplate,
    DEFAULT_RESPONSE_DEADLINE,
};

#[derive(Debug, Clone)]
pub struct BackendRuleGenerator {
    pub service_name: String,
    pub rules: Vec<HttpRuleConfig>,
    pub local_cluster_name: String,
    pub builder: RouteBuilder,
}

impl BackendRuleGenerator {
    /// Returns `None` when the service declares no HTTP rules.
    pub fn from_config(
        service: &ServiceConfig,
        opts: &GeneratorOptions,
        resolver: &dyn ClusterNameResolver,
    ) -> Option<Self> {
        if service.http_rules.is_empty() {
            tracing::info!(service = %service.name, "Service declares no HTTP rules");
            return None;
        }

        Some(Self {
            service_name: service.name.clone(),
            rules: service.http_rules.clone(),
            local_cluster_name: resolver.local_backend_cluster(),
            builder: RouteBuilder::new()
                .disallow_colon_in_wildcard_path_segment(opts.disallow_colon_in_wildcard_path_segment),
        })
    }

    fn method_config(&self, rule: &HttpRuleConfig) -> Result<MethodConfig, GenerationError> {
        let uri_template = UriTemplate::parse(&rule.path)?;
        let operation_name = format!("{}.{}", self.service_name, rule.selector);
        let deadline = match rule.deadline_secs {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|_| {
                GenerationError::DeadlineOutOfRange {
                    operation: operation_name.clone(),
                    secs: secs.to_string(),
                }
            })?,
            None => DEFAULT_RESPONSE_DEADLINE,
        };

        Ok(MethodConfig {
            operation_name,
            backend_cluster_name: self.local_cluster_name.clone(),
            deadline,
            http_pattern: HttpPattern::new(rule.method.clone(), uri_template),
        })
    }
}

impl RouteGenerator for BackendRuleGenerator {
    fn name(&self) -> &str {
        "backend_rules"
    }

    fn generate(&self) -> Result<Vec<RouteDescriptor>, GenerationError> {
        let cfgs = self
            .rules
            .iter()
            .map(|rule| self.method_config(rule))
            .collect::<Result<Vec<_>, _>>()?;

        self.builder.build_all(&cfgs)
    }
}
