//! Generation pass orchestration.
//!
//! # Responsibilities
//! - Declare the route generators in a fixed order
//! - Run each one and concatenate their routes in that order
//! - Abort the whole pass on the first failure
//! - Reject operation names and method + template pairs generated more than once
//! - Order the whole table most-specific first, generator order breaking ties
//!
//! # Design Decisions
//! - A partial route table is never returned
//! - Health check routes are declared first, so they win ties of equal specificity

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::schema::RouteGenConfig;
use crate::observability::metrics;
use crate::routegen::backend_rules::BackendRuleGenerator;
use crate::routegen::cluster::{ClusterNameResolver, LocalClusterResolver};
use crate::routegen::health_check::health_check_generators;
use crate::routegen::RouteGenerator;
use crate::routing::{order_routes, GenerationError, HttpMethod, RouteDescriptor, UriTemplate};

/// The ordered output of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    pub routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn find_operation(&self, operation: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.operation == operation)
    }
}

/// All generators for a configuration, in declaration order.
pub fn generators_from_config(
    config: &RouteGenConfig,
    resolver: &dyn ClusterNameResolver,
) -> Vec<Box<dyn RouteGenerator>> {
    let mut generators = health_check_generators(&config.options, resolver);
    if let Some(g) = BackendRuleGenerator::from_config(&config.service, &config.options, resolver) {
        generators.push(Box::new(g));
    }
    generators
}

/// Run every generator, concatenate the results and order them by specificity.
pub fn generate_route_table(
    generators: &[Box<dyn RouteGenerator>],
) -> Result<RouteTable, GenerationError> {
    let mut routes = Vec::new();

    for generator in generators {
        match generator.generate() {
            Ok(generated) => {
                tracing::debug!(generator = generator.name(), routes = generated.len(), "Generator finished");
                metrics::record_routes_generated(generator.name(), generated.len());
                routes.extend(generated);
            }
            Err(e) => {
                tracing::error!(generator = generator.name(), error = %e, "Route generation failed");
                metrics::record_generation_failure(generator.name());
                return Err(e);
            }
        }
    }

    if let Err(e) = check_collisions(&routes) {
        tracing::error!(error = %e, "Route table collision");
        metrics::record_generation_failure("route_table");
        return Err(e);
    }

    order_routes(&mut routes);

    tracing::info!(routes = routes.len(), generators = generators.len(), "Route table generated");
    Ok(RouteTable { routes })
}

/// Operation names and method + template pairs must each be unique table-wide.
fn check_collisions(routes: &[RouteDescriptor]) -> Result<(), GenerationError> {
    let mut operations = HashSet::with_capacity(routes.len());
    let mut owners: HashMap<(&HttpMethod, &UriTemplate), &str> = HashMap::with_capacity(routes.len());

    for route in routes {
        if !operations.insert(route.operation.as_str()) {
            return Err(GenerationError::DuplicateOperation(route.operation.clone()));
        }
        if let Some(first) = owners.insert((&route.method, &route.template), &route.operation) {
            return Err(GenerationError::DuplicatePattern {
                pattern: format!("{} {}", route.method, route.template),
                first: first.to_string(),
                second: route.operation.clone(),
            });
        }
    }
    Ok(())
}

/// One full pass for a loaded configuration, using the local cluster naming.
pub fn generate_from_config(config: &RouteGenConfig) -> Result<RouteTable, GenerationError> {
    let resolver = LocalClusterResolver::from_service(&config.service);
    generate_route_table(&generators_from_config(config, &resolver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::HttpRuleConfig;
    use crate::routing::{HttpMethod, HttpPattern, MethodConfig, RouteBuilder, UriTemplate};
    use std::time::Duration;

    #[derive(Debug)]
    struct StaticGenerator {
        operation: &'static str,
        path: &'static str,
    }

    impl RouteGenerator for StaticGenerator {
        fn name(&self) -> &str {
            "static"
        }

        fn generate(&self) -> Result<Vec<RouteDescriptor>, GenerationError> {
            RouteBuilder::new().build(&MethodConfig {
                operation_name: self.operation.to_string(),
                backend_cluster_name: "local".to_string(),
                deadline: Duration::from_secs(1),
                http_pattern: HttpPattern::new(HttpMethod::Get, UriTemplate::parse(self.path)?),
            })
        }
    }

    fn boxed(operation: &'static str, path: &'static str) -> Box<dyn RouteGenerator> {
        Box::new(StaticGenerator { operation, path })
    }

    fn operations(table: &RouteTable) -> Vec<&str> {
        table.routes.iter().map(|r| r.operation.as_str()).collect()
    }

    #[test]
    fn test_specificity_beats_declaration_order() {
        let table = generate_route_table(&[boxed("b", "/x/{id}"), boxed("a", "/x/y")]).unwrap();
        assert_eq!(operations(&table), vec!["a", "b"]);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let table = generate_route_table(&[
            boxed("rest", "/x/**"),
            boxed("b", "/y/{id}"),
            boxed("a", "/x/{id}"),
            boxed("z", "/z"),
        ])
        .unwrap();
        assert_eq!(operations(&table), vec!["z", "b", "a", "rest"]);
    }

    #[test]
    fn test_duplicate_pattern_across_generators_rejected() {
        let result = generate_route_table(&[boxed("a", "/x/{id}"), boxed("b", "x/{other=*}")]);
        assert!(result.is_ok());

        let result = generate_route_table(&[boxed("a", "/x/{id}"), boxed("b", "x/{id=*}")]);
        assert_eq!(
            result,
            Err(GenerationError::DuplicatePattern {
                pattern: "GET /x/{id}".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_failure_aborts_pass() {
        let result = generate_route_table(&[boxed("a", "/ok"), boxed("b", "/a/{x")]);
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let result = generate_route_table(&[boxed("a", "/one"), boxed("a", "/two")]);
        assert_eq!(result, Err(GenerationError::DuplicateOperation("a".to_string())));
    }

    #[test]
    fn test_empty_config_yields_empty_table() {
        let mut config = RouteGenConfig::default();
        config.service.name = "svc".to_string();
        let table = generate_from_config(&config).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_capturing_health_check_yields_to_user_literal() {
        let mut config = RouteGenConfig::default();
        config.options.healthz = "/v1/{svc}".to_string();
        config.service.name = "svc".to_string();
        config.service.http_rules.push(HttpRuleConfig {
            selector: "ListShelves".to_string(),
            method: HttpMethod::Get,
            path: "/v1/shelves".to_string(),
            deadline_secs: None,
        });

        let table = generate_from_config(&config).unwrap();
        assert_eq!(
            operations(&table),
            vec!["svc.ListShelves", "espv2_deployment.ESPv2_Autogenerated_HealthCheck"]
        );
    }

    #[test]
    fn test_health_check_declared_before_rules() {
        let mut config = RouteGenConfig::default();
        config.options.healthz = "/healthz".to_string();
        config.service.name = "svc".to_string();
        config.service.http_rules.push(HttpRuleConfig {
            selector: "Get".to_string(),
            method: HttpMethod::Get,
            path: "/{name=**}".to_string(),
            deadline_secs: None,
        });

        let table = generate_from_config(&config).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.routes[0].operation, "espv2_deployment.ESPv2_Autogenerated_HealthCheck");
        assert_eq!(table.routes[1].operation, "svc.Get");
        assert!(table.routes.iter().all(|r| r.cluster == "backend-cluster-svc_local"));
    }
}
