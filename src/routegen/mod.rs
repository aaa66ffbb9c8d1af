//! Route generation subsystem.
//!
//! # Data Flow
//! ```text
//! RouteGenConfig (options + service)
//!     → table.rs (declare generators in order)
//!     → health_check.rs / backend_rules.rs (MethodConfig per route)
//!     → routing::RouteBuilder (RouteDescriptor)
//!     → table.rs (concatenate, check operation uniqueness)
//!     → sink.rs (hand the RouteTable to the consumer)
//! ```
//!
//! # Design Decisions
//! - Generators are stateless and share nothing
//! - Any generator failure aborts the whole pass
//! - Only the local backend cluster is ever targeted

pub mod backend_rules;
pub mod cluster;
pub mod health_check;
pub mod sink;
pub mod table;

use crate::routing::{GenerationError, RouteDescriptor};

/// A source of routes for one slice of the configuration.
pub trait RouteGenerator: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and metrics.
    fn name(&self) -> &str;

    /// Produce this generator's routes, in the order they should be evaluated.
    fn generate(&self) -> Result<Vec<RouteDescriptor>, GenerationError>;
}

pub use backend_rules::BackendRuleGenerator;
pub use cluster::{ClusterNameResolver, FixedClusterResolver, LocalClusterResolver};
pub use health_check::{health_check_generators, HealthCheckGenerator};
pub use sink::{JsonSink, MemorySink, RouteSink, SinkError};
pub use table::{generate_from_config, generate_route_table, generators_from_config, RouteTable};
