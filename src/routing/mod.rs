//! Route compilation subsystem.
//!
//! # Data Flow
//! ```text
//! raw path ("/v1/{name=**}")
//!     → uri_template.rs (compile to UriTemplate)
//!     → pattern.rs (pair with HttpMethod)
//!     → MethodConfig (operation, cluster, deadline)
//!     → builder.rs (materialize RouteDescriptor, order by specificity)
//! ```
//!
//! # Design Decisions
//! - Compiled once per generation pass, immutable afterwards
//! - Deterministic: the same input always yields the same routes
//! - Most specific route first; ties keep generator order

pub mod builder;
pub mod pattern;
pub mod uri_template;

pub use builder::{
    order_routes, GenerationError, MethodConfig, PathMatch, RouteBuilder, RouteDescriptor,
    DEFAULT_RESPONSE_DEADLINE,
};
pub use pattern::{HttpMethod, HttpPattern};
pub use uri_template::{ParseError, Segment, Specificity, UriTemplate};
