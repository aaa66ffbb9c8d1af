//! Route generation core for an API gateway config generator.
//!
//! Turns operator options and a service description into an ordered table of
//! proxy routes bound to the local backend cluster.

pub mod config;
pub mod observability;
pub mod routegen;
pub mod routing;

pub use config::schema::RouteGenConfig;
pub use routegen::{generate_from_config, RouteGenerator, RouteTable};
pub use routing::{GenerationError, ParseError, RouteDescriptor, UriTemplate};
