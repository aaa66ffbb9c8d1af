//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouteGenConfig (validated, immutable)
//!     → consumed by one generation pass
//!
//! On change (watch mode):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new generation pass; failures keep the previous table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full regeneration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{GeneratorOptions, HttpRuleConfig, ObservabilityConfig, RouteGenConfig, ServiceConfig};
pub use validation::ValidationError;
