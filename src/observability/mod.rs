//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Generation pass produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (route and failure counters)
//!
//! Consumers:
//!     → Log aggregation (stderr, JSON or pretty)
//!     → Whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
