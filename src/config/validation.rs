//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every HTTP rule path compiles
//! - Validate value ranges (deadlines > 0)
//! - Detect duplicate selectors
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouteGenConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::RouteGenConfig;
use crate::routing::{ParseError, UriTemplate};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("service.name must not be empty")]
    MissingServiceName,

    #[error("options.health_check_operation must not be empty when healthz is set")]
    MissingHealthCheckOperation,

    #[error("http_rules[{index}] has an empty selector")]
    EmptySelector { index: usize },

    #[error("selector {0:?} appears more than once")]
    DuplicateSelector(String),

    #[error("rule {selector:?}: {source}")]
    InvalidPath {
        selector: String,
        source: ParseError,
    },

    #[error("rule {selector:?}: deadline must be a positive, representable number of seconds, got {value}")]
    InvalidDeadline { selector: String, value: f64 },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouteGenConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.is_empty() {
        errors.push(ValidationError::MissingServiceName);
    }

    if !config.options.healthz.is_empty() && config.options.health_check_operation.is_empty() {
        errors.push(ValidationError::MissingHealthCheckOperation);
    }

    let mut selectors = HashSet::new();
    for (index, rule) in config.service.http_rules.iter().enumerate() {
        if rule.selector.is_empty() {
            errors.push(ValidationError::EmptySelector { index });
        } else if !selectors.insert(rule.selector.as_str()) {
            errors.push(ValidationError::DuplicateSelector(rule.selector.clone()));
        }

        if let Err(source) = UriTemplate::parse(&rule.path) {
            errors.push(ValidationError::InvalidPath {
                selector: rule.selector.clone(),
                source,
            });
        }

        if let Some(value) = rule.deadline_secs {
            if value <= 0.0 || Duration::try_from_secs_f64(value).is_err() {
                errors.push(ValidationError::InvalidDeadline {
                    selector: rule.selector.clone(),
                    value,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
