//! Error types for plan parsing and structural validation

use thiserror::Error;

use crate::locator::LocatorStrategy;
use crate::step::ActionKind;

/// Structural rule violated by a candidate descriptor or a step payload.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A field the strategy's group requires is absent or blank
    #[error("{strategy} locator requires `{field}`")]
    MissingField {
        strategy: LocatorStrategy,
        field: &'static str,
    },

    /// A field belonging to another strategy group is populated
    #[error("{strategy} locator must not set `{field}`")]
    MixedFields {
        strategy: LocatorStrategy,
        field: &'static str,
    },

    /// The action needs a payload field the step does not carry
    #[error("{action} action requires `{field}`")]
    MissingPayload {
        action: ActionKind,
        field: &'static str,
    },

    /// Navigation target is not an absolute http(s)/file URL
    #[error("invalid navigation target '{target}': {reason}")]
    InvalidUrl { target: String, reason: String },

    /// More alternates than the configured cap
    #[error("{count} alternate locators exceed the cap of {max}")]
    TooManyAlternates { count: usize, max: usize },
}

/// Failure to decode a plan document.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("steps JSON must be a list of step objects")]
    NotAList,

    #[error("step {index}: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}
