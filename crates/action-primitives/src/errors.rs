//! Error types for action primitives

use thiserror::Error;

/// Error types for document and action primitive operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// Navigation timed out waiting for the requested load state
    #[error("Navigation timeout: {0}")]
    NavTimeout(String),

    /// Wait operation timed out
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// Operation was cancelled or interrupted
    #[error("Operation interrupted: {0}")]
    Interrupted(String),

    /// Element cannot receive the interaction (hidden, detached, disabled)
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Dropdown option was not found
    #[error("Option not found in dropdown: {0}")]
    OptionNotFound(String),

    /// Expectation did not hold before the deadline
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Assertion pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Navigation target unknown to the document
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Failure reported by the underlying document driver
    #[error("Driver error: {0}")]
    Driver(String),

    /// Action has no implementation
    #[error("Unsupported action: {0}")]
    Unsupported(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ActionError::NavTimeout(_) | ActionError::WaitTimeout(_))
    }

    /// Short machine-friendly tag for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::NavTimeout(_) => "nav_timeout",
            ActionError::WaitTimeout(_) => "wait_timeout",
            ActionError::Interrupted(_) => "interrupted",
            ActionError::NotInteractable(_) => "not_interactable",
            ActionError::OptionNotFound(_) => "option_not_found",
            ActionError::AssertionFailed(_) => "assertion_failed",
            ActionError::InvalidPattern(_) => "invalid_pattern",
            ActionError::NavigationFailed(_) => "navigation_failed",
            ActionError::Driver(_) => "driver",
            ActionError::Unsupported(_) => "unsupported",
            ActionError::Internal(_) => "internal",
        }
    }
}
