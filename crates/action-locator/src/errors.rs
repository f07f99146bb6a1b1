//! Error types for locator system

use thiserror::Error;

use crate::types::{summarize_probes, CandidateProbe};

/// Locator error enumeration
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// No candidate resolved to exactly one visible element
    #[error("Element not found: {}", summarize_probes(.probes))]
    NotFound { probes: Vec<CandidateProbe> },

    /// The step carried no candidates at all
    #[error("No candidates supplied")]
    NoCandidates,
}

impl LocatorError {
    pub fn probes(&self) -> &[CandidateProbe] {
        match self {
            LocatorError::NotFound { probes } => probes,
            LocatorError::NoCandidates => &[],
        }
    }
}
