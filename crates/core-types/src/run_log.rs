//! Per-step run log entries

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactIds;
use crate::locator::CandidateDescriptor;
use crate::step::{ActionKind, Step, WaitSpec};

/// Terminal status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Passed => f.write_str("passed"),
            StepStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CandidateExhausted,
    ActionDispatchFailed,
    MalformedStepInput,
}

/// Phase durations in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTimings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<u64>,
    pub total: u64,
}

/// Everything recorded about one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLogEntry {
    pub index: usize,
    pub intent: String,
    pub action: ActionKind,
    pub url_before: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_after: Option<String>,

    #[serde(default)]
    pub locator_tried: Vec<CandidateDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_locator: Option<CandidateDescriptor>,

    pub alt_locators_used: bool,
    pub confidence: f64,
    pub wait: WaitSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactIds>,

    #[serde(default)]
    pub timings_ms: StepTimings,

    pub status: StepStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
}

impl RunLogEntry {
    /// Fresh entry for a step about to run; status starts as failed until proven otherwise
    pub fn pending(index: usize, step: &Step, url_before: impl Into<String>) -> Self {
        Self {
            index,
            intent: step.intent.clone(),
            action: step.action,
            url_before: url_before.into(),
            url_after: None,
            locator_tried: Vec::new(),
            chosen_locator: None,
            alt_locators_used: false,
            confidence: step.confidence,
            wait: step.wait,
            artifacts: None,
            timings_ms: StepTimings::default(),
            status: StepStatus::Failed,
            notes: String::new(),
            failure_kind: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == StepStatus::Passed
    }
}
