//! Shared primitives for the Stepwright workspace.
//!
//! Everything that crosses a crate boundary lives here: candidate
//! descriptors, steps, artifact map entries and run log entries, plus the
//! structural validation rules the engine enforces on untrusted plans.

use std::fmt;

use chrono::Utc;
use uuid::Uuid;

pub mod artifacts;
pub mod errors;
pub mod locator;
pub mod pattern;
pub mod plan;
pub mod run_log;
pub mod step;

pub use artifacts::{ArtifactIds, ArtifactMap, ArtifactMapEntry};
pub use errors::{PlanError, ValidationError};
pub use locator::{CandidateDescriptor, FieldGroup, LocatorStrategy};
pub use pattern::{split_pattern_literal, PatternLiteral};
pub use plan::{steps_from_json_str, steps_to_json, validate_plan, PlanIssue};
pub use run_log::{FailureKind, RunLogEntry, StepStatus, StepTimings};
pub use step::{ActionKind, Step, WaitKind, WaitSpec};

/// Identifier of one execution run; doubles as the run directory name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "run_{}_{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        ))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
