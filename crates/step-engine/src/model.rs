use std::fmt;
use std::sync::Arc;

use action_primitives::DocumentPort;
use run_recorder::Recorder;
use stepwright_core_types::FailureKind;
use stepwright_snapshot_store::ArtifactCapture;

/// Everything one run touches. Built per run and never shared between runs.
#[derive(Clone)]
pub struct RunContext {
    pub document: Arc<dyn DocumentPort>,
    pub capture: Arc<dyn ArtifactCapture>,
    pub recorder: Arc<dyn Recorder>,
}

impl RunContext {
    pub fn new(
        document: Arc<dyn DocumentPort>,
        capture: Arc<dyn ArtifactCapture>,
        recorder: Arc<dyn Recorder>,
    ) -> Self {
        Self {
            document,
            capture,
            recorder,
        }
    }
}

/// Where a step currently is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPhase {
    Pending,
    Resolving,
    Resolved,
    Unresolved,
    Dispatching,
    Done,
    ActionFailed,
    Logged,
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepPhase::Pending => "pending",
            StepPhase::Resolving => "resolving",
            StepPhase::Resolved => "resolved",
            StepPhase::Unresolved => "unresolved",
            StepPhase::Dispatching => "dispatching",
            StepPhase::Done => "done",
            StepPhase::ActionFailed => "action_failed",
            StepPhase::Logged => "logged",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed(FailureKind),
}

impl StepOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, StepOutcome::Passed)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One outcome per executed step, in plan order
    pub outcomes: Vec<StepOutcome>,
    /// Host abort stopped the run before every step executed
    pub aborted: bool,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }
}
