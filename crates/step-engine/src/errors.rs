use action_locator::LocatorError;
use action_primitives::ActionError;
use stepwright_core_types::{FailureKind, ValidationError};
use thiserror::Error;

/// Per-step failure taxonomy. Everything here stays inside the step
/// boundary and ends up as run-log notes.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    CandidateExhausted(#[from] LocatorError),

    #[error(transparent)]
    ActionDispatchFailed(#[from] ActionError),

    #[error("Malformed step input: {0}")]
    MalformedStepInput(#[from] ValidationError),

    /// Best-effort stability wait gave up; never fails a step
    #[error("Transient wait failure: {0}")]
    TransientWaitFailure(String),
}

impl StepError {
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            StepError::CandidateExhausted(_) => Some(FailureKind::CandidateExhausted),
            StepError::ActionDispatchFailed(_) => Some(FailureKind::ActionDispatchFailed),
            StepError::MalformedStepInput(_) => Some(FailureKind::MalformedStepInput),
            StepError::TransientWaitFailure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwright_core_types::ActionKind;

    #[test]
    fn taxonomy_maps_to_failure_kinds() {
        let err: StepError = LocatorError::NoCandidates.into();
        assert_eq!(err.failure_kind(), Some(FailureKind::CandidateExhausted));

        let err: StepError = ActionError::AssertionFailed("text mismatch".into()).into();
        assert_eq!(err.failure_kind(), Some(FailureKind::ActionDispatchFailed));
        assert_eq!(err.to_string(), "Assertion failed: text mismatch");

        let err: StepError = ValidationError::MissingPayload {
            action: ActionKind::Fill,
            field: "input",
        }
        .into();
        assert_eq!(err.failure_kind(), Some(FailureKind::MalformedStepInput));

        assert_eq!(
            StepError::TransientWaitFailure("networkIdle".into()).failure_kind(),
            None
        );
    }
}
