use thiserror::Error;

use action_primitives::ActionError;

#[derive(Clone, Debug, Error)]
pub enum SnapErrKind {
    #[error("document capture failed: {0}")]
    CaptureFailed(String),
    #[error("io failure: {0}")]
    IoFailed(String),
    #[error("artifact id sequence broken: {0}")]
    Sequence(String),
}

#[derive(Clone, Debug, Error)]
#[error(transparent)]
pub struct SnapError(pub SnapErrKind);

impl SnapError {
    pub fn new(kind: SnapErrKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &SnapErrKind {
        &self.0
    }
}

impl From<SnapErrKind> for SnapError {
    fn from(kind: SnapErrKind) -> Self {
        SnapError(kind)
    }
}

impl From<ActionError> for SnapError {
    fn from(err: ActionError) -> Self {
        SnapError(SnapErrKind::CaptureFailed(err.to_string()))
    }
}

impl From<std::io::Error> for SnapError {
    fn from(err: std::io::Error) -> Self {
        SnapError(SnapErrKind::IoFailed(err.to_string()))
    }
}
