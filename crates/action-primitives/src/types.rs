//! Core data types for action primitives

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Execution context for one dispatched action
///
/// Carries the deadline derived from the step's wait spec and the run-wide
/// cancellation token.
#[derive(Clone, Debug)]
pub struct ExecCtx {
    /// 1-based position of the step in the run
    pub step_index: usize,

    /// Deadline for this operation
    pub deadline: Instant,

    /// Cancellation token for cooperative cancellation
    pub cancel_token: CancellationToken,

    /// Unique identifier for this action
    pub action_id: String,
}

impl ExecCtx {
    pub fn new(step_index: usize, timeout: Duration, cancel_token: CancellationToken) -> Self {
        Self {
            step_index,
            deadline: Instant::now() + timeout,
            cancel_token,
            action_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Check if this context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Check if this context has exceeded its deadline
    pub fn is_timeout(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Get remaining time until deadline
    pub fn remaining_time(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Report produced by a successful primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: DateTime<Utc>,

    pub latency_ms: u64,

    /// Free-text detail worth surfacing in the run log
    pub note: Option<String>,
}

impl ActionReport {
    pub fn success(started_at: DateTime<Utc>, latency_ms: u64) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            latency_ms,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Outcome of the post-action stability wait
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Network idle was reached within its timeout
    pub network_idle: bool,

    /// Reason the best-effort network-idle wait gave up, if it did
    pub transient_failure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_ctx_deadline() {
        let ctx = ExecCtx::new(1, Duration::from_secs(5), CancellationToken::new());
        assert!(!ctx.is_timeout());
        assert!(!ctx.is_cancelled());
        assert!(ctx.remaining_time() <= Duration::from_secs(5));

        let expired = ExecCtx::new(2, Duration::ZERO, CancellationToken::new());
        assert!(expired.is_timeout());
        assert_eq!(expired.remaining_time(), Duration::ZERO);
    }

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let ctx = ExecCtx::new(1, Duration::from_secs(1), token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
