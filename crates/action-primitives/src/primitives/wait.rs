//! Wait primitive - poll an element until it becomes visible

use crate::{
    document::ElementHandle,
    errors::ActionError,
    primitives::{check_ctx, DefaultActionPrimitives},
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info};

/// Sleep one poll interval, clamped to the deadline.
///
/// Returns `false` once the deadline has passed.
pub(crate) async fn next_poll(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
) -> Result<bool, ActionError> {
    if ctx.is_cancelled() {
        return Err(ActionError::Interrupted("Context cancelled".to_string()));
    }
    let remaining = ctx.remaining_time();
    if remaining.is_zero() {
        return Ok(false);
    }
    sleep(primitives.poll_interval().min(remaining)).await;
    Ok(true)
}

/// Execute wait primitive
pub async fn execute_wait_visible(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();

    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        "Executing wait primitive"
    );

    check_ctx(ctx)?;

    loop {
        if target.is_visible().await.unwrap_or(false) {
            break;
        }
        if !next_poll(primitives, ctx).await? {
            return Err(ActionError::WaitTimeout(format!(
                "{} not visible after {}ms",
                target.describe(),
                start_instant.elapsed().as_millis()
            )));
        }
    }

    let latency_ms = start_instant.elapsed().as_millis() as u64;
    debug!(latency_ms, "Wait condition met");
    Ok(ActionReport::success(started_at, latency_ms))
}
