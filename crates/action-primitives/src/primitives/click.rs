//! Pointer primitives - click, hover, check/uncheck

use crate::{
    document::ElementHandle,
    errors::ActionError,
    primitives::check_ctx,
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Execute click primitive
pub async fn execute_click(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();

    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        "Executing click primitive"
    );

    check_ctx(ctx)?;
    target.click().await?;

    let latency_ms = start_instant.elapsed().as_millis() as u64;
    info!(
        action_id = %ctx.action_id,
        latency_ms = latency_ms,
        "Click completed successfully"
    );
    Ok(ActionReport::success(started_at, latency_ms))
}

pub async fn execute_hover(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(action_id = %ctx.action_id, target = %target.describe(), "hover");

    check_ctx(ctx)?;
    target.hover().await?;

    Ok(ActionReport::success(
        started_at,
        start_instant.elapsed().as_millis() as u64,
    ))
}

pub async fn execute_set_checked(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    checked: bool,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        checked,
        "set checked"
    );

    check_ctx(ctx)?;
    target.set_checked(checked).await?;

    Ok(ActionReport::success(
        started_at,
        start_instant.elapsed().as_millis() as u64,
    ))
}
