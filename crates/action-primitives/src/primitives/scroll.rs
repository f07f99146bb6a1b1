//! Scroll primitive - bring an element to the middle of the viewport

use crate::{
    document::ElementHandle,
    errors::ActionError,
    primitives::check_ctx,
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use tracing::debug;

pub async fn execute_scroll(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(action_id = %ctx.action_id, target = %target.describe(), "scroll into view");

    check_ctx(ctx)?;
    target.scroll_into_view().await?;

    Ok(ActionReport::success(
        started_at,
        start_instant.elapsed().as_millis() as u64,
    ))
}
