//! Select primitive - choose an option from a dropdown

use crate::{
    document::ElementHandle,
    errors::ActionError,
    primitives::check_ctx,
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use tracing::info;

/// Execute select primitive
///
/// Without a value the control is only clicked, which is how custom
/// (non-`<select>`) dropdowns get opened before an option step.
pub async fn execute_select(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    value: Option<&str>,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();

    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        value = ?value,
        "Executing select primitive"
    );

    check_ctx(ctx)?;

    let report = match value {
        Some(value) => {
            target.select_option(value).await?;
            ActionReport::success(started_at, start_instant.elapsed().as_millis() as u64)
        }
        None => {
            target.click().await?;
            ActionReport::success(started_at, start_instant.elapsed().as_millis() as u64)
                .with_note("no option given; control clicked")
        }
    };
    Ok(report)
}
