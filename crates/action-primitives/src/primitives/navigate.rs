//! Navigate primitive - Load a URL and wait for the requested state

use crate::{
    document::DocumentPort,
    errors::ActionError,
    primitives::check_ctx,
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use stepwright_core_types::WaitKind;
use tracing::{info, warn};

/// Execute navigate primitive
///
/// The document's own navigation timeout is the time left on the context.
pub async fn execute_navigate(
    ctx: &ExecCtx,
    document: &dyn DocumentPort,
    url: &str,
    wait: WaitKind,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();

    info!(
        action_id = %ctx.action_id,
        url = %url,
        wait = %wait,
        "Executing navigate primitive"
    );

    check_ctx(ctx)?;

    if let Err(err) = document.navigate(url, wait, ctx.remaining_time()).await {
        warn!(url = %url, error = %err, "navigation failed");
        return Err(err);
    }

    let latency_ms = start_instant.elapsed().as_millis() as u64;
    info!(
        action_id = %ctx.action_id,
        latency_ms = latency_ms,
        "Navigate completed successfully"
    );
    Ok(ActionReport::success(started_at, latency_ms))
}
