//! Keyboard primitives - keystroke typing and single key presses

use crate::{
    document::ElementHandle,
    errors::ActionError,
    primitives::{check_ctx, DefaultActionPrimitives},
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Execute type_text primitive
///
/// Focuses the element with a click, then types one key at a time with the
/// configured delay. Values are never assigned directly, so pages that react
/// to key events (autosuggest, masks) behave as they would for a person.
pub async fn execute_type_text(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    text: &str,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();

    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        text_length = text.len(),
        "Executing type_text primitive"
    );

    check_ctx(ctx)?;

    target.click().await?;
    debug!("Typing {} characters", text.chars().count());
    target
        .press_sequentially(text, primitives.typing_delay())
        .await?;

    let latency_ms = start_instant.elapsed().as_millis() as u64;
    info!(
        action_id = %ctx.action_id,
        latency_ms = latency_ms,
        "Type text completed successfully"
    );
    Ok(ActionReport::success(started_at, latency_ms))
}

pub async fn execute_press_key(
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    key: &str,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(action_id = %ctx.action_id, target = %target.describe(), key, "press key");

    check_ctx(ctx)?;
    if key.trim().is_empty() {
        return Err(ActionError::Internal("Key cannot be empty".to_string()));
    }
    target.press(key).await?;

    Ok(ActionReport::success(
        started_at,
        start_instant.elapsed().as_millis() as u64,
    ))
}
