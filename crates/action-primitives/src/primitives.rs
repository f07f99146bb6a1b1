//! Action primitives implementation
//!
//! Primitives act on a [`DocumentPort`] (page-level actions) or on an
//! already-resolved [`ElementHandle`]. Resolution happens upstream; a
//! primitive never picks its own target.

mod assert;
mod click;
mod navigate;
mod scroll;
mod select;
mod type_text;
mod wait;

pub use assert::*;
pub use click::*;
pub use navigate::*;
pub use scroll::*;
pub use select::*;
pub use type_text::*;
pub use wait::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use stepwright_core_types::WaitKind;

use crate::{
    document::{DocumentPort, ElementHandle},
    errors::ActionError,
    pattern::TextPattern,
    types::{ActionReport, ExecCtx, SettleReport},
    waiting::{DefaultWaitStrategy, WaitStrategy},
};

/// Per-key delay for keystroke typing
pub const DEFAULT_TYPING_DELAY_MS: u64 = 80;

/// Poll interval for expectation-style assertions
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Action primitives trait
#[async_trait]
pub trait ActionPrimitives: Send + Sync {
    async fn navigate(
        &self,
        ctx: &ExecCtx,
        document: &dyn DocumentPort,
        url: &str,
        wait: WaitKind,
    ) -> Result<ActionReport, ActionError>;

    async fn click(&self, ctx: &ExecCtx, target: &dyn ElementHandle)
        -> Result<ActionReport, ActionError>;

    /// Click, then type keystroke by keystroke
    async fn type_text(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        text: &str,
    ) -> Result<ActionReport, ActionError>;

    async fn press_key(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        key: &str,
    ) -> Result<ActionReport, ActionError>;

    /// Select `value`, or click the control when there is nothing to select
    async fn select(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        value: Option<&str>,
    ) -> Result<ActionReport, ActionError>;

    async fn set_checked(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        checked: bool,
    ) -> Result<ActionReport, ActionError>;

    async fn hover(&self, ctx: &ExecCtx, target: &dyn ElementHandle)
        -> Result<ActionReport, ActionError>;

    async fn scroll(&self, ctx: &ExecCtx, target: &dyn ElementHandle)
        -> Result<ActionReport, ActionError>;

    async fn wait_visible(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError>;

    async fn assert_visible(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError>;

    async fn assert_text(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        expected: &str,
    ) -> Result<ActionReport, ActionError>;

    async fn assert_match(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        pattern: &TextPattern,
    ) -> Result<ActionReport, ActionError>;

    async fn assert_title(
        &self,
        ctx: &ExecCtx,
        document: &dyn DocumentPort,
        expected: &str,
    ) -> Result<ActionReport, ActionError>;

    /// Stability wait after a successful interaction
    async fn settle(
        &self,
        document: &dyn DocumentPort,
        timeout: Duration,
    ) -> Result<SettleReport, ActionError>;
}

/// Default implementation of action primitives
pub struct DefaultActionPrimitives {
    /// Wait strategy for post-action stability waits
    wait_strategy: Arc<dyn WaitStrategy>,

    typing_delay: Duration,

    poll_interval: Duration,
}

impl Default for DefaultActionPrimitives {
    fn default() -> Self {
        Self {
            wait_strategy: Arc::new(DefaultWaitStrategy::default()),
            typing_delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl DefaultActionPrimitives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait_strategy(mut self, strategy: Arc<dyn WaitStrategy>) -> Self {
        self.wait_strategy = strategy;
        self
    }

    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn wait_strategy(&self) -> &Arc<dyn WaitStrategy> {
        &self.wait_strategy
    }
}

/// Refuse to start work on a cancelled or expired context
pub(crate) fn check_ctx(ctx: &ExecCtx) -> Result<(), ActionError> {
    if ctx.is_cancelled() {
        return Err(ActionError::Interrupted("Context cancelled".to_string()));
    }
    if ctx.is_timeout() {
        return Err(ActionError::WaitTimeout(
            "Context deadline exceeded".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl ActionPrimitives for DefaultActionPrimitives {
    async fn navigate(
        &self,
        ctx: &ExecCtx,
        document: &dyn DocumentPort,
        url: &str,
        wait: WaitKind,
    ) -> Result<ActionReport, ActionError> {
        execute_navigate(ctx, document, url, wait).await
    }

    async fn click(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError> {
        execute_click(ctx, target).await
    }

    async fn type_text(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        text: &str,
    ) -> Result<ActionReport, ActionError> {
        execute_type_text(self, ctx, target, text).await
    }

    async fn press_key(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        key: &str,
    ) -> Result<ActionReport, ActionError> {
        execute_press_key(ctx, target, key).await
    }

    async fn select(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        value: Option<&str>,
    ) -> Result<ActionReport, ActionError> {
        execute_select(ctx, target, value).await
    }

    async fn set_checked(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        checked: bool,
    ) -> Result<ActionReport, ActionError> {
        execute_set_checked(ctx, target, checked).await
    }

    async fn hover(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError> {
        execute_hover(ctx, target).await
    }

    async fn scroll(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError> {
        execute_scroll(ctx, target).await
    }

    async fn wait_visible(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError> {
        execute_wait_visible(self, ctx, target).await
    }

    async fn assert_visible(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
    ) -> Result<ActionReport, ActionError> {
        execute_assert_visible(self, ctx, target).await
    }

    async fn assert_text(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        expected: &str,
    ) -> Result<ActionReport, ActionError> {
        execute_assert_text(self, ctx, target, expected).await
    }

    async fn assert_match(
        &self,
        ctx: &ExecCtx,
        target: &dyn ElementHandle,
        pattern: &TextPattern,
    ) -> Result<ActionReport, ActionError> {
        execute_assert_match(self, ctx, target, pattern).await
    }

    async fn assert_title(
        &self,
        ctx: &ExecCtx,
        document: &dyn DocumentPort,
        expected: &str,
    ) -> Result<ActionReport, ActionError> {
        execute_assert_title(self, ctx, document, expected).await
    }

    async fn settle(
        &self,
        document: &dyn DocumentPort,
        timeout: Duration,
    ) -> Result<SettleReport, ActionError> {
        self.wait_strategy.settle(document, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_primitives_config() {
        let primitives = DefaultActionPrimitives::new();
        assert_eq!(primitives.typing_delay(), Duration::from_millis(80));
        assert_eq!(primitives.poll_interval(), Duration::from_millis(50));

        let tuned = DefaultActionPrimitives::new()
            .with_typing_delay(Duration::ZERO)
            .with_poll_interval(Duration::from_millis(5));
        assert_eq!(tuned.typing_delay(), Duration::ZERO);
        assert_eq!(tuned.poll_interval(), Duration::from_millis(5));
    }
}
