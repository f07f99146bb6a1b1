//! Post-action stability waits

use crate::{document::DocumentPort, errors::ActionError, types::SettleReport};
use async_trait::async_trait;
use std::time::Duration;
use stepwright_core_types::WaitKind;
use tracing::{debug, warn};

/// Waiting strategy trait
#[async_trait]
pub trait WaitStrategy: Send + Sync {
    /// Wait until the document is stable after an interaction
    async fn settle(
        &self,
        document: &dyn DocumentPort,
        timeout: Duration,
    ) -> Result<SettleReport, ActionError>;
}

/// Default waiting strategy implementation
///
/// `load` then `domReady` must succeed; `networkIdle` is best effort and its
/// failure is only reported. A fixed settle delay follows.
pub struct DefaultWaitStrategy {
    /// Upper bound for the network-idle wait (milliseconds)
    pub network_idle_timeout_ms: u64,

    /// Fixed pause after the load-state waits (milliseconds)
    pub settle_delay_ms: u64,
}

impl Default for DefaultWaitStrategy {
    fn default() -> Self {
        Self {
            network_idle_timeout_ms: 5000,
            settle_delay_ms: 2000,
        }
    }
}

impl DefaultWaitStrategy {
    pub fn new(settle_delay_ms: u64) -> Self {
        Self {
            settle_delay_ms,
            ..Self::default()
        }
    }
}

#[async_trait]
impl WaitStrategy for DefaultWaitStrategy {
    async fn settle(
        &self,
        document: &dyn DocumentPort,
        timeout: Duration,
    ) -> Result<SettleReport, ActionError> {
        debug!("waiting for load and domReady");
        document.wait_for_load_state(WaitKind::Load, timeout).await?;
        document
            .wait_for_load_state(WaitKind::DomReady, timeout)
            .await?;

        let idle_timeout = timeout.min(Duration::from_millis(self.network_idle_timeout_ms));
        let mut report = SettleReport::default();
        match document
            .wait_for_load_state(WaitKind::NetworkIdle, idle_timeout)
            .await
        {
            Ok(()) => report.network_idle = true,
            Err(err) => {
                warn!(error = %err, "network idle not reached; continuing");
                report.transient_failure = Some(err.to_string());
            }
        }

        if self.settle_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settle_delay_ms)).await;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{ScriptedDocument, SiteFixture};

    fn fixture(fail_network_idle: bool) -> SiteFixture {
        let mut site = SiteFixture::single_page("https://example.test/", "Home");
        site.fail_network_idle = fail_network_idle;
        site
    }

    #[test]
    fn test_default_wait_strategy_config() {
        let strategy = DefaultWaitStrategy::default();
        assert_eq!(strategy.network_idle_timeout_ms, 5000);
        assert_eq!(strategy.settle_delay_ms, 2000);
    }

    #[tokio::test]
    async fn test_network_idle_failure_is_swallowed() {
        let document = ScriptedDocument::new(fixture(true));
        let strategy = DefaultWaitStrategy::new(0);
        let report = strategy
            .settle(&document, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(!report.network_idle);
        assert!(report.transient_failure.is_some());
    }

    #[tokio::test]
    async fn test_quiet_page_settles() {
        let document = ScriptedDocument::new(fixture(false));
        let report = DefaultWaitStrategy::new(0)
            .settle(&document, Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(
            report,
            SettleReport {
                network_idle: true,
                transient_failure: None
            }
        );
    }
}
