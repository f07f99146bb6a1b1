use std::sync::Arc;

use action_locator::{DefaultLocatorResolver, LocatorResolver};
use action_primitives::{ActionPrimitives, DefaultActionPrimitives, DefaultWaitStrategy};
use async_trait::async_trait;
use stepwright_core_types::Step;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::model::{RunContext, RunReport, StepOutcome};
use crate::policy::EnginePolicyView;
use crate::runner::{execute, RuntimeDeps};

#[async_trait]
pub trait StepEngine: Send + Sync {
    /// Execute one step, record its log entry and write the chosen locator
    /// and artifact ids back onto it. Never fails; failure is an outcome.
    async fn run_step(
        &self,
        ctx: &RunContext,
        index: usize,
        step: &mut Step,
        cancel: &CancellationToken,
    ) -> StepOutcome;

    /// Execute steps in order until done or until `cancel` fires between
    /// steps. Indices in the run log are 1-based.
    async fn run(
        &self,
        ctx: &RunContext,
        steps: &mut [Step],
        cancel: &CancellationToken,
    ) -> RunReport;

    fn policy(&self) -> &EnginePolicyView;
}

pub struct StepEngineBuilder {
    policy: EnginePolicyView,
    resolver: Option<Arc<dyn LocatorResolver>>,
    primitives: Option<Arc<dyn ActionPrimitives>>,
}

impl StepEngineBuilder {
    pub fn new(policy: EnginePolicyView) -> Self {
        Self {
            policy,
            resolver: None,
            primitives: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn LocatorResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_primitives(mut self, primitives: Arc<dyn ActionPrimitives>) -> Self {
        self.primitives = Some(primitives);
        self
    }

    pub fn build(self) -> Arc<dyn StepEngine> {
        let policy = self.policy;
        let resolver = self.resolver.unwrap_or_else(|| {
            Arc::new(DefaultLocatorResolver::new(policy.max_alternates)) as Arc<dyn LocatorResolver>
        });
        let primitives = self.primitives.unwrap_or_else(|| {
            Arc::new(
                DefaultActionPrimitives::new()
                    .with_wait_strategy(Arc::new(DefaultWaitStrategy::new(policy.settle_delay_ms)))
                    .with_typing_delay(policy.typing_delay()),
            ) as Arc<dyn ActionPrimitives>
        });
        Arc::new(DefaultStepEngine {
            policy,
            resolver,
            primitives,
        })
    }
}

pub struct DefaultStepEngine {
    policy: EnginePolicyView,
    resolver: Arc<dyn LocatorResolver>,
    primitives: Arc<dyn ActionPrimitives>,
}

#[async_trait]
impl StepEngine for DefaultStepEngine {
    async fn run_step(
        &self,
        ctx: &RunContext,
        index: usize,
        step: &mut Step,
        cancel: &CancellationToken,
    ) -> StepOutcome {
        let deps = RuntimeDeps {
            run: ctx,
            resolver: self.resolver.as_ref(),
            primitives: self.primitives.as_ref(),
            policy: &self.policy,
        };
        execute(&deps, index, step, cancel).await
    }

    async fn run(
        &self,
        ctx: &RunContext,
        steps: &mut [Step],
        cancel: &CancellationToken,
    ) -> RunReport {
        let total = steps.len();
        let mut report = RunReport::default();
        for (position, step) in steps.iter_mut().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    executed = position,
                    remaining = total - position,
                    "Run aborted; skipping remaining steps"
                );
                report.aborted = true;
                break;
            }
            let outcome = self.run_step(ctx, position + 1, step, cancel).await;
            report.outcomes.push(outcome);
        }
        info!(
            passed = report.passed(),
            failed = report.failed(),
            aborted = report.aborted,
            "Run finished"
        );
        report
    }

    fn policy(&self) -> &EnginePolicyView {
        &self.policy
    }
}
