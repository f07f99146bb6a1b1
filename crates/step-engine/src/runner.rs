use std::future::Future;
use std::time::{Duration, Instant};

use action_locator::LocatorResolver;
use action_primitives::{ActionError, ActionPrimitives, ExecCtx};
use stepwright_core_types::{ActionKind, FailureKind, RunLogEntry, Step, StepStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::dispatch::{dispatch_action, unhandled_custom};
use crate::errors::StepError;
use crate::model::{RunContext, StepOutcome, StepPhase};
use crate::overlay;
use crate::policy::EnginePolicyView;

/// Slack on top of the step timeout so a primitive's own deadline error wins
const DISPATCH_GRACE: Duration = Duration::from_millis(250);

pub(crate) struct RuntimeDeps<'a> {
    pub run: &'a RunContext,
    pub resolver: &'a dyn LocatorResolver,
    pub primitives: &'a dyn ActionPrimitives,
    pub policy: &'a EnginePolicyView,
}

#[instrument(skip_all, fields(index = index, action = %step.action))]
pub(crate) async fn execute(
    deps: &RuntimeDeps<'_>,
    index: usize,
    step: &mut Step,
    cancel: &CancellationToken,
) -> StepOutcome {
    let started = Instant::now();
    let document = deps.run.document.as_ref();
    let url_before = document.current_url().await.unwrap_or_default();
    let mut entry = RunLogEntry::pending(index, step, url_before.as_str());
    phase(StepPhase::Pending);

    let result = if step.action == ActionKind::Navigate {
        run_navigate(deps, index, step, &url_before, &mut entry, cancel).await
    } else {
        run_interaction(deps, index, step, &url_before, &mut entry, cancel).await
    };

    let outcome = match result {
        Ok(()) => {
            entry.status = StepStatus::Passed;
            StepOutcome::Passed
        }
        Err(err) => {
            let kind = err
                .failure_kind()
                .unwrap_or(FailureKind::ActionDispatchFailed);
            entry.status = StepStatus::Failed;
            entry.failure_kind = Some(kind);
            push_note(&mut entry, err.to_string());
            if entry.url_after.is_none() {
                entry.url_after = document.current_url().await.ok();
            }
            StepOutcome::Failed(kind)
        }
    };

    entry.timings_ms.total = elapsed_ms(started);
    deps.run.recorder.record(entry);
    phase(StepPhase::Logged);
    outcome
}

async fn run_navigate(
    deps: &RuntimeDeps<'_>,
    index: usize,
    step: &mut Step,
    url_before: &str,
    entry: &mut RunLogEntry,
    cancel: &CancellationToken,
) -> Result<(), StepError> {
    step.validate_payload()?;
    let url = step.input.as_deref().unwrap_or_default().trim().to_string();
    let timeout = step.wait.timeout();
    let ctx = ExecCtx::new(index, timeout, cancel.child_token());

    phase(StepPhase::Dispatching);
    let dispatch_started = Instant::now();
    let dispatched = with_timeout(
        timeout,
        deps.primitives
            .navigate(&ctx, deps.run.document.as_ref(), &url, step.wait.kind),
    )
    .await;
    entry.timings_ms.dispatch = Some(elapsed_ms(dispatch_started));
    if let Err(err) = dispatched {
        phase(StepPhase::ActionFailed);
        return Err(err.into());
    }
    phase(StepPhase::Done);

    capture_and_link(deps, step, url_before, false, entry).await;
    Ok(())
}

async fn run_interaction(
    deps: &RuntimeDeps<'_>,
    index: usize,
    step: &mut Step,
    url_before: &str,
    entry: &mut RunLogEntry,
    cancel: &CancellationToken,
) -> Result<(), StepError> {
    step.validate_payload()?;
    if step.action == ActionKind::Custom {
        phase(StepPhase::ActionFailed);
        return Err(StepError::ActionDispatchFailed(unhandled_custom(step)));
    }
    let document = deps.run.document.as_ref();

    let target = if step.action.needs_target() {
        let candidates = step.candidates();
        entry.locator_tried = candidates.clone();

        phase(StepPhase::Resolving);
        let resolve_started = Instant::now();
        let resolved = deps.resolver.resolve(document, &candidates).await;
        entry.timings_ms.resolve = Some(elapsed_ms(resolve_started));
        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                phase(StepPhase::Unresolved);
                return Err(err.into());
            }
        };
        phase(StepPhase::Resolved);

        step.locator = resolved.chosen.clone();
        step.alt_locators = resolved.alternates.clone();
        step.confidence = resolved.confidence;
        entry.chosen_locator = Some(resolved.chosen.clone());
        entry.alt_locators_used = resolved.used_alternate();
        entry.confidence = resolved.confidence;
        Some(resolved.element)
    } else {
        None
    };

    let timeout = step.wait.timeout();
    let ctx = ExecCtx::new(index, timeout, cancel.child_token());
    phase(StepPhase::Dispatching);
    let dispatch_started = Instant::now();
    let dispatched = with_timeout(
        timeout,
        dispatch_action(
            deps.primitives,
            deps.policy,
            &ctx,
            document,
            step,
            target.as_deref(),
        ),
    )
    .await;
    entry.timings_ms.dispatch = Some(elapsed_ms(dispatch_started));
    let report = match dispatched {
        Ok(report) => report,
        Err(err) => {
            phase(StepPhase::ActionFailed);
            return Err(err.into());
        }
    };
    phase(StepPhase::Done);
    if let Some(note) = report.note {
        push_note(entry, note);
    }

    let autosuggest = deps.run.capture.policy().capture_on_autosuggest_visible
        && overlay::autosuggest_visible(document).await;

    let settled = deps.primitives.settle(document, timeout).await?;
    if let Some(reason) = settled.transient_failure {
        let err = StepError::TransientWaitFailure(reason);
        warn!(index, error = %err, "stability wait incomplete; continuing");
    }

    capture_and_link(deps, step, url_before, autosuggest, entry).await;
    Ok(())
}

/// Apply the capture policy and link the resulting ids to the step. A failed
/// capture keeps the latest ids and leaves a note; the step still passes.
async fn capture_and_link(
    deps: &RuntimeDeps<'_>,
    step: &mut Step,
    url_before: &str,
    autosuggest: bool,
    entry: &mut RunLogEntry,
) {
    let document = deps.run.document.as_ref();
    let ids = match deps
        .run
        .capture
        .maybe_capture(document, url_before, autosuggest)
        .await
    {
        Ok(outcome) => {
            entry.url_after = Some(outcome.url_after);
            outcome.ids
        }
        Err(err) => {
            warn!(error = %err, "artifact capture failed; keeping latest ids");
            push_note(entry, format!("artifact capture failed: {}", err));
            entry.url_after = document.current_url().await.ok();
            deps.run.capture.latest_ids()
        }
    };
    step.dom_reference = ids.dom_reference;
    step.screen_reference = ids.screen_reference;
    entry.artifacts = Some(ids);
}

async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ActionError>>,
) -> Result<T, ActionError> {
    match tokio::time::timeout(limit + DISPATCH_GRACE, fut).await {
        Ok(result) => result,
        Err(_) => Err(ActionError::WaitTimeout(format!(
            "action did not finish within {}ms",
            limit.as_millis()
        ))),
    }
}

fn phase(phase: StepPhase) {
    debug!(phase = %phase, "step phase");
}

fn push_note(entry: &mut RunLogEntry, note: impl AsRef<str>) {
    if !entry.notes.is_empty() {
        entry.notes.push_str("; ");
    }
    entry.notes.push_str(note.as_ref());
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
