//! One run wired end to end: capture, recorder, engine, exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use action_primitives::DocumentPort;
use anyhow::{Context, Result};
use run_recorder::{ExportReq, ExportResult, Recorder, RunRecorder};
use step_engine::{RunContext, RunReport, StepEngineBuilder};
use stepwright_core_types::{validate_plan, PlanIssue, RunId, Step};
use stepwright_snapshot_store::ArtifactCaptureBuilder;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AppConfig;

pub struct SessionReport {
    pub run_dir: PathBuf,
    pub run: RunReport,
    pub exports: ExportResult,
    /// Structural issues found before the run; the run still goes ahead
    pub plan_issues: Vec<PlanIssue>,
}

pub struct RunSession {
    config: AppConfig,
    run_dir: PathBuf,
}

impl RunSession {
    /// Fresh run directory named after a new run id under `out_root`
    pub fn new(config: AppConfig, out_root: &Path) -> Self {
        let run_dir = out_root.join(RunId::new().to_string());
        Self::with_run_dir(config, run_dir)
    }

    pub fn with_run_dir(config: AppConfig, run_dir: PathBuf) -> Self {
        Self { config, run_dir }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Run every step against `document`, then persist the plan, the
    /// artifact map and the run log. Exports happen even after an abort.
    pub async fn execute(
        &self,
        document: Arc<dyn DocumentPort>,
        steps: &mut [Step],
        cancel: &CancellationToken,
    ) -> Result<SessionReport> {
        let plan_issues =
            validate_plan(steps, self.config.grounding.max_alt_locators_per_step);
        for issue in &plan_issues {
            warn!(step = issue.step, "Plan issue: {}", issue);
        }

        std::fs::create_dir_all(&self.run_dir)
            .with_context(|| format!("failed to create {}", self.run_dir.display()))?;

        let capture = ArtifactCaptureBuilder::new(self.config.capture_policy(&self.run_dir)).build();
        let recorder: Arc<dyn Recorder> =
            Arc::new(RunRecorder::new(self.config.recorder_policy()));
        let engine = StepEngineBuilder::new(self.config.engine_policy()).build();
        let ctx = RunContext::new(document, capture.clone(), recorder.clone());

        info!(run_dir = %self.run_dir.display(), steps = steps.len(), "Starting run");
        let run = engine.run(&ctx, steps, cancel).await;

        let artifacts = capture.artifact_map();
        let exports = recorder
            .finish(ExportReq {
                steps,
                artifacts: &artifacts,
                run_dir: &self.run_dir,
            })
            .context("failed to persist run outputs")?;

        Ok(SessionReport {
            run_dir: self.run_dir.clone(),
            run,
            exports,
            plan_issues,
        })
    }
}
