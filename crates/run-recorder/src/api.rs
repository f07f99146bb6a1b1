use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use stepwright_core_types::RunLogEntry;
use tracing::{info, warn};

use crate::errors::{RecResult, RecorderError};
use crate::export::codegen::project_plan;
use crate::export::json::write_json;
use crate::export::jsonl::{serialize_lines, write_lines};
use crate::model::{ExportReq, ExportResult, RunLog, RunMeta, RunSummary};
use crate::policy::{RecorderPolicyView, Verbosity};

pub const PLAN_FILE: &str = "plan.json";
pub const ARTIFACTS_FILE: &str = "artifacts.json";
pub const RUN_LOG_FILE: &str = "run_log.json";
pub const STEPS_JSONL_FILE: &str = "steps.jsonl";

pub trait Recorder: Send + Sync {
    /// Append one entry; entries are never rewritten
    fn record(&self, entry: RunLogEntry);
    fn entries(&self) -> Vec<RunLogEntry>;
    fn summary(&self) -> RunSummary;
    /// Write every export into the run directory. Each export is attempted
    /// even when an earlier one failed; the first error is returned.
    fn finish(&self, req: ExportReq<'_>) -> RecResult<ExportResult>;
    fn policy_view(&self) -> &RecorderPolicyView;
}

pub struct RunRecorder {
    policy: RecorderPolicyView,
    started_at: String,
    entries: Mutex<Vec<RunLogEntry>>,
}

impl RunRecorder {
    pub fn new(policy: RecorderPolicyView) -> Self {
        Self {
            policy,
            started_at: now_rfc3339(),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn meta(&self) -> RunMeta {
        RunMeta {
            started_at: self.started_at.clone(),
            ended_at: Some(now_rfc3339()),
            browser: self.policy.browser.clone(),
            locale: self.policy.browser.locale.clone(),
        }
    }

    fn console_line(&self, entry: &RunLogEntry) {
        let line = if entry.notes.is_empty() || entry.passed() {
            format!("[STEP - {}] {} -> {}", entry.index, entry.intent, entry.status)
        } else {
            format!(
                "[STEP - {}] {} -> {} -> {}",
                entry.index, entry.intent, entry.status, entry.notes
            )
        };
        match (self.policy.verbosity, entry.passed()) {
            (Verbosity::Silent, _) => {}
            (Verbosity::Normal, true) => {}
            (_, false) => warn!(index = entry.index, action = %entry.action, "{}", line),
            (Verbosity::Verbose, true) => info!(index = entry.index, action = %entry.action, "{}", line),
        }
    }
}

impl Default for RunRecorder {
    fn default() -> Self {
        Self::new(RecorderPolicyView::default())
    }
}

impl Recorder for RunRecorder {
    fn record(&self, entry: RunLogEntry) {
        self.console_line(&entry);
        self.entries.lock().push(entry);
    }

    fn entries(&self) -> Vec<RunLogEntry> {
        self.entries.lock().clone()
    }

    fn summary(&self) -> RunSummary {
        RunSummary::from_entries(&self.entries.lock())
    }

    fn finish(&self, req: ExportReq<'_>) -> RecResult<ExportResult> {
        let mut result = ExportResult {
            written: Vec::new(),
            summary: self.summary(),
        };
        let mut first_err: Option<RecorderError> = None;
        let mut keep = |outcome: RecResult<std::path::PathBuf>| match outcome {
            Ok(path) => result.written.push(path),
            Err(err) => {
                warn!(error = %err, "export failed");
                first_err.get_or_insert(err);
            }
        };

        keep(write_json(&req.run_dir.join(PLAN_FILE), "plan", req.steps));
        keep(write_json(
            &req.run_dir.join(ARTIFACTS_FILE),
            "artifact map",
            req.artifacts,
        ));
        if self.policy.save_run_log {
            let log = RunLog {
                meta: self.meta(),
                steps: self.entries(),
            };
            keep(write_json(&req.run_dir.join(RUN_LOG_FILE), "run log", &log));
        }
        if self.policy.write_jsonl {
            keep(
                serialize_lines(&project_plan(req.steps))
                    .and_then(|lines| write_lines(&req.run_dir.join(STEPS_JSONL_FILE), &lines)),
            );
        }

        if let Some(err) = first_err {
            return Err(err);
        }
        info!(
            dir = %req.run_dir.display(),
            files = result.written.len(),
            passed = result.summary.passed,
            failed = result.summary.failed,
            "Saved run outputs"
        );
        Ok(result)
    }

    fn policy_view(&self) -> &RecorderPolicyView {
        &self.policy
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwright_core_types::{
        ActionKind, ArtifactMap, CandidateDescriptor, FailureKind, LocatorStrategy, Step,
        StepStatus,
    };
    use tempfile::tempdir;

    fn steps() -> Vec<Step> {
        vec![
            Step::navigate("https://example.test/"),
            Step::new(
                "Click login",
                ActionKind::Click,
                CandidateDescriptor::value(LocatorStrategy::Id, "login-btn"),
            ),
        ]
    }

    fn entries(steps: &[Step]) -> Vec<RunLogEntry> {
        let mut passed = RunLogEntry::pending(1, &steps[0], "about:blank");
        passed.status = StepStatus::Passed;
        let mut failed = RunLogEntry::pending(2, &steps[1], "https://example.test/");
        failed.notes = "Element not found: id:'login-btn' -> no match".into();
        failed.failure_kind = Some(FailureKind::CandidateExhausted);
        vec![passed, failed]
    }

    #[test]
    fn records_in_order_and_summarizes() {
        let recorder = RunRecorder::default();
        let steps = steps();
        for entry in entries(&steps) {
            recorder.record(entry);
        }
        let recorded = recorder.entries();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].index, 1);
        assert_eq!(
            recorder.summary(),
            RunSummary {
                passed: 1,
                failed: 1,
                total: 2
            }
        );
        assert!(!recorder.summary().all_passed());
    }

    #[test]
    fn finish_writes_every_export() {
        let dir = tempdir().unwrap();
        let recorder = RunRecorder::default();
        let steps = steps();
        for entry in entries(&steps) {
            recorder.record(entry);
        }
        let artifacts = ArtifactMap::new();
        let result = recorder
            .finish(ExportReq {
                steps: &steps,
                artifacts: &artifacts,
                run_dir: dir.path(),
            })
            .unwrap();
        assert_eq!(result.written.len(), 4);

        let log: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(RUN_LOG_FILE)).unwrap())
                .unwrap();
        assert_eq!(log["meta"]["browser"]["engine"], "chromium");
        assert_eq!(log["meta"]["browser"]["timezoneId"], "Asia/Kolkata");
        assert_eq!(log["meta"]["locale"], "en-IN");
        assert!(log["meta"]["endedAt"].is_string());
        assert_eq!(log["steps"][1]["failureKind"], "candidate_exhausted");

        let artifacts: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(ARTIFACTS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(artifacts, serde_json::json!({"screenshots": [], "dom": []}));

        let jsonl = std::fs::read_to_string(dir.path().join(STEPS_JSONL_FILE)).unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"goto\""));

        let plan = std::fs::read_to_string(dir.path().join(PLAN_FILE)).unwrap();
        let parsed = stepwright_core_types::steps_from_json_str(&plan).unwrap();
        assert_eq!(parsed, steps);
    }

    #[test]
    fn run_log_is_optional() {
        let dir = tempdir().unwrap();
        let recorder = RunRecorder::new(RecorderPolicyView {
            save_run_log: false,
            verbosity: Verbosity::Silent,
            ..RecorderPolicyView::default()
        });
        let steps = steps();
        let artifacts = ArtifactMap::new();
        let result = recorder
            .finish(ExportReq {
                steps: &steps,
                artifacts: &artifacts,
                run_dir: dir.path(),
            })
            .unwrap();
        assert_eq!(result.written.len(), 3);
        assert!(!dir.path().join(RUN_LOG_FILE).exists());
    }

    #[test]
    fn export_failure_still_attempts_the_rest() {
        let dir = tempdir().unwrap();
        // A directory squatting on plan.json makes that one export fail
        std::fs::create_dir(dir.path().join(PLAN_FILE)).unwrap();

        let recorder = RunRecorder::default();
        let steps = steps();
        let artifacts = ArtifactMap::new();
        let err = recorder
            .finish(ExportReq {
                steps: &steps,
                artifacts: &artifacts,
                run_dir: dir.path(),
            })
            .unwrap_err();
        assert!(matches!(err, RecorderError::Write { .. }));
        assert!(dir.path().join(ARTIFACTS_FILE).exists());
        assert!(dir.path().join(RUN_LOG_FILE).exists());
        assert!(dir.path().join(STEPS_JSONL_FILE).exists());
    }
}
