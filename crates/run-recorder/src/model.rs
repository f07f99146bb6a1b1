use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stepwright_core_types::{ArtifactMap, RunLogEntry, Step};

use crate::policy::BrowserMeta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub browser: BrowserMeta,
    pub locale: String,
}

/// Shape of `run_log.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub meta: RunMeta,
    pub steps: Vec<RunLogEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn from_entries(entries: &[RunLogEntry]) -> Self {
        let passed = entries.iter().filter(|entry| entry.passed()).count();
        Self {
            passed,
            failed: entries.len() - passed,
            total: entries.len(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Everything the end-of-run exports need besides the log itself
#[derive(Debug, Clone, Copy)]
pub struct ExportReq<'a> {
    pub steps: &'a [Step],
    pub artifacts: &'a ArtifactMap,
    pub run_dir: &'a Path,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportResult {
    /// Files written, in export order
    pub written: Vec<PathBuf>,
    pub summary: RunSummary,
}
