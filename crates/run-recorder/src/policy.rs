use std::fmt;

use serde::{Deserialize, Serialize};

/// How much of the per-step progress reaches the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Normal,
    #[default]
    Verbose,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Silent => f.write_str("silent"),
            Verbosity::Normal => f.write_str("normal"),
            Verbosity::Verbose => f.write_str("verbose"),
        }
    }
}

/// Browser block stamped into `run_log.json` meta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserMeta {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_timezone")]
    pub timezone_id: String,
}

impl Default for BrowserMeta {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            locale: default_locale(),
            timezone_id: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderPolicyView {
    #[serde(default = "default_true")]
    pub save_run_log: bool,
    #[serde(default = "default_true")]
    pub write_jsonl: bool,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default)]
    pub browser: BrowserMeta,
}

fn default_true() -> bool {
    true
}

fn default_engine() -> String {
    "chromium".to_string()
}

fn default_locale() -> String {
    "en-IN".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for RecorderPolicyView {
    fn default() -> Self {
        Self {
            save_run_log: true,
            write_jsonl: true,
            verbosity: Verbosity::Verbose,
            browser: BrowserMeta::default(),
        }
    }
}
