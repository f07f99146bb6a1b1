//! Application configuration
//!
//! Loaded from YAML with camelCase keys. Every section has defaults, so a
//! partial file is enough.

use std::path::{Path, PathBuf};

use run_recorder::{BrowserMeta, RecorderPolicyView, Verbosity};
use serde::{Deserialize, Serialize};
use step_engine::EnginePolicyView;
use stepwright_snapshot_store::CapturePolicyView;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub grounding: GroundingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Parent of the per-run output directories
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            grounding: GroundingConfig::default(),
            logging: LoggingConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("runs")
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_timezone")]
    pub timezone_id: String,
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

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            locale: default_locale(),
            timezone_id: default_timezone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingConfig {
    #[serde(default = "default_max_alternates")]
    pub max_alt_locators_per_step: usize,
    #[serde(default = "default_true")]
    pub assertion_also_check_visible: bool,
    #[serde(default)]
    pub artifact_policy: CapturePolicyView,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

fn default_max_alternates() -> usize {
    3
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_typing_delay_ms() -> u64 {
    80
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            max_alt_locators_per_step: default_max_alternates(),
            assertion_also_check_visible: true,
            artifact_policy: CapturePolicyView::default(),
            settle_delay_ms: default_settle_delay_ms(),
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_true")]
    pub save_run_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Verbose,
            save_run_log: true,
        }
    }
}

impl AppConfig {
    pub fn engine_policy(&self) -> EnginePolicyView {
        EnginePolicyView {
            assertion_also_check_visible: self.grounding.assertion_also_check_visible,
            settle_delay_ms: self.grounding.settle_delay_ms,
            max_alternates: self.grounding.max_alt_locators_per_step,
            typing_delay_ms: self.grounding.typing_delay_ms,
        }
    }

    pub fn recorder_policy(&self) -> RecorderPolicyView {
        RecorderPolicyView {
            save_run_log: self.logging.save_run_log,
            verbosity: self.logging.verbosity,
            browser: BrowserMeta {
                engine: self.browser.engine.clone(),
                locale: self.browser.locale.clone(),
                timezone_id: self.browser.timezone_id.clone(),
            },
            ..RecorderPolicyView::default()
        }
    }

    /// Capture policy rooted at one run directory
    pub fn capture_policy(&self, run_dir: &Path) -> CapturePolicyView {
        self.grounding.artifact_policy.clone().with_root(run_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let raw = r#"
grounding:
  maxAltLocatorsPerStep: 2
  artifactPolicy:
    captureOnEveryStep: true
logging:
  verbosity: silent
"#;
        let config: AppConfig = serde_yaml::from_str(raw).unwrap();
        assert_eq!(config.browser.locale, "en-IN");
        assert_eq!(config.grounding.max_alt_locators_per_step, 2);
        assert!(config.grounding.artifact_policy.capture_on_every_step);
        assert!(config.grounding.artifact_policy.capture_on_url_change);
        assert_eq!(config.grounding.settle_delay_ms, 2000);
        assert_eq!(config.logging.verbosity, Verbosity::Silent);
        assert!(config.logging.save_run_log);
        assert_eq!(config.output_dir, PathBuf::from("runs"));
    }

    #[test]
    fn policies_follow_config() {
        let mut config = AppConfig::default();
        config.grounding.typing_delay_ms = 0;
        config.browser.timezone_id = "Europe/Berlin".to_string();
        config.logging.save_run_log = false;

        assert_eq!(config.engine_policy().typing_delay_ms, 0);
        assert_eq!(config.engine_policy().max_alternates, 3);
        let recorder = config.recorder_policy();
        assert!(!recorder.save_run_log);
        assert!(recorder.write_jsonl);
        assert_eq!(recorder.browser.engine, "chromium");
        assert_eq!(recorder.browser.locale, "en-IN");
        assert_eq!(recorder.browser.timezone_id, "Europe/Berlin");
        let capture = config.capture_policy(Path::new("/tmp/run"));
        assert_eq!(capture.io.root, PathBuf::from("/tmp/run"));
    }
}
