use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// When snapshots are taken and where they go.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePolicyView {
    #[serde(default = "default_true")]
    pub capture_on_url_change: bool,
    #[serde(default = "default_true")]
    pub capture_on_autosuggest_visible: bool,
    #[serde(default)]
    pub capture_on_every_step: bool,
    #[serde(default)]
    pub full_page_screenshots: bool,
    #[serde(skip)]
    pub io: IoCfg,
}

fn default_true() -> bool {
    true
}

impl Default for CapturePolicyView {
    fn default() -> Self {
        Self {
            capture_on_url_change: true,
            capture_on_autosuggest_visible: true,
            capture_on_every_step: false,
            full_page_screenshots: false,
            io: IoCfg::default(),
        }
    }
}

/// What triggered a capture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureReason {
    UrlChanged,
    AutosuggestVisible,
    EveryStep,
}

impl fmt::Display for CaptureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureReason::UrlChanged => f.write_str("url_changed"),
            CaptureReason::AutosuggestVisible => f.write_str("autosuggest_visible"),
            CaptureReason::EveryStep => f.write_str("every_step"),
        }
    }
}

impl CapturePolicyView {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.io.root = root.into();
        self
    }

    /// First trigger that fires, if any
    pub fn trigger(
        &self,
        url_before: &str,
        url_after: &str,
        autosuggest_visible: bool,
    ) -> Option<CaptureReason> {
        if self.capture_on_url_change && url_before != url_after {
            Some(CaptureReason::UrlChanged)
        } else if self.capture_on_autosuggest_visible && autosuggest_visible {
            Some(CaptureReason::AutosuggestVisible)
        } else if self.capture_on_every_step {
            Some(CaptureReason::EveryStep)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct IoCfg {
    /// Run directory; `dom/` and `screens/` are created beneath it
    pub root: PathBuf,
}

impl Default for IoCfg {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./runs/current"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_follow_flags() {
        let policy = CapturePolicyView::default();
        assert_eq!(
            policy.trigger("a", "b", false),
            Some(CaptureReason::UrlChanged)
        );
        assert_eq!(
            policy.trigger("a", "a", true),
            Some(CaptureReason::AutosuggestVisible)
        );
        assert_eq!(policy.trigger("a", "a", false), None);

        let every = CapturePolicyView {
            capture_on_url_change: false,
            capture_on_autosuggest_visible: false,
            capture_on_every_step: true,
            ..CapturePolicyView::default()
        };
        assert_eq!(every.trigger("a", "b", true), Some(CaptureReason::EveryStep));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let policy: CapturePolicyView =
            serde_json::from_str(r#"{"captureOnEveryStep": true}"#).unwrap();
        assert!(policy.capture_on_url_change);
        assert!(policy.capture_on_every_step);
        assert!(!policy.full_page_screenshots);
    }
}
