//! Steps: one action against one resolved target

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ValidationError;
use crate::locator::{CandidateDescriptor, LocatorStrategy};

/// Action vocabulary understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
    PressSequentially,
    /// Normalized to keystroke simulation at dispatch time
    Fill,
    Press,
    Select,
    Check,
    Uncheck,
    Hover,
    Scroll,
    #[serde(rename = "waitFor")]
    WaitFor,
    AssertText,
    AssertVisible,
    AssertMatch,
    AssertTitle,
    Custom,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::PressSequentially => "press_sequentially",
            ActionKind::Fill => "fill",
            ActionKind::Press => "press",
            ActionKind::Select => "select",
            ActionKind::Check => "check",
            ActionKind::Uncheck => "uncheck",
            ActionKind::Hover => "hover",
            ActionKind::Scroll => "scroll",
            ActionKind::WaitFor => "waitFor",
            ActionKind::AssertText => "assert_text",
            ActionKind::AssertVisible => "assert_visible",
            ActionKind::AssertMatch => "assert_match",
            ActionKind::AssertTitle => "assert_title",
            ActionKind::Custom => "custom",
        }
    }

    /// Page-level actions never go through locator resolution
    pub fn needs_target(&self) -> bool {
        !matches!(self, ActionKind::Navigate | ActionKind::AssertTitle)
    }

    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ActionKind::AssertText
                | ActionKind::AssertVisible
                | ActionKind::AssertMatch
                | ActionKind::AssertTitle
        )
    }

    /// Text-entry actions; all of them type keystroke by keystroke
    pub fn is_text_entry(&self) -> bool {
        matches!(self, ActionKind::Fill | ActionKind::PressSequentially)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load state to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WaitKind {
    #[default]
    DomReady,
    Load,
    NetworkIdle,
}

impl WaitKind {
    pub fn name(&self) -> &'static str {
        match self {
            WaitKind::DomReady => "domReady",
            WaitKind::Load => "load",
            WaitKind::NetworkIdle => "networkIdle",
        }
    }
}

impl fmt::Display for WaitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Wait specification attached to every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitSpec {
    #[serde(rename = "type", default)]
    pub kind: WaitKind,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for WaitSpec {
    fn default() -> Self {
        Self {
            kind: WaitKind::DomReady,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl WaitSpec {
    pub fn new(kind: WaitKind, timeout_ms: u64) -> Self {
        Self { kind, timeout_ms }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One unit of work produced by the reasoning collaborator.
///
/// The engine rewrites `locator`, `alt_locators`, `confidence` and the two
/// reference ids after execution; the step is not touched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub intent: String,
    pub action: ActionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    pub locator: CandidateDescriptor,

    #[serde(default)]
    pub alt_locators: Vec<CandidateDescriptor>,

    pub wait: WaitSpec,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    pub confidence: f64,

    #[serde(default)]
    pub expected_text: Option<String>,

    #[serde(default)]
    pub pattern: Option<String>,

    pub dom_reference: u32,
    pub screen_reference: u32,
}

impl Step {
    pub fn new(intent: impl Into<String>, action: ActionKind, locator: CandidateDescriptor) -> Self {
        Self {
            intent: intent.into(),
            action,
            input: None,
            locator,
            alt_locators: Vec::new(),
            wait: WaitSpec::default(),
            reason: String::new(),
            confidence: 0.0,
            expected_text: None,
            pattern: None,
            dom_reference: 0,
            screen_reference: 0,
        }
    }

    /// Navigate step; the locator is a placeholder the engine never resolves
    pub fn navigate(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(
            format!("Open {}", url),
            ActionKind::Navigate,
            CandidateDescriptor::value(LocatorStrategy::Css, "html"),
        )
        .with_input(url)
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_alternates(mut self, alternates: Vec<CandidateDescriptor>) -> Self {
        self.alt_locators = alternates;
        self
    }

    pub fn with_wait(mut self, wait: WaitSpec) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_expected_text(mut self, text: impl Into<String>) -> Self {
        self.expected_text = Some(text.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Primary first, then alternates in their given order
    pub fn candidates(&self) -> Vec<CandidateDescriptor> {
        std::iter::once(self.locator.clone())
            .chain(self.alt_locators.iter().cloned())
            .collect()
    }

    /// Check that the payload the action needs is present.
    pub fn validate_payload(&self) -> Result<(), ValidationError> {
        let action = self.action;
        let missing = |field| ValidationError::MissingPayload { action, field };
        match action {
            ActionKind::Navigate => {
                let target = self.input.as_deref().map(str::trim).unwrap_or_default();
                if target.is_empty() {
                    return Err(missing("input"));
                }
                validate_navigable(target)
            }
            ActionKind::Fill
            | ActionKind::PressSequentially
            | ActionKind::Press
            | ActionKind::AssertTitle => {
                if self.input.is_none() {
                    return Err(missing("input"));
                }
                Ok(())
            }
            ActionKind::AssertText => {
                if self.expected_text.is_none() {
                    return Err(missing("expectedText"));
                }
                Ok(())
            }
            ActionKind::AssertMatch => {
                if self.pattern.is_none() {
                    return Err(missing("pattern"));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn validate_navigable(target: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        target: target.to_string(),
        reason,
    };
    let parsed = Url::parse(target).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
