//! Plan documents: JSON arrays of steps

use std::fmt;

use serde_json::Value;

use crate::errors::{PlanError, ValidationError};
use crate::step::Step;

/// Parse a plan document.
pub fn steps_from_json_str(raw: &str) -> Result<Vec<Step>, PlanError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = value else {
        return Err(PlanError::NotAList);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| PlanError::InvalidStep {
                index: index + 1,
                source,
            })
        })
        .collect()
}

/// Serialize a plan document, pretty printed.
pub fn steps_to_json(steps: &[Step]) -> Result<String, PlanError> {
    Ok(serde_json::to_string_pretty(steps)?)
}

/// One structural problem found in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanIssue {
    /// 1-based step position
    pub step: usize,
    /// `None` for payload issues, otherwise the candidate position (0 = primary)
    pub candidate: Option<usize>,
    pub error: ValidationError,
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.candidate {
            None => write!(f, "step {}: {}", self.step, self.error),
            Some(0) => write!(f, "step {} (primary locator): {}", self.step, self.error),
            Some(n) => write!(f, "step {} (alternate {}): {}", self.step, n, self.error),
        }
    }
}

/// Collect every structural issue without stopping at the first.
///
/// Navigate and page-level steps are not checked for candidates since the
/// engine never resolves them.
pub fn validate_plan(steps: &[Step], max_alternates: usize) -> Vec<PlanIssue> {
    let mut issues = Vec::new();
    for (idx, step) in steps.iter().enumerate() {
        let position = idx + 1;
        if let Err(error) = step.validate_payload() {
            issues.push(PlanIssue {
                step: position,
                candidate: None,
                error,
            });
        }
        if !step.action.needs_target() {
            continue;
        }
        if step.alt_locators.len() > max_alternates {
            issues.push(PlanIssue {
                step: position,
                candidate: None,
                error: ValidationError::TooManyAlternates {
                    count: step.alt_locators.len(),
                    max: max_alternates,
                },
            });
        }
        for (candidate_idx, candidate) in step.candidates().iter().enumerate() {
            if let Err(error) = candidate.validate() {
                issues.push(PlanIssue {
                    step: position,
                    candidate: Some(candidate_idx),
                    error,
                });
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{CandidateDescriptor, LocatorStrategy};
    use crate::step::{ActionKind, WaitKind, WaitSpec};

    const PLAN: &str = r#"[
      {
        "intent": "Open homepage",
        "action": "navigate",
        "input": "https://example.test",
        "locator": {"strategy": "css", "role": null, "name": null, "value": "html", "frame": null, "index": 0},
        "altLocators": [],
        "wait": {"type": "load", "timeoutMs": 15000},
        "reason": "Entry point",
        "confidence": 0.99,
        "expectedText": null,
        "pattern": null,
        "domReference": 0,
        "screenReference": 0
      },
      {
        "intent": "Click login",
        "action": "click",
        "input": null,
        "locator": {"strategy": "id", "value": "login-btn"},
        "altLocators": [{"strategy": "text", "value": "Log In"}],
        "wait": {"type": "domReady", "timeoutMs": 10000},
        "confidence": 0.9,
        "domReference": 1,
        "screenReference": 1
      }
    ]"#;

    #[test]
    fn parses_plan_with_nulls_and_defaults() {
        let steps = steps_from_json_str(PLAN).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, ActionKind::Navigate);
        assert_eq!(steps[0].wait, WaitSpec::new(WaitKind::Load, 15_000));
        assert_eq!(steps[1].alt_locators.len(), 1);
        assert_eq!(steps[1].expected_text, None);
        assert_eq!(steps[1].reason, "");
    }

    #[test]
    fn plan_round_trips() {
        let steps = steps_from_json_str(PLAN).unwrap();
        let encoded = steps_to_json(&steps).unwrap();
        let decoded = steps_from_json_str(&encoded).unwrap();
        assert_eq!(steps, decoded);

        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert!(value[1].get("input").is_none());
        assert!(value[1]["expectedText"].is_null());
        assert!(value[1]["pattern"].is_null());
    }

    #[test]
    fn rejects_non_list_and_missing_fields() {
        assert!(matches!(
            steps_from_json_str(r#"{"intent": "x"}"#),
            Err(PlanError::NotAList)
        ));

        let err = steps_from_json_str(r#"[{"intent": "x", "action": "click"}]"#).unwrap_err();
        assert!(matches!(err, PlanError::InvalidStep { index: 1, .. }));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn validate_plan_reports_every_issue() {
        let mut bad_primary = CandidateDescriptor::value(LocatorStrategy::Id, "x");
        bad_primary.value = None;
        let steps = vec![
            Step::navigate("not a url"),
            Step::new("type", ActionKind::Fill, bad_primary).with_alternates(vec![
                CandidateDescriptor::value(LocatorStrategy::Css, "#a"),
                CandidateDescriptor::value(LocatorStrategy::Css, "#b"),
            ]),
        ];

        let issues = validate_plan(&steps, 1);
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].step, 1);
        assert!(matches!(issues[1].error, ValidationError::MissingPayload { .. }));
        assert!(matches!(issues[2].error, ValidationError::TooManyAlternates { count: 2, max: 1 }));
        assert_eq!(issues[3].candidate, Some(0));
    }
}
