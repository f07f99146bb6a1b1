//! Codegen-shaped projection of executed steps.
//!
//! Each step becomes one object whose locators read as `method + args`
//! calls (`getByRole`, `getByText`, `locator`, ...) so a downstream
//! generator can emit test source without re-deriving strategy semantics.

use serde::Serialize;
use serde_json::{json, Value};
use stepwright_core_types::{
    split_pattern_literal, ActionKind, CandidateDescriptor, LocatorStrategy, Step, WaitSpec,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatorCall {
    pub method: &'static str,
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl LocatorCall {
    fn new(method: &'static str, args: Vec<Value>) -> Self {
        Self {
            method,
            args,
            nth: None,
            frame: None,
        }
    }

    fn css(selector: String) -> Self {
        Self::new("locator", vec![Value::String(selector)])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expectation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenLine {
    /// 1-based position in the plan
    pub step: usize,
    pub intent: String,
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
    pub locator: Option<LocatorCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_locators: Option<Vec<LocatorCall>>,
    /// Absent for navigate, `null` when the action takes no text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect: Option<Expectation>,
    pub wait: WaitSpec,
    pub dom_reference: u32,
    pub screen_reference: u32,
}

pub fn project_plan(steps: &[Step]) -> Vec<CodegenLine> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| project_step(i + 1, step))
        .collect()
}

pub fn project_step(position: usize, step: &Step) -> CodegenLine {
    let mut line = CodegenLine {
        step: position,
        intent: step.intent.clone(),
        action: step.action,
        method: None,
        args: None,
        locator: None,
        alt_locators: None,
        input: None,
        expect: None,
        wait: step.wait,
        dom_reference: step.dom_reference,
        screen_reference: step.screen_reference,
    };

    if step.action == ActionKind::Navigate {
        line.method = Some("goto");
        line.args = Some(vec![json!(step.input.clone().unwrap_or_default())]);
        return line;
    }

    if step.action.needs_target() {
        line.locator = Some(locator_call(&step.locator));
        line.alt_locators = Some(step.alt_locators.iter().map(locator_call).collect());
    }
    line.input = Some(match step.action {
        ActionKind::Fill
        | ActionKind::PressSequentially
        | ActionKind::Press
        | ActionKind::Select => step.input.clone(),
        _ => None,
    });
    line.expect = expectation(step);
    line
}

pub fn locator_call(candidate: &CandidateDescriptor) -> LocatorCall {
    let value = candidate.value_str().to_string();
    let mut call = match candidate.strategy {
        LocatorStrategy::Role => {
            let options = match candidate.name.as_deref() {
                Some(name) => json!({ "name": name }),
                None => json!({}),
            };
            LocatorCall::new("getByRole", vec![json!(candidate.role_str()), options])
        }
        LocatorStrategy::TestHook => LocatorCall::css(attr_selector(candidate.name_str(), &value)),
        LocatorStrategy::Id if is_css_ident(&value) => LocatorCall::css(format!("#{}", value)),
        LocatorStrategy::Id => LocatorCall::css(attr_selector("id", &value)),
        LocatorStrategy::Name => LocatorCall::css(attr_selector("name", &value)),
        LocatorStrategy::Class if is_css_ident(&value) => LocatorCall::css(format!(".{}", value)),
        LocatorStrategy::Class => LocatorCall::css(attr_selector_op("class", "~=", &value)),
        LocatorStrategy::Label => LocatorCall::new("getByLabel", vec![json!(value)]),
        LocatorStrategy::DataTestId => LocatorCall::new("getByTestId", vec![json!(value)]),
        LocatorStrategy::Aria => LocatorCall::css(attr_selector("aria-label", &value)),
        LocatorStrategy::Text => {
            LocatorCall::new("getByText", vec![json!(value), json!({ "exact": true })])
        }
        LocatorStrategy::Placeholder => LocatorCall::new("getByPlaceholder", vec![json!(value)]),
        LocatorStrategy::Css => LocatorCall::css(value),
        LocatorStrategy::Xpath => {
            if value.starts_with("xpath=") {
                LocatorCall::css(value)
            } else {
                LocatorCall::css(format!("xpath={}", value))
            }
        }
        LocatorStrategy::Relative => {
            LocatorCall::new("getByText", vec![json!(value), json!({ "exact": false })])
        }
    };
    call.nth = candidate.index;
    call.frame = candidate.frame.clone();
    call
}

/// `[attr='value']` with backslashes and single quotes escaped
fn attr_selector(attr: &str, value: &str) -> String {
    attr_selector_op(attr, "=", value)
}

fn attr_selector_op(attr: &str, op: &str, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("[{}{}'{}']", attr, op, escaped)
}

/// Safe to emit after `#` or `.` without escaping
fn is_css_ident(value: &str) -> bool {
    let body = value.strip_prefix('-').unwrap_or(value);
    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn expectation(step: &Step) -> Option<Expectation> {
    let expect = |kind, value| Some(Expectation { kind, value });
    match step.action {
        ActionKind::AssertVisible => expect("toBeVisible", None),
        ActionKind::AssertText => expect(
            "toHaveText",
            Some(json!({ "text": step.expected_text.clone().unwrap_or_default() })),
        ),
        ActionKind::AssertMatch => expect(
            "toHaveText",
            Some(regex_value(step.pattern.as_deref().unwrap_or_default())),
        ),
        ActionKind::AssertTitle => {
            let title = step.input.as_deref().unwrap_or_default();
            let value = if split_pattern_literal(title).delimited {
                regex_value(title)
            } else {
                json!({ "text": title })
            };
            expect("toHaveTitle", Some(value))
        }
        _ => None,
    }
}

/// `/core/` and `/core/i` become `{regex, flags}`; anything else is a bare pattern
fn regex_value(raw: &str) -> Value {
    let literal = split_pattern_literal(raw);
    let flags = if literal.case_insensitive { "i" } else { "" };
    json!({ "regex": literal.core, "flags": flags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwright_core_types::WaitKind;

    fn login_step() -> Step {
        Step::new(
            "Click the login button",
            ActionKind::Click,
            CandidateDescriptor::role("button", Some("Log In")),
        )
        .with_alternates(vec![
            CandidateDescriptor::value(LocatorStrategy::Id, "login-btn"),
            CandidateDescriptor::value(LocatorStrategy::Text, "Log In").with_index(1),
        ])
    }

    #[test]
    fn navigate_projects_to_goto() {
        let step = Step::navigate("https://example.test/").with_wait(WaitSpec::new(WaitKind::Load, 15_000));
        let json = serde_json::to_value(project_step(1, &step)).unwrap();
        assert_eq!(json["method"], "goto");
        assert_eq!(json["args"], json!(["https://example.test/"]));
        assert!(json["locator"].is_null());
        assert!(json.get("input").is_none());
        assert!(json.get("altLocators").is_none());
        assert_eq!(json["wait"], json!({"type": "load", "timeoutMs": 15000}));
    }

    #[test]
    fn click_projects_locator_calls() {
        let json = serde_json::to_value(project_step(2, &login_step())).unwrap();
        assert_eq!(json["step"], 2);
        assert_eq!(
            json["locator"],
            json!({"method": "getByRole", "args": ["button", {"name": "Log In"}]})
        );
        assert_eq!(
            json["altLocators"],
            json!([
                {"method": "locator", "args": ["#login-btn"]},
                {"method": "getByText", "args": ["Log In", {"exact": true}], "nth": 1}
            ])
        );
        assert!(json["input"].is_null());
        assert!(json.get("expect").is_none());
    }

    #[test]
    fn fill_keeps_input() {
        let step = Step::new(
            "Type the username",
            ActionKind::Fill,
            CandidateDescriptor::value(LocatorStrategy::Placeholder, "Username"),
        )
        .with_input("alice");
        let line = project_step(1, &step);
        assert_eq!(line.input, Some(Some("alice".to_string())));
        assert_eq!(line.locator.unwrap().method, "getByPlaceholder");
    }

    #[test]
    fn strategies_map_to_calls() {
        let cases = [
            (CandidateDescriptor::test_hook("data-qa", "submit"), "locator", json!(["[data-qa='submit']"])),
            (CandidateDescriptor::value(LocatorStrategy::Name, "email"), "locator", json!(["[name='email']"])),
            (CandidateDescriptor::value(LocatorStrategy::Class, "btn"), "locator", json!([".btn"])),
            (CandidateDescriptor::value(LocatorStrategy::Label, "Email"), "getByLabel", json!(["Email"])),
            (CandidateDescriptor::value(LocatorStrategy::DataTestId, "go"), "getByTestId", json!(["go"])),
            (CandidateDescriptor::value(LocatorStrategy::Aria, "Close"), "locator", json!(["[aria-label='Close']"])),
            (CandidateDescriptor::value(LocatorStrategy::Xpath, "//a"), "locator", json!(["xpath=//a"])),
            (CandidateDescriptor::value(LocatorStrategy::Relative, "near"), "getByText", json!(["near", {"exact": false}])),
        ];
        for (candidate, method, args) in cases {
            let call = locator_call(&candidate);
            assert_eq!(call.method, method, "{}", candidate);
            assert_eq!(Value::Array(call.args), args, "{}", candidate);
        }

        let framed = locator_call(&CandidateDescriptor::role("link", None).with_frame("checkout"));
        assert_eq!(framed.args, vec![json!("link"), json!({})]);
        assert_eq!(framed.frame.as_deref(), Some("checkout"));
    }

    #[test]
    fn assertions_carry_expect_blocks() {
        let target = CandidateDescriptor::value(LocatorStrategy::Id, "banner");
        let text = Step::new("banner says hi", ActionKind::AssertText, target.clone())
            .with_expected_text("Hi there");
        assert_eq!(
            project_step(1, &text).expect,
            Some(Expectation {
                kind: "toHaveText",
                value: Some(json!({"text": "Hi there"}))
            })
        );

        let matched = Step::new("banner greets", ActionKind::AssertMatch, target.clone())
            .with_pattern("/^hi/i");
        assert_eq!(
            project_step(1, &matched).expect.unwrap().value,
            Some(json!({"regex": "^hi", "flags": "i"}))
        );

        let visible = Step::new("banner shown", ActionKind::AssertVisible, target);
        assert_eq!(project_step(1, &visible).expect.unwrap().kind, "toBeVisible");
    }

    #[test]
    fn assert_title_has_no_locator() {
        let step = Step::new(
            "title mentions careers",
            ActionKind::AssertTitle,
            CandidateDescriptor::value(LocatorStrategy::Css, "html"),
        )
        .with_input("/careers/i");
        let line = project_step(3, &step);
        assert!(line.locator.is_none());
        assert_eq!(
            line.expect,
            Some(Expectation {
                kind: "toHaveTitle",
                value: Some(json!({"regex": "careers", "flags": "i"}))
            })
        );
    }

    #[test]
    fn path_like_patterns_stay_bare() {
        let target = CandidateDescriptor::value(LocatorStrategy::Id, "crumb");
        for raw in ["/orders/123", "/a/b"] {
            let step = Step::new("crumb shows path", ActionKind::AssertMatch, target.clone())
                .with_pattern(raw);
            assert_eq!(
                project_step(1, &step).expect.unwrap().value,
                Some(json!({"regex": raw, "flags": ""}))
            );
        }
        assert_eq!(regex_value("/a/b/"), json!({"regex": "a/b", "flags": ""}));

        let title = Step::new(
            "title is a path",
            ActionKind::AssertTitle,
            CandidateDescriptor::value(LocatorStrategy::Css, "html"),
        )
        .with_input("/orders/123");
        assert_eq!(
            project_step(1, &title).expect.unwrap().value,
            Some(json!({"text": "/orders/123"}))
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let cases = [
            (CandidateDescriptor::value(LocatorStrategy::Name, "o'brien"), r"[name='o\'brien']"),
            (CandidateDescriptor::value(LocatorStrategy::Aria, r"say 'hi' \ bye"), r"[aria-label='say \'hi\' \\ bye']"),
            (CandidateDescriptor::test_hook("data-qa", "it's"), r"[data-qa='it\'s']"),
            (CandidateDescriptor::value(LocatorStrategy::Id, "form.email"), "[id='form.email']"),
            (CandidateDescriptor::value(LocatorStrategy::Id, "2fa"), "[id='2fa']"),
            (CandidateDescriptor::value(LocatorStrategy::Class, "w-1/2"), "[class~='w-1/2']"),
            (CandidateDescriptor::value(LocatorStrategy::Class, "btn-primary"), ".btn-primary"),
        ];
        for (candidate, selector) in cases {
            assert_eq!(locator_call(&candidate).args, vec![json!(selector)], "{}", candidate);
        }
    }
}
