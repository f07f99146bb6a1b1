//! Candidate descriptors: one proposed way to find an element

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Lookup kinds a candidate descriptor may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorStrategy {
    /// Any attribute whose name or value carries a test hook
    TestHook,
    Id,
    Name,
    Class,
    /// ARIA role plus optional accessible name
    Role,
    Label,
    DataTestId,
    Aria,
    Text,
    Placeholder,
    Css,
    Xpath,
    /// Partial text match, used when nothing more specific exists
    Relative,
}

/// Which descriptor fields a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// `role` required, `name` optional
    RoleName,
    /// `name` is the attribute name, `value` the attribute value
    AttributeValue,
    /// only `value`
    ValueOnly,
}

impl LocatorStrategy {
    pub const ALL: [LocatorStrategy; 13] = [
        LocatorStrategy::TestHook,
        LocatorStrategy::Id,
        LocatorStrategy::Name,
        LocatorStrategy::Class,
        LocatorStrategy::Role,
        LocatorStrategy::Label,
        LocatorStrategy::DataTestId,
        LocatorStrategy::Aria,
        LocatorStrategy::Text,
        LocatorStrategy::Placeholder,
        LocatorStrategy::Css,
        LocatorStrategy::Xpath,
        LocatorStrategy::Relative,
    ];

    /// Wire name of the strategy
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::TestHook => "testHook",
            LocatorStrategy::Id => "id",
            LocatorStrategy::Name => "name",
            LocatorStrategy::Class => "class",
            LocatorStrategy::Role => "role",
            LocatorStrategy::Label => "label",
            LocatorStrategy::DataTestId => "dataTestId",
            LocatorStrategy::Aria => "aria",
            LocatorStrategy::Text => "text",
            LocatorStrategy::Placeholder => "placeholder",
            LocatorStrategy::Css => "css",
            LocatorStrategy::Xpath => "xpath",
            LocatorStrategy::Relative => "relative",
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            LocatorStrategy::Role => FieldGroup::RoleName,
            LocatorStrategy::TestHook => FieldGroup::AttributeValue,
            _ => FieldGroup::ValueOnly,
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable description of one way to find an element.
///
/// Exactly one field group is populated, matching [`LocatorStrategy::group`];
/// [`CandidateDescriptor::validate`] enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDescriptor {
    pub strategy: LocatorStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Accessible name for `role`, attribute name for `testHook`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Frame hint (url, name or selector); `None` targets the main frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,

    /// Zero-based position among the matches when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl CandidateDescriptor {
    fn empty(strategy: LocatorStrategy) -> Self {
        Self {
            strategy,
            role: None,
            name: None,
            value: None,
            frame: None,
            index: None,
        }
    }

    /// Role strategy with an optional accessible name
    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            role: Some(role.into()),
            name: name.map(str::to_string),
            ..Self::empty(LocatorStrategy::Role)
        }
    }

    /// Test-hook strategy matching `attribute=value`
    pub fn test_hook(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(attribute.into()),
            value: Some(value.into()),
            ..Self::empty(LocatorStrategy::TestHook)
        }
    }

    /// Any value-only strategy
    pub fn value(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::empty(strategy)
        }
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frame = Some(frame.into());
        self
    }

    /// Check the field-group invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let strategy = self.strategy;
        let missing = |field| ValidationError::MissingField { strategy, field };
        let mixed = |field| ValidationError::MixedFields { strategy, field };

        match strategy.group() {
            FieldGroup::RoleName => {
                if !present(&self.role) {
                    return Err(missing("role"));
                }
                if present(&self.value) {
                    return Err(mixed("value"));
                }
            }
            FieldGroup::AttributeValue => {
                if !present(&self.name) {
                    return Err(missing("name"));
                }
                if !present(&self.value) {
                    return Err(missing("value"));
                }
                if present(&self.role) {
                    return Err(mixed("role"));
                }
            }
            FieldGroup::ValueOnly => {
                if !present(&self.value) {
                    return Err(missing("value"));
                }
                if present(&self.role) {
                    return Err(mixed("role"));
                }
                if present(&self.name) {
                    return Err(mixed("name"));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn role_str(&self) -> &str {
        self.role.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for CandidateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy.group() {
            FieldGroup::RoleName => match &self.name {
                Some(name) => write!(f, "role:{}[name='{}']", self.role_str(), name)?,
                None => write!(f, "role:{}", self.role_str())?,
            },
            FieldGroup::AttributeValue => {
                write!(f, "testHook:[{}='{}']", self.name_str(), self.value_str())?
            }
            FieldGroup::ValueOnly => write!(f, "{}:'{}'", self.strategy, self.value_str())?,
        }
        if let Some(index) = self.index {
            write!(f, "#{}", index)?;
        }
        if let Some(frame) = &self.frame {
            write!(f, "@{}", frame)?;
        }
        Ok(())
    }
}

fn present(field: &Option<String>) -> bool {
    field
        .as_deref()
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_wire_names_match_serde() {
        for strategy in LocatorStrategy::ALL {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.name()));
        }
    }

    #[test]
    fn role_requires_role_and_rejects_value() {
        assert!(CandidateDescriptor::role("button", Some("Submit")).is_valid());
        assert!(CandidateDescriptor::role("button", None).is_valid());

        let mut mixed = CandidateDescriptor::role("button", Some("Submit"));
        mixed.value = Some("submit".into());
        assert_eq!(
            mixed.validate(),
            Err(ValidationError::MixedFields {
                strategy: LocatorStrategy::Role,
                field: "value"
            })
        );

        let blank = CandidateDescriptor::role("  ", None);
        assert!(matches!(
            blank.validate(),
            Err(ValidationError::MissingField { field: "role", .. })
        ));
    }

    #[test]
    fn test_hook_needs_attribute_and_value() {
        assert!(CandidateDescriptor::test_hook("data-test", "login").is_valid());

        let mut no_value = CandidateDescriptor::test_hook("data-test", "login");
        no_value.value = None;
        assert!(matches!(
            no_value.validate(),
            Err(ValidationError::MissingField { field: "value", .. })
        ));
    }

    #[test]
    fn value_only_rejects_name() {
        let mut candidate = CandidateDescriptor::value(LocatorStrategy::Id, "login-btn");
        assert!(candidate.is_valid());

        candidate.name = Some("login-btn".into());
        assert!(matches!(
            candidate.validate(),
            Err(ValidationError::MixedFields { field: "name", .. })
        ));
    }

    #[test]
    fn absent_optionals_are_omitted_on_the_wire() {
        let candidate = CandidateDescriptor::value(LocatorStrategy::Text, "Log In");
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json, serde_json::json!({"strategy": "text", "value": "Log In"}));
    }

    #[test]
    fn null_fields_deserialize_as_absent() {
        let raw = r#"{"strategy":"role","role":"link","name":"Careers","value":null,"frame":null,"index":1}"#;
        let candidate: CandidateDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(candidate.value, None);
        assert_eq!(candidate.index, Some(1));
        assert!(candidate.is_valid());
        assert_eq!(candidate.to_string(), "role:link[name='Careers']#1");
    }
}
