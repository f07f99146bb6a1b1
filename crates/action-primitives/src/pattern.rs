//! Text patterns for `assert_match`

use std::fmt;

use regex::{Regex, RegexBuilder};
use stepwright_core_types::split_pattern_literal;

use crate::errors::ActionError;

/// Compiled assertion pattern.
///
/// Accepts the slash-delimited literals `/core/` and `/core/i`; any other
/// input is a bare pattern. Matching has search semantics.
#[derive(Debug, Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
}

impl TextPattern {
    pub fn parse(raw: &str) -> Result<Self, ActionError> {
        let literal = split_pattern_literal(raw);
        let regex = RegexBuilder::new(literal.core)
            .case_insensitive(literal.case_insensitive)
            .build()
            .map_err(|err| ActionError::InvalidPattern(format!("{}: {}", raw, err)))?;
        Ok(Self {
            source: raw.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Collapse runs of whitespace and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_literal_with_case_flag() {
        let pattern = TextPattern::parse(r"/welcome,\s+\w+/i").unwrap();
        assert!(pattern.is_match("Hello! WELCOME,   Asha"));
        assert!(!pattern.is_match("Goodbye"));
    }

    #[test]
    fn test_flags_are_case_sensitive_by_default() {
        let pattern = TextPattern::parse("/Welcome/").unwrap();
        assert!(!pattern.is_match("welcome"));
        assert!(pattern.is_match("Welcome back"));
    }

    #[test]
    fn test_bare_pattern_searches() {
        let pattern = TextPattern::parse(r"order #\d+").unwrap();
        assert!(pattern.is_match("Your order #1234 shipped"));
    }

    #[test]
    fn test_path_like_patterns_are_bare() {
        let pattern = TextPattern::parse("/orders/123").unwrap();
        assert!(pattern.is_match("see /orders/123 now"));
        assert!(!pattern.is_match("orders"));

        let pattern = TextPattern::parse("/a/b").unwrap();
        assert!(pattern.is_match("x/a/by"));
    }

    #[test]
    fn test_invalid_patterns_are_reported() {
        assert!(matches!(
            TextPattern::parse("/(/"),
            Err(ActionError::InvalidPattern(_))
        ));
        assert!(matches!(
            TextPattern::parse("order ("),
            Err(ActionError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Log\n   In  "), "Log In");
    }
}
