//! Slash-delimited pattern literals, shared by assertions and exports

/// How a raw pattern string reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternLiteral<'a> {
    /// Pattern text without delimiters
    pub core: &'a str,
    pub case_insensitive: bool,
    /// True for the `/core/` and `/core/i` forms
    pub delimited: bool,
}

/// Only `/core/` and `/core/i` are literals. Anything else, including
/// `/orders/123`, is a bare pattern searched as written.
pub fn split_pattern_literal(raw: &str) -> PatternLiteral<'_> {
    let literal = |core, case_insensitive| PatternLiteral {
        core,
        case_insensitive,
        delimited: true,
    };
    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(core) = rest.strip_suffix("/i") {
            return literal(core, true);
        }
        if let Some(core) = rest.strip_suffix('/') {
            return literal(core, false);
        }
    }
    PatternLiteral {
        core: raw,
        case_insensitive: false,
        delimited: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_forms() {
        let lit = split_pattern_literal(r"/welcome,\s+\w+/i");
        assert_eq!(lit.core, r"welcome,\s+\w+");
        assert!(lit.case_insensitive && lit.delimited);

        let lit = split_pattern_literal("/a/b/");
        assert_eq!(lit.core, "a/b");
        assert!(!lit.case_insensitive && lit.delimited);
    }

    #[test]
    fn paths_and_unknown_suffixes_stay_bare() {
        for raw in ["/orders/123", "/a/b", "/x/g", "/dangling", "/", "/i", "plain"] {
            let lit = split_pattern_literal(raw);
            assert_eq!(lit.core, raw, "{raw}");
            assert!(!lit.delimited && !lit.case_insensitive, "{raw}");
        }
    }
}
