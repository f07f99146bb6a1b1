//! Per-strategy confidence weights

use stepwright_core_types::LocatorStrategy;

/// How many matches are inspected for visibility per candidate
pub const VISIBILITY_SAMPLE: usize = 10;

/// Static confidence attached to a candidate once it is accepted.
///
/// Test hooks and dedicated test ids are the most stable; positional and
/// class-based lookups the least.
pub fn base_confidence(strategy: LocatorStrategy) -> f64 {
    match strategy {
        LocatorStrategy::TestHook => 1.0,
        LocatorStrategy::DataTestId => 0.95,
        LocatorStrategy::Name => 0.95,
        LocatorStrategy::Id => 0.9,
        LocatorStrategy::Role => 0.8,
        LocatorStrategy::Label => 0.75,
        LocatorStrategy::Text => 0.7,
        LocatorStrategy::Aria => 0.65,
        LocatorStrategy::Placeholder => 0.6,
        LocatorStrategy::Css => 0.5,
        LocatorStrategy::Xpath => 0.45,
        LocatorStrategy::Relative => 0.4,
        LocatorStrategy::Class => 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_stay_in_unit_range() {
        for strategy in LocatorStrategy::ALL {
            let weight = base_confidence(strategy);
            assert!((0.0..=1.0).contains(&weight), "{} out of range", strategy);
        }
    }

    #[test]
    fn test_structural_hooks_outrank_selectors() {
        assert!(base_confidence(LocatorStrategy::TestHook) > base_confidence(LocatorStrategy::Id));
        assert!(base_confidence(LocatorStrategy::Role) > base_confidence(LocatorStrategy::Css));
        assert!(base_confidence(LocatorStrategy::Css) > base_confidence(LocatorStrategy::Xpath));
        assert_eq!(base_confidence(LocatorStrategy::Class), 0.3);
    }
}
