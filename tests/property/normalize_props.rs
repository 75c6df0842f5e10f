//! Property tests for the normalizer.
//!
//! The load-bearing property is symmetry: whatever the index side produced,
//! the query side must reproduce. That reduces to terms being fixed points
//! of normalization.

use proptest::prelude::*;

use newsdex::normalize;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every emitted term is over the term alphabet: lowercase ASCII
    /// letters and digits, never empty.
    #[test]
    fn prop_terms_over_alphabet(raw in ".{0,200}") {
        for term in normalize(&raw) {
            prop_assert!(!term.is_empty());
            prop_assert!(
                term.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "term {:?} leaves the alphabet", term
            );
        }
    }

    /// Terms are fixed points: normalizing a term yields exactly itself.
    #[test]
    fn prop_terms_are_fixed_points(raw in ".{0,200}") {
        for term in normalize(&raw) {
            prop_assert_eq!(normalize(&term), vec![term.clone()]);
        }
    }

    /// Pure function: same input, same output.
    #[test]
    fn prop_deterministic(raw in ".{0,200}") {
        prop_assert_eq!(normalize(&raw), normalize(&raw));
    }

    /// Joining documents with whitespace concatenates their term sequences.
    #[test]
    fn prop_whitespace_concatenates(a in "[a-zA-Z0-9 ]{0,50}", b in "[a-zA-Z0-9 ]{0,50}") {
        let joined = format!("{} {}", a, b);
        let mut expected = normalize(&a);
        expected.extend(normalize(&b));
        prop_assert_eq!(normalize(&joined), expected);
    }

    /// Case never matters.
    #[test]
    fn prop_case_insensitive(raw in "[a-zA-Z -]{0,80}") {
        prop_assert_eq!(normalize(&raw), normalize(&raw.to_ascii_uppercase()));
    }
}
