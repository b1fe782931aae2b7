//! Property-based tests for path resolution and manifest tokenization.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::tokenize;
    use crate::path::{normalize, resolve};
    use proptest::prelude::*;
    use std::path::{Component, Path};

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalizing an absolute path never leaves `.` or `..` behind
        #[test]
        fn normalize_absolute_has_no_dot_components(
            parts in prop::collection::vec(prop_oneof![
                Just(".".to_string()),
                Just("..".to_string()),
                "[a-z]{1,6}",
            ], 0..12)
        ) {
            let raw = format!("/{}", parts.join("/"));
            let normalized = normalize(Path::new(&raw));
            prop_assert!(normalized.is_absolute());
            for component in normalized.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "normalize left {:?} in {:?} (from {})",
                    component,
                    normalized,
                    raw
                );
            }
        }

        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(
            parts in prop::collection::vec(prop_oneof![
                Just(".".to_string()),
                Just("..".to_string()),
                "[a-z]{1,6}",
            ], 0..12)
        ) {
            let raw = format!("/{}", parts.join("/"));
            let once = normalize(Path::new(&raw));
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: resolving a plain relative name stays inside the base
        #[test]
        fn resolve_plain_names_stay_under_base(
            names in prop::collection::vec("[a-z]{1,6}", 1..5)
        ) {
            let base = Path::new("/work/project");
            let resolved = resolve(base, &names.join("/"));
            prop_assert!(resolved.starts_with(base));
        }
    }

    // ============================================================================
    // tokenize property tests
    // ============================================================================

    proptest! {
        /// Property: unquoted whitespace-separated words tokenize to themselves
        #[test]
        fn tokenize_plain_words_roundtrip(
            words in prop::collection::vec("[A-Za-z0-9_./:@-]{1,12}", 0..8)
        ) {
            let line = words.join("  ");
            prop_assert_eq!(tokenize(&line).unwrap(), words);
        }

        /// Property: a double-quoted field keeps its inner whitespace as one token
        #[test]
        fn tokenize_quoted_field_is_single_token(
            inner in "[a-z]{1,5}( [a-z]{1,5}){1,3}"
        ) {
            let line = format!("name \"{}\" repo main", inner);
            let tokens = tokenize(&line).unwrap();
            prop_assert_eq!(tokens.len(), 4);
            prop_assert_eq!(&tokens[1], &inner);
        }

        /// Property: tokens never contain unquoted leading or trailing whitespace
        #[test]
        fn tokenize_never_yields_blank_tokens(line in "[ a-z\t]{0,40}") {
            for token in tokenize(&line).unwrap() {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.contains(char::is_whitespace));
            }
        }
    }
}
