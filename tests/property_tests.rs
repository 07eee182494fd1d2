//! Property-based tests for the combinator engine
//!
//! These check laws that should hold for any input rather than for a few
//! hand-picked strings:
//! - whole-input and prefix parsing agree
//! - failure diagnostics merge the same way in either order
//! - repetition and separated lists recover exactly what was written

use std::collections::BTreeSet;

use parcomb::parser::{Diagnostics, decimal_digit, line_info_at, literal, one_of_literals};
use proptest::prelude::*;

/// Diagnostics drawn from a small range so ties are common
fn diagnostics_strategy() -> impl Strategy<Value = Diagnostics> {
    (
        prop::option::of(0usize..3),
        prop::collection::btree_set("[a-c]", 0..3),
    )
        .prop_map(|(furthest, expected)| Diagnostics { furthest, expected })
}

proptest! {
    #[test]
    fn parse_agrees_with_partial_parse(input in "[abc]{0,12}") {
        let words = one_of_literals(["a", "ab", "b"]).many().concat();
        match words.parse(&input) {
            Ok(value) => {
                prop_assert_eq!(words.parse_partial(&input).unwrap(), (value, ""));
            }
            Err(_) => {
                let (_, rest) = words.parse_partial(&input).unwrap();
                prop_assert!(!rest.is_empty());
            }
        }
    }

    #[test]
    fn merge_is_order_independent(a in diagnostics_strategy(), b in diagnostics_strategy()) {
        let forward = a.clone().merge(Some(&b));
        let backward = b.clone().merge(Some(&a));
        prop_assert_eq!(&forward, &backward);

        if a.furthest == b.furthest {
            let union = a.expected.union(&b.expected).cloned().collect::<BTreeSet<_>>();
            prop_assert_eq!(forward.expected, union);
        }
    }

    #[test]
    fn merge_with_self_is_identity(a in diagnostics_strategy()) {
        prop_assert_eq!(a.clone().merge(Some(&a)), a);
    }

    #[test]
    fn many_takes_every_repetition(n in 0usize..20) {
        let input = format!("{}x", "ab".repeat(n));
        let (items, rest) = literal("ab").many().parse_partial(&input).unwrap();
        prop_assert_eq!(items.len(), n);
        prop_assert_eq!(rest, "x");
    }

    #[test]
    fn sep_by_recovers_written_items(digits in prop::collection::vec(0u32..10, 2..=4)) {
        let input = digits
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let list = decimal_digit()
            .map(|c| c.to_digit(10).unwrap_or(0))
            .sep_by(literal(","), 2, Some(4));
        prop_assert_eq!(list.parse(&input).unwrap(), digits);
    }

    #[test]
    fn line_counts_newlines_before_offset(input in "[a\n]{0,20}", cut in 0usize..=20) {
        let index = cut.min(input.len());
        let position = line_info_at(&input, index).unwrap();
        prop_assert_eq!(position.line, input[..index].matches('\n').count());
    }
}
