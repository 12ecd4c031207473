//! Property-based tests for the laws every parser obeys
//!
//! Whatever the input, a success leaves a suffix of it, `ret` and `fail`
//! consume nothing, and a failed `choice` branch leaves no trace.

use proptest::prelude::*;

use parsnip::combinators::{any_char, char, choice, many, many1, one_of, sep_by, string};
use parsnip::{fail, parse, ret, Failure, Parser};

/// A few parsers of different shapes, all producing text.
fn sample_parsers() -> Vec<Parser<String>> {
    vec![
        string("ab"),
        many(one_of("ab")).map(|chars| chars.into_iter().collect()),
        many1(any_char()).map(|chars| chars.into_iter().collect()),
        sep_by(char('a'), char(',')).map(|chars| chars.into_iter().collect()),
        char('a').then(string("bc")),
    ]
}

proptest! {
    #[test]
    fn success_leaves_a_suffix(source in "[abc, ]{0,24}") {
        for parser in sample_parsers() {
            if let Ok(success) = parse(source.as_str(), &parser) {
                let rest = success.remaining.as_str();
                prop_assert!(source.ends_with(rest));
                prop_assert_eq!(success.remaining.offset() + rest.len(), source.len());
            }
        }
    }

    #[test]
    fn ret_consumes_nothing(source in "\\PC{0,16}", value in any::<i64>()) {
        let success = parse(source.as_str(), &ret(value)).unwrap();
        prop_assert_eq!(success.value, value);
        prop_assert_eq!(success.remaining.as_str(), source.as_str());
    }

    #[test]
    fn fail_keeps_reason_and_position(source in "\\PC{0,16}", reason in "[a-z ]{1,12}") {
        let failure = parse(source.as_str(), &fail::<()>(reason.clone())).unwrap_err();
        prop_assert_eq!(failure, Failure::message(reason, 0));
    }

    #[test]
    fn failed_branch_does_not_leak(source in "[abc]{0,12}") {
        // The first branch consumes before it fails on most inputs.
        let first = char('a').then(char('a')).then(string("zz"));
        for second in sample_parsers() {
            let direct = parse(source.as_str(), &second);
            let chosen = parse(source.as_str(), &choice(vec![first.clone(), second.clone()]));
            match (direct, chosen) {
                (Ok(direct), Ok(chosen)) => prop_assert_eq!(direct, chosen),
                (Err(_), Err(_)) => {}
                (direct, chosen) => prop_assert!(false, "{:?} vs {:?}", direct, chosen),
            }
        }
    }

    #[test]
    fn many_of_impossible_item_is_empty(source in "[abc]{0,12}") {
        let success = parse(source.as_str(), &many(char('z'))).unwrap();
        prop_assert!(success.value.is_empty());
        prop_assert_eq!(success.remaining.as_str(), source.as_str());
    }
}
