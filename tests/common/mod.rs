//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::fmt::Debug;

use parsnip::combinators::{digit, many1};
use parsnip::{parse, Failure, Parser};

/// Run `parser` over `source`, panicking on failure. Returns the value and
/// the text left over.
pub fn parse_ok<T: Debug>(source: &str, parser: &Parser<T>) -> (T, String) {
    match parse(source, parser) {
        Ok(success) => (success.value, success.remaining.as_str().to_string()),
        Err(failure) => panic!("expected {source:?} to parse, got {failure}"),
    }
}

/// Run `parser` over `source`, panicking on success.
pub fn parse_err<T: Debug>(source: &str, parser: &Parser<T>) -> Failure {
    match parse(source, parser) {
        Ok(success) => panic!("expected {source:?} to fail, got {success:?}"),
        Err(failure) => failure,
    }
}

/// Decimal digits converted to an integer.
pub fn int() -> Parser<i64> {
    many1(digit()).map(|digits| {
        digits
            .into_iter()
            .fold(0i64, |n, d| n * 10 + i64::from(d.to_digit(10).unwrap_or(0)))
    })
}
