//! Character-level consumers and capture.

use crate::errors::{Failure, FailureKind};
use crate::input::Input;
use crate::parser::{Parser, Success};

fn rejected(input: &Input, expected: &str) -> Failure {
    let kind = match input.head() {
        Some(found) => FailureKind::Expected {
            expected: expected.to_string(),
            found,
        },
        None => FailureKind::UnexpectedEnd {
            expected: expected.to_string(),
        },
    };
    Failure::new(kind, input.offset())
}

/// Consume one character accepted by `predicate`.
pub fn satisfy<F>(predicate: F, expected: impl Into<String>) -> Parser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    let expected = expected.into();
    Parser::new(move |input| match input.head() {
        Some(c) if predicate(c) => Ok(Success::new(c, input.advance(c.len_utf8()))),
        _ => Err(rejected(input, &expected)),
    })
}

/// Any single character; fails only at end of input.
pub fn any_char() -> Parser<char> {
    satisfy(|_| true, "any character")
}

/// Exactly the character `c`.
pub fn char(c: char) -> Parser<char> {
    satisfy(move |next| next == c, format!("{c:?}"))
}

/// A character that is a member of `set`.
pub fn one_of(set: impl Into<String>) -> Parser<char> {
    let set = set.into();
    let expected = format!("one of {set:?}");
    satisfy(move |c| set.contains(c), expected)
}

/// A character that is not a member of `set`.
pub fn none_of(set: impl Into<String>) -> Parser<char> {
    let set = set.into();
    let expected = format!("none of {set:?}");
    satisfy(move |c| !set.contains(c), expected)
}

pub fn digit() -> Parser<char> {
    satisfy(|c| c.is_ascii_digit(), "digit")
}

pub fn letter() -> Parser<char> {
    satisfy(char::is_alphabetic, "letter")
}

/// The literal text `literal`, all or nothing.
pub fn string(literal: impl Into<String>) -> Parser<String> {
    let literal = literal.into();
    let expected = format!("{literal:?}");
    Parser::new(move |input| {
        if input.as_str().starts_with(literal.as_str()) {
            return Ok(Success::new(literal.clone(), input.advance(literal.len())));
        }
        // Report the first character that differs.
        let matched: usize = input
            .as_str()
            .chars()
            .zip(literal.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        Err(rejected(&input.advance(matched), &expected))
    })
}

/// Succeeds with `()` only at end of input; never consumes.
pub fn eof() -> Parser<()> {
    Parser::new(|input| match input.head() {
        None => Ok(Success::new((), input.clone())),
        Some(found) => Err(Failure::new(
            FailureKind::ExpectedEnd { found },
            input.offset(),
        )),
    })
}

/// Run `parser` and return the exact text it consumed instead of its value.
pub fn capture<T: 'static>(parser: Parser<T>) -> Parser<String> {
    Parser::new(move |input| {
        let Success { remaining, .. } = parser.run(input)?;
        let text = remaining.consumed_since(input).to_string();
        Ok(Success::new(text, remaining))
    })
}
