//! Ordered choice and the other combinators that turn failures into
//! something else.

use crate::errors::{Failure, FailureKind};
use crate::parser::{Parser, Success};

/// Try each alternative against the same input; the first success wins.
///
/// Backtracking is unconditional: a branch that fails after consuming any
/// amount of input is simply discarded. When every branch fails, the result
/// is [`FailureKind::NoAlternative`] carrying each branch's failure, with
/// directly nested choices flattened into one list.
pub fn choice<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |input| {
        let mut failures = Vec::with_capacity(alternatives.len());
        for alternative in &alternatives {
            match alternative.run(input) {
                Ok(success) => return Ok(success),
                Err(Failure {
                    kind: FailureKind::NoAlternative { alternatives: nested },
                    offset,
                }) if offset == input.offset() => failures.extend(nested),
                Err(failure) => failures.push(failure),
            }
        }
        Err(Failure::new(
            FailureKind::NoAlternative {
                alternatives: failures,
            },
            input.offset(),
        ))
    })
}

/// `parser`'s value, or `default` without consuming anything if it fails.
pub fn option<T>(default: T, parser: Parser<T>) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new(move |input| {
        Ok(parser
            .run(input)
            .unwrap_or_else(|_| Success::new(default.clone(), input.clone())))
    })
}

/// `Some` of `parser`'s value, or `None` without consuming anything.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |input| match parser.run(input) {
        Ok(success) => Ok(success.map(Some)),
        Err(_) => Ok(Success::new(None, input.clone())),
    })
}

/// Run `parser` but leave the input where it was.
pub fn look_ahead<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |input| {
        let Success { value, .. } = parser.run(input)?;
        Ok(Success::new(value, input.clone()))
    })
}

/// Succeeds, consuming nothing, only when `parser` fails here.
pub fn not_followed_by<T: 'static>(parser: Parser<T>) -> Parser<()> {
    Parser::new(move |input| match parser.run(input) {
        Ok(Success { remaining, .. }) => Err(Failure::new(
            FailureKind::Unexpected {
                found: remaining.consumed_since(input).to_string(),
            },
            input.offset(),
        )),
        Err(_) => Ok(Success::new((), input.clone())),
    })
}
