//! The parser abstraction and its result algebra.
//!
//! A [`Parser<T>`] is an immutable, shareable function from an [`Input`] view
//! to a [`ParseResult<T>`]. Running it has no effect other than its return
//! value, so the same parser may be run any number of times, from any number
//! of threads.
//!
//! Everything else in the crate is built from [`ret`], [`fail`] and
//! [`Parser::bind`] plus a handful of character primitives.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use crate::errors::{Failure, FailureKind};
use crate::input::Input;

/// A successful parse: the produced value and the input left after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub value: T,
    pub remaining: Input,
}

impl<T> Success<T> {
    pub fn new(value: T, remaining: Input) -> Self {
        Self { value, remaining }
    }

    /// Transform the value, keeping the remainder.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Success<U> {
        Success {
            value: f(self.value),
            remaining: self.remaining,
        }
    }
}

/// Either a [`Success`] or a [`Failure`]; never both, never a panic.
pub type ParseResult<T> = Result<Success<T>, Failure>;

type ParseFn<T> = Arc<dyn Fn(&Input) -> ParseResult<T> + Send + Sync>;

/// A parser producing values of type `T`.
pub struct Parser<T> {
    run: ParseFn<T>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> Parser<T> {
    /// Run this parser on a view of the input.
    pub fn run(&self, input: &Input) -> ParseResult<T> {
        (self.run)(input)
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser { .. }")
    }
}

// ============================================================================
// DRIVER - The single entry point callers need
// ============================================================================

/// Run `parser` against `input`.
pub fn parse<T>(input: impl Into<Input>, parser: &Parser<T>) -> ParseResult<T> {
    parser.run(&input.into())
}

// ============================================================================
// MONADIC CORE - return, fail, bind
// ============================================================================

/// Always succeeds with `value`, consuming nothing.
pub fn ret<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new(move |input| Ok(Success::new(value.clone(), input.clone())))
}

/// Always fails with `reason`, consuming nothing.
pub fn fail<T: 'static>(reason: impl Into<String>) -> Parser<T> {
    let reason = reason.into();
    Parser::new(move |input| Err(Failure::message(reason.clone(), input.offset())))
}

/// The parser that always fails with a generic reason.
pub fn pzero<T: 'static>() -> Parser<T> {
    fail("no parse")
}

/// Run `parser`, then the parser `f` builds from its value.
pub fn bind<T, U, F>(parser: Parser<T>, f: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> Parser<U> + Send + Sync + 'static,
{
    parser.bind(f)
}

/// Defer building a parser until it runs. This is how recursive grammars
/// refer to themselves.
pub fn lazy<T, F>(build: F) -> Parser<T>
where
    T: 'static,
    F: Fn() -> Parser<T> + Send + Sync + 'static,
{
    Parser::new(move |input| build().run(input))
}

impl<T: 'static> Parser<T> {
    /// Wrap a parsing function.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&Input) -> ParseResult<T> + Send + Sync + 'static,
    {
        Parser { run: Arc::new(run) }
    }

    /// Monadic bind: feed this parser's value to `f` and continue with the
    /// parser it returns. Failure short-circuits without calling `f`.
    pub fn bind<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> Parser<U> + Send + Sync + 'static,
    {
        Parser::new(move |input| {
            let Success { value, remaining } = self.run(input)?;
            f(value).run(&remaining)
        })
    }

    /// Transform the produced value.
    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::new(move |input| self.run(input).map(|success| success.map(&f)))
    }

    /// Sequence: run self, then `next`, keeping `next`'s value.
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        Parser::new(move |input| {
            let first = self.run(input)?;
            next.run(&first.remaining)
        })
    }

    /// Sequence: run self, then `next`, keeping self's value.
    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        Parser::new(move |input| {
            let first = self.run(input)?;
            let second = next.run(&first.remaining)?;
            Ok(Success::new(first.value, second.remaining))
        })
    }

    /// Sequence: run self, then `next`, keeping both values.
    pub fn and<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        Parser::new(move |input| {
            let first = self.run(input)?;
            let second = next.run(&first.remaining)?;
            Ok(Success::new((first.value, second.value), second.remaining))
        })
    }

    /// Ordered choice between two parsers; see [`crate::combinators::choice`].
    pub fn or(self, other: Parser<T>) -> Parser<T> {
        crate::combinators::choice(vec![self, other])
    }

    /// Replace the reason of a failure that happened before any progress
    /// with "expected `name`". Failures deeper into the input are kept, since
    /// they say more than the label does.
    pub fn label(self, name: impl Into<String>) -> Parser<T> {
        let name = name.into();
        Parser::new(move |input| {
            self.run(input).map_err(|failure| {
                if failure.offset != input.offset() {
                    return failure;
                }
                let kind = match input.head() {
                    Some(found) => FailureKind::Expected {
                        expected: name.clone(),
                        found,
                    },
                    None => FailureKind::UnexpectedEnd {
                        expected: name.clone(),
                    },
                };
                Failure::new(kind, input.offset())
            })
        })
    }

    /// Rewrite failures. The function sees the failure and the input this
    /// parser started from.
    pub fn map_failure<F>(self, f: F) -> Parser<T>
    where
        F: Fn(Failure, &Input) -> Failure + Send + Sync + 'static,
    {
        Parser::new(move |input| self.run(input).map_err(|failure| f(failure, input)))
    }

    /// Throw the value away.
    pub fn discard(self) -> Parser<()> {
        self.map(|_| ())
    }
}

/// `a | b` is `a.or(b)`.
impl<T: 'static> BitOr for Parser<T> {
    type Output = Parser<T>;

    fn bitor(self, rhs: Parser<T>) -> Self::Output {
        self.or(rhs)
    }
}
