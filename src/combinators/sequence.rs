//! Sequencing.

use crate::errors::Failure;
use crate::parser::{Parser, Success};

/// Run each parser on the remainder of the previous one and return the last
/// value. The first failure fails the whole sequence. An empty list has no
/// last value and always fails.
///
/// For parsers of different value types, use [`Parser::then`] or
/// [`do_seq!`](crate::do_seq).
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |input| {
        let mut current = input.clone();
        let mut last = None;
        for parser in &parsers {
            let Success { value, remaining } = parser.run(&current)?;
            last = Some(value);
            current = remaining;
        }
        match last {
            Some(value) => Ok(Success::new(value, current)),
            None => Err(Failure::message("empty sequence", input.offset())),
        }
    })
}

/// `parser` surrounded by `open` and `close`.
pub fn between<O, C, T>(open: Parser<O>, close: Parser<C>, parser: Parser<T>) -> Parser<T>
where
    O: 'static,
    C: 'static,
    T: 'static,
{
    open.then(parser).skip(close)
}

/// Sequence parsers of any value types, keeping the last value.
///
/// `do_seq!(a, b, c)` is `a.then(b.then(c))`.
#[macro_export]
macro_rules! do_seq {
    ($last:expr $(,)?) => {
        $last
    };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::parser::Parser::then($first, $crate::do_seq!($($rest),+))
    };
}
