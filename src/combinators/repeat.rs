//! Repetition and separation.
//!
//! All of these run as loops over the input rather than recursing once per
//! element, so long inputs do not grow the call stack. An element that
//! succeeds without consuming anything ends a repetition (it could only
//! repeat forever); `many_till` reports it as [`FailureKind::NoProgress`]
//! because it can never reach its terminator.

use crate::errors::{Failure, FailureKind};
use crate::input::Input;
use crate::parser::{Parser, Success};

/// Keep running `item` from `current`, appending to `values`, until it fails
/// or stops making progress.
fn collect_rest<T>(item: &Parser<T>, mut values: Vec<T>, mut current: Input) -> Success<Vec<T>> {
    while let Ok(Success { value, remaining }) = item.run(&current) {
        if remaining.offset() == current.offset() {
            break;
        }
        values.push(value);
        current = remaining;
    }
    Success::new(values, current)
}

/// Zero or more `item`s.
pub fn many<T: 'static>(item: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |input| Ok(collect_rest(&item, Vec::new(), input.clone())))
}

/// One or more `item`s; fails with the first attempt's failure.
pub fn many1<T: 'static>(item: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |input| {
        let first = item.run(input)?;
        Ok(collect_rest(&item, vec![first.value], first.remaining))
    })
}

/// Zero or more `item`s, discarding the values.
pub fn skip_many<T: 'static>(item: Parser<T>) -> Parser<()> {
    Parser::new(move |input| {
        let mut current = input.clone();
        while let Ok(Success { remaining, .. }) = item.run(&current) {
            if remaining.offset() == current.offset() {
                break;
            }
            current = remaining;
        }
        Ok(Success::new((), current))
    })
}

/// One or more `item`s, discarding the values.
pub fn skip_many1<T: 'static>(item: Parser<T>) -> Parser<()> {
    let rest = skip_many(item.clone());
    item.then(rest)
}

/// Exactly `n` `item`s.
pub fn count<T: 'static>(n: usize, item: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |input| {
        let mut values = Vec::with_capacity(n);
        let mut current = input.clone();
        for _ in 0..n {
            let Success { value, remaining } = item.run(&current)?;
            values.push(value);
            current = remaining;
        }
        Ok(Success::new(values, current))
    })
}

/// Runs `sep` then `item` from `current` for as long as both succeed.
fn collect_separated<T, S>(
    item: &Parser<T>,
    sep: &Parser<S>,
    mut values: Vec<T>,
    mut current: Input,
) -> Success<Vec<T>> {
    loop {
        let Ok(after_sep) = sep.run(&current) else {
            break;
        };
        let Ok(Success { value, remaining }) = item.run(&after_sep.remaining) else {
            break;
        };
        if remaining.offset() == current.offset() {
            break;
        }
        values.push(value);
        current = remaining;
    }
    Success::new(values, current)
}

/// One or more `item`s separated by `sep`. A trailing separator is left
/// unconsumed.
pub fn sep_by1<T: 'static, S: 'static>(item: Parser<T>, sep: Parser<S>) -> Parser<Vec<T>> {
    Parser::new(move |input| {
        let first = item.run(input)?;
        Ok(collect_separated(
            &item,
            &sep,
            vec![first.value],
            first.remaining,
        ))
    })
}

/// Zero or more `item`s separated by `sep`.
pub fn sep_by<T: 'static, S: 'static>(item: Parser<T>, sep: Parser<S>) -> Parser<Vec<T>> {
    Parser::new(move |input| match item.run(input) {
        Ok(first) => Ok(collect_separated(
            &item,
            &sep,
            vec![first.value],
            first.remaining,
        )),
        Err(_) => Ok(Success::new(Vec::new(), input.clone())),
    })
}

/// Zero or more `item`s, each followed by `sep`.
pub fn end_by<T: 'static, S: 'static>(item: Parser<T>, sep: Parser<S>) -> Parser<Vec<T>> {
    many(item.skip(sep))
}

/// `item`s until `end` matches. `end` is tried first on every round and its
/// match is consumed; if it does not match, `item` must.
pub fn many_till<T: 'static, E: 'static>(item: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    Parser::new(move |input| {
        let mut values = Vec::new();
        let mut current = input.clone();
        loop {
            if let Ok(done) = end.run(&current) {
                return Ok(Success::new(values, done.remaining));
            }
            let Success { value, remaining } = item.run(&current)?;
            if remaining.offset() == current.offset() {
                return Err(Failure::new(
                    FailureKind::NoProgress {
                        combinator: "many_till",
                    },
                    current.offset(),
                ));
            }
            values.push(value);
            current = remaining;
        }
    })
}

/// One or more `item`s joined by left-associative operators: `op` yields the
/// function combining the running total with the next item.
pub fn chainl1<T, F>(item: Parser<T>, op: Parser<F>) -> Parser<T>
where
    T: 'static,
    F: Fn(T, T) -> T + 'static,
{
    Parser::new(move |input| {
        let Success {
            value: mut total,
            remaining: mut current,
        } = item.run(input)?;
        loop {
            let Ok(Success {
                value: combine,
                remaining: after_op,
            }) = op.run(&current)
            else {
                break;
            };
            let Ok(Success { value, remaining }) = item.run(&after_op) else {
                break;
            };
            total = combine(total, value);
            current = remaining;
        }
        Ok(Success::new(total, current))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{any_char, char, digit, string};
    use crate::parser::{parse, ret};

    #[test]
    fn test_many_stops_on_non_consuming_item() {
        let success = parse("abc", &many(ret('x'))).unwrap();
        assert!(success.value.is_empty());
        assert_eq!(success.remaining.as_str(), "abc");
    }

    #[test]
    fn test_sep_by_leaves_trailing_separator() {
        let success = parse("1,2,", &sep_by(digit(), char(','))).unwrap();
        assert_eq!(success.value, vec!['1', '2']);
        assert_eq!(success.remaining.as_str(), ",");
    }

    #[test]
    fn test_many_till_no_progress() {
        let parser = many_till(ret('x'), char('.'));
        let failure = parse("abc", &parser).unwrap_err();
        assert_eq!(
            failure.kind,
            FailureKind::NoProgress {
                combinator: "many_till"
            }
        );
    }

    #[test]
    fn test_many_handles_long_input_iteratively() {
        let input = "a".repeat(200_000);
        let success = parse(input.as_str(), &many(any_char())).unwrap();
        assert_eq!(success.value.len(), 200_000);
    }

    #[test]
    fn test_count_and_end_by() {
        let success = parse("abc", &count(2, any_char())).unwrap();
        assert_eq!(success.value, vec!['a', 'b']);
        assert!(parse("a", &count(2, any_char())).is_err());

        let success = parse("1;2;3", &end_by(digit(), char(';'))).unwrap();
        assert_eq!(success.value, vec!['1', '2']);
        assert_eq!(success.remaining.as_str(), "3");
    }

    #[test]
    fn test_chainl1_is_left_associative() {
        let number = digit().map(|c| c.to_digit(10).unwrap_or(0) as i64);
        let minus = string("-").then(ret(|a: i64, b: i64| a - b));
        let success = parse("9-3-2", &chainl1(number, minus)).unwrap();
        assert_eq!(success.value, 4);
    }
}
