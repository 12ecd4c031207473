//! The standard combinator library.
//!
//! Every constructor here returns a fresh [`Parser`](crate::parser::Parser).
//! None of them ever hands back a partially consumed input on failure: a
//! failure carries no remainder at all, so whoever runs the next alternative
//! runs it on the input view it already holds.

mod choice;
mod primitive;
mod repeat;
mod sequence;

pub use choice::{choice, look_ahead, not_followed_by, option, optional};
pub use primitive::{
    any_char, capture, char, digit, eof, letter, none_of, one_of, satisfy, string,
};
pub use repeat::{
    chainl1, count, end_by, many, many1, many_till, sep_by, sep_by1, skip_many, skip_many1,
};
pub use sequence::{between, sequence};
