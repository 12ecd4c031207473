//! The lexer layer.
//!
//! There is no separate tokenizer pass and no lexer state. A lexer is just two
//! combinators parameterized by a [`LanguageDefinition`]: [`whitespace`],
//! which skips everything the language considers insignificant, and
//! [`lexeme`], which makes any parser swallow the insignificant input that
//! follows it.

use std::sync::Arc;

use crate::errors::{Failure, FailureKind};
use crate::input::Input;
use crate::parser::{Parser, Success};

pub mod language;

pub use language::{CharCategory, CharClass, LanguageDefinition};

/// Skip whitespace, line comments and block comments, in any order, until
/// none applies. Never fails on clean input; an unterminated block comment
/// is a failure.
pub fn whitespace(def: &Arc<LanguageDefinition>) -> Parser<()> {
    let def = Arc::clone(def);
    Parser::new(move |input| {
        let mut current = input.clone();
        while let Some(after) = skip_one(&def, &current)? {
            current = after;
        }
        Ok(Success::new((), current))
    })
}

/// Run `parser`, then skip trailing whitespace and comments.
pub fn lexeme<T: 'static>(def: &Arc<LanguageDefinition>, parser: Parser<T>) -> Parser<T> {
    parser.skip(whitespace(def))
}

/// Skip one run of whitespace or one comment. `None` when nothing applies.
fn skip_one(def: &LanguageDefinition, input: &Input) -> Result<Option<Input>, Failure> {
    let text = input.as_str();

    let spaces: usize = text
        .chars()
        .take_while(|c| def.is_whitespace(*c))
        .map(char::len_utf8)
        .sum();
    if spaces > 0 {
        return Ok(Some(input.advance(spaces)));
    }

    // Block comments first: a line marker may be a prefix of the block start.
    if !def.comment_start.is_empty() && text.starts_with(def.comment_start.as_str()) {
        return skip_block_comment(def, input).map(Some);
    }

    if !def.comment_line.is_empty() && text.starts_with(def.comment_line.as_str()) {
        let end = text.find('\n').map_or(text.len(), |newline| newline + 1);
        return Ok(Some(input.advance(end)));
    }

    Ok(None)
}

/// Skip a block comment starting at `input`, honoring nesting if the
/// language allows it.
fn skip_block_comment(def: &LanguageDefinition, input: &Input) -> Result<Input, Failure> {
    let start = def.comment_start.as_str();
    let end = def.comment_end.as_str();
    let mut depth = 1usize;
    let mut current = input.advance(start.len());

    loop {
        let text = current.as_str();
        if text.starts_with(end) {
            current = current.advance(end.len());
            depth -= 1;
            if depth == 0 {
                return Ok(current);
            }
        } else if def.nested_comments && text.starts_with(start) {
            current = current.advance(start.len());
            depth += 1;
        } else if current.is_empty() {
            return Err(Failure::new(
                FailureKind::UnterminatedComment {
                    end: end.to_string(),
                },
                input.offset(),
            ));
        } else {
            current = current.rest();
        }
    }
}
