//! Parsnip: Parsec-style parser combinators with a declarative lexer layer.
//!
//! Parsers are immutable values built from [`ret`], [`fail`] and
//! [`Parser::bind`] plus the combinators in [`combinators`]. The [`lexer`]
//! and [`token`] modules make any parser token-aware according to a
//! [`LanguageDefinition`]. Nothing runs until [`parse`] is called.

pub use crate::errors::{ErrorCategory, Failure, FailureKind, SourceContext, SyntaxError};
pub use crate::input::Input;
pub use crate::lexer::{lexeme, whitespace, CharCategory, CharClass, LanguageDefinition};
pub use crate::parser::{bind, fail, lazy, parse, pzero, ret, ParseResult, Parser, Success};
pub use crate::token::{Number, Token, TokenParser};

pub mod cli;
pub mod combinators;
pub mod errors;
pub mod input;
pub mod lexer;
pub mod lisp;
pub mod parser;
pub mod token;
