//! Token-level helpers.
//!
//! Everything here is an ordinary combinator wrapped with
//! [`lexeme`](crate::lexer::lexeme), so each helper consumes its token plus
//! any whitespace and comments after it. [`TokenParser`] bundles the helpers
//! for one language definition.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::combinators::{
    between, capture, char, choice, digit, eof, many_till, not_followed_by, one_of, optional,
    satisfy, sep_by, sep_by1, skip_many, skip_many1, string,
};
use crate::errors::{Failure, FailureKind};
use crate::input::Input;
use crate::lexer::{lexeme, whitespace, LanguageDefinition};
use crate::parser::{ret, Parser, Success};

// ============================================================================
// TOKEN VALUES
// ============================================================================

/// A numeric literal's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n:?}"),
        }
    }
}

/// One token of a language, as produced by [`TokenParser::token`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    Identifier(String),
    Reserved(String),
    Number(Number),
    String(String),
    Char(char),
    Operator(String),
    Symbol(String),
}

impl Token {
    /// The token's kind, as used in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Identifier(_) => "identifier",
            Token::Reserved(_) => "reserved",
            Token::Number(_) => "number",
            Token::String(_) => "string",
            Token::Char(_) => "char",
            Token::Operator(_) => "operator",
            Token::Symbol(_) => "symbol",
        }
    }

    /// The token's value written back as source text.
    pub fn text(&self) -> String {
        match self {
            Token::Identifier(text)
            | Token::Reserved(text)
            | Token::Operator(text)
            | Token::Symbol(text) => text.clone(),
            Token::Number(n) => n.to_string(),
            Token::String(s) => format!("{s:?}"),
            Token::Char(c) => format!("{c:?}"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.text())
    }
}

// ============================================================================
// IDENTIFIERS & RESERVED WORDS
// ============================================================================

/// Identifier-shaped text, reserved or not, without trailing whitespace.
pub(crate) fn word(def: &Arc<LanguageDefinition>) -> Parser<String> {
    let start = Arc::clone(def);
    let letter = Arc::clone(def);
    capture(
        satisfy(move |c| start.identifier_start.contains(c), "identifier")
            .then(skip_many(satisfy(
                move |c| letter.identifier_letter.contains(c),
                "identifier character",
            ))),
    )
}

/// An identifier that is not a reserved word.
pub fn identifier(def: &Arc<LanguageDefinition>) -> Parser<String> {
    let text = word(def);
    let language = Arc::clone(def);
    let checked = Parser::new(move |input| {
        let success = text.run(input)?;
        if language.is_reserved(&success.value) {
            return Err(Failure::new(
                FailureKind::Reserved {
                    word: success.value,
                },
                input.offset(),
            ));
        }
        Ok(success)
    });
    lexeme(def, checked)
}

/// The reserved word `name`, matched as a whole word under the language's
/// case rules.
pub fn reserved(def: &Arc<LanguageDefinition>, name: &str) -> Parser<String> {
    let text = word(def);
    let language = Arc::clone(def);
    let name = name.to_string();
    let expected = format!("reserved word {name:?}");
    let matched = Parser::new(move |input| {
        let found = match text.run(input) {
            Ok(success) if language.names_equal(&success.value, &name) => {
                return Ok(success.map(|_| name.clone()))
            }
            _ => input.head(),
        };
        let kind = match found {
            Some(found) => FailureKind::Expected {
                expected: expected.clone(),
                found,
            },
            None => FailureKind::UnexpectedEnd {
                expected: expected.clone(),
            },
        };
        Err(Failure::new(kind, input.offset()))
    });
    lexeme(def, matched)
}

// ============================================================================
// OPERATORS & SYMBOLS
// ============================================================================

fn operator_char(def: &Arc<LanguageDefinition>) -> Parser<char> {
    let language = Arc::clone(def);
    satisfy(move |c| language.is_operator_char(c), "operator character")
}

/// A maximal run of operator characters that is not a reserved operator.
pub fn operator(def: &Arc<LanguageDefinition>) -> Parser<String> {
    let text = capture(skip_many1(operator_char(def)));
    let language = Arc::clone(def);
    let checked = Parser::new(move |input| {
        let success = text.run(input)?;
        if language.is_reserved_op(&success.value) {
            return Err(Failure::new(
                FailureKind::Reserved {
                    word: success.value,
                },
                input.offset(),
            ));
        }
        Ok(success)
    });
    lexeme(def, checked)
}

/// The reserved operator `name`, not followed by further operator
/// characters.
pub fn reserved_op(def: &Arc<LanguageDefinition>, name: &str) -> Parser<String> {
    lexeme(
        def,
        string(name).skip(not_followed_by(operator_char(def))),
    )
}

/// The literal `text`. When `text` is made only of operator characters it
/// must also be the whole operator, so `+` does not match the start of `++`.
pub fn symbol(def: &Arc<LanguageDefinition>, text: &str) -> Parser<String> {
    let is_operator = !text.is_empty() && text.chars().all(|c| def.is_operator_char(c));
    let literal = if is_operator {
        string(text).skip(not_followed_by(operator_char(def)))
    } else {
        string(text)
    };
    lexeme(def, literal)
}

// ============================================================================
// NUMBERS
// ============================================================================

fn malformed(reason: &'static str) -> impl Fn(Failure, &Input) -> Failure + Send + Sync {
    move |failure, _| {
        Failure::new(
            FailureKind::MalformedNumber {
                text: String::new(),
                reason: reason.to_string(),
            },
            failure.offset,
        )
    }
}

/// The text of a number: a sign from `signs`, digits, optional fraction,
/// optional exponent.
fn number_text(signs: &str) -> Parser<String> {
    let fraction = optional(char('.')).bind(|dot| match dot {
        Some(_) => skip_many1(digit()).map_failure(malformed("expected digits after '.'")),
        None => ret(()),
    });
    let exponent = optional(one_of("eE")).bind(|marker| match marker {
        Some(_) => optional(one_of("+-"))
            .then(skip_many1(digit()))
            .map_failure(malformed("expected digits in exponent")),
        None => ret(()),
    });
    let text = capture(crate::do_seq!(
        optional(one_of(signs)),
        skip_many1(digit()),
        fraction,
        exponent
    ));
    // Fill in the text consumed up to the point the literal went wrong.
    text.map_failure(|mut failure, input| {
        if let FailureKind::MalformedNumber { text, .. } = &mut failure.kind {
            let end = failure.offset.min(input.source().len());
            *text = input.source()[input.offset()..end].to_string();
        }
        failure
    })
}

fn to_number(text: &str) -> Result<Number, String> {
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map(Number::Float)
            .map_err(|e| e.to_string())
    } else {
        text.parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| "integer out of range".to_string())
    }
}

/// A number literal without trailing whitespace.
pub(crate) fn number_literal() -> Parser<Number> {
    number_literal_signed_by("+-")
}

fn number_literal_signed_by(signs: &str) -> Parser<Number> {
    let text = number_text(signs);
    Parser::new(move |input| {
        let Success { value, remaining } = text.run(input)?;
        match to_number(&value) {
            Ok(number) => Ok(Success::new(number, remaining)),
            Err(reason) => Err(Failure::new(
                FailureKind::MalformedNumber {
                    text: value,
                    reason,
                },
                input.offset(),
            )),
        }
    })
}

/// A signed integer or floating point literal. A literal with a dangling
/// `.` or exponent fails as a whole.
pub fn number(def: &Arc<LanguageDefinition>) -> Parser<Number> {
    lexeme(def, number_literal())
}

fn digits_in(radix: u32, expected: &'static str) -> Parser<String> {
    capture(skip_many1(satisfy(move |c| c.is_digit(radix), expected)))
}

/// An unsigned natural number: decimal, `0x` hexadecimal or `0o` octal.
pub fn natural(def: &Arc<LanguageDefinition>) -> Parser<u64> {
    let radixed = |prefix: &str, radix: u32, expected: &'static str| {
        string(prefix).then(digits_in(radix, expected).map(move |text| (text, radix)))
    };
    let literal = choice(vec![
        radixed("0x", 16, "hexadecimal digit"),
        radixed("0o", 8, "octal digit"),
        digits_in(10, "digit").map(|text| (text, 10)),
    ]);
    let converted = Parser::new(move |input| {
        let Success { value, remaining } = literal.run(input)?;
        let (text, radix) = value;
        match u64::from_str_radix(&text, radix) {
            Ok(n) => Ok(Success::new(n, remaining)),
            Err(_) => Err(Failure::new(
                FailureKind::MalformedNumber {
                    text,
                    reason: "natural number out of range".into(),
                },
                input.offset(),
            )),
        }
    });
    lexeme(def, converted)
}

/// A natural number with an optional sign, which may be followed by
/// whitespace.
pub fn integer(def: &Arc<LanguageDefinition>) -> Parser<i64> {
    let sign = optional(lexeme(def, one_of("+-")));
    let magnitude = natural(def);
    Parser::new(move |input| {
        let signed = sign.run(input)?;
        let Success { value, remaining } = magnitude.run(&signed.remaining)?;
        let wide = i128::from(value);
        let signed_value = if signed.value == Some('-') {
            -wide
        } else {
            wide
        };
        let converted = i64::try_from(signed_value).ok();
        match converted {
            Some(n) => Ok(Success::new(n, remaining)),
            None => Err(Failure::new(
                FailureKind::MalformedNumber {
                    text: remaining.consumed_since(input).trim().to_string(),
                    reason: "integer out of range".into(),
                },
                input.offset(),
            )),
        }
    })
}

// ============================================================================
// STRING & CHARACTER LITERALS
// ============================================================================

/// The character after a backslash, decoded.
fn escape_code() -> Parser<char> {
    Parser::new(|input: &Input| {
        let invalid = |sequence: String| {
            Failure::new(
                FailureKind::InvalidEscape { sequence },
                input.offset().saturating_sub(1),
            )
        };
        let Some(code) = input.head() else {
            return Err(Failure::new(
                FailureKind::UnexpectedEnd {
                    expected: "escape sequence".into(),
                },
                input.offset(),
            ));
        };
        let decoded = match code {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '"' | '\'' => code,
            'u' => return unicode_escape(input).map_err(|_| invalid(unicode_text(input))),
            other => return Err(invalid(other.to_string())),
        };
        Ok(Success::new(decoded, input.rest()))
    })
}

/// The `u{..}` part of an escape, as written, for error messages.
fn unicode_text(input: &Input) -> String {
    let text = input.as_str();
    let end = text.find('}').map_or(text.len().min(1), |close| close + 1);
    text[..end].to_string()
}

fn unicode_escape(input: &Input) -> Result<Success<char>, ()> {
    let hex = char('u')
        .then(char('{'))
        .then(digits_in(16, "hexadecimal digit"))
        .skip(char('}'));
    let Success { value, remaining } = hex.run(input).map_err(|_| ())?;
    let code = u32::from_str_radix(&value, 16).map_err(|_| ())?;
    let decoded = std::char::from_u32(code).ok_or(())?;
    Ok(Success::new(decoded, remaining))
}

/// One character of a literal body delimited by `quote`.
fn literal_char(quote: char) -> Parser<char> {
    satisfy(move |c| c != quote, "literal character").bind(|c| {
        if c == '\\' {
            escape_code()
        } else {
            ret(c)
        }
    })
}

/// A quoted string without trailing whitespace.
pub(crate) fn quoted_string() -> Parser<String> {
    char('"')
        .then(many_till(literal_char('"'), char('"')))
        .map(|chars| chars.into_iter().collect::<String>())
        .map_failure(|failure, input| match failure.kind {
            FailureKind::UnexpectedEnd { .. } if failure.offset > input.offset() => {
                Failure::new(FailureKind::UnterminatedString, input.offset())
            }
            _ => failure,
        })
}

/// A double-quoted string with escapes decoded.
pub fn string_literal(def: &Arc<LanguageDefinition>) -> Parser<String> {
    lexeme(def, quoted_string())
}

/// A single-quoted character with escapes decoded.
pub fn char_literal(def: &Arc<LanguageDefinition>) -> Parser<char> {
    lexeme(
        def,
        between(char('\''), char('\''), literal_char('\'')).label("character literal"),
    )
}

// ============================================================================
// TOKEN PARSER - All helpers bound to one language
// ============================================================================

/// The token helpers for one shared [`LanguageDefinition`].
#[derive(Debug, Clone)]
pub struct TokenParser {
    def: Arc<LanguageDefinition>,
}

impl TokenParser {
    pub fn new(def: impl Into<Arc<LanguageDefinition>>) -> Self {
        Self { def: def.into() }
    }

    pub fn definition(&self) -> &Arc<LanguageDefinition> {
        &self.def
    }

    pub fn whitespace(&self) -> Parser<()> {
        whitespace(&self.def)
    }

    pub fn lexeme<T: 'static>(&self, parser: Parser<T>) -> Parser<T> {
        lexeme(&self.def, parser)
    }

    pub fn identifier(&self) -> Parser<String> {
        identifier(&self.def)
    }

    pub fn reserved(&self, name: &str) -> Parser<String> {
        reserved(&self.def, name)
    }

    pub fn operator(&self) -> Parser<String> {
        operator(&self.def)
    }

    pub fn reserved_op(&self, name: &str) -> Parser<String> {
        reserved_op(&self.def, name)
    }

    pub fn symbol(&self, text: &str) -> Parser<String> {
        symbol(&self.def, text)
    }

    pub fn number(&self) -> Parser<Number> {
        number(&self.def)
    }

    pub fn natural(&self) -> Parser<u64> {
        natural(&self.def)
    }

    pub fn integer(&self) -> Parser<i64> {
        integer(&self.def)
    }

    pub fn string_literal(&self) -> Parser<String> {
        string_literal(&self.def)
    }

    pub fn char_literal(&self) -> Parser<char> {
        char_literal(&self.def)
    }

    pub fn parens<T: 'static>(&self, parser: Parser<T>) -> Parser<T> {
        between(self.symbol("("), self.symbol(")"), parser)
    }

    pub fn brackets<T: 'static>(&self, parser: Parser<T>) -> Parser<T> {
        between(self.symbol("["), self.symbol("]"), parser)
    }

    pub fn braces<T: 'static>(&self, parser: Parser<T>) -> Parser<T> {
        between(self.symbol("{"), self.symbol("}"), parser)
    }

    pub fn comma_sep<T: 'static>(&self, parser: Parser<T>) -> Parser<Vec<T>> {
        sep_by(parser, self.symbol(","))
    }

    pub fn comma_sep1<T: 'static>(&self, parser: Parser<T>) -> Parser<Vec<T>> {
        sep_by1(parser, self.symbol(","))
    }

    pub fn semi_sep<T: 'static>(&self, parser: Parser<T>) -> Parser<Vec<T>> {
        sep_by(parser, self.symbol(";"))
    }

    /// Any single token of the language.
    pub fn token(&self) -> Parser<Token> {
        let def = Arc::clone(&self.def);
        let words = self.lexeme(word(&self.def)).map(move |text| {
            if def.is_reserved(&text) {
                Token::Reserved(text)
            } else {
                Token::Identifier(text)
            }
        });
        let def = Arc::clone(&self.def);
        let operators = self
            .lexeme(capture(skip_many1(operator_char(&self.def))))
            .map(move |text| {
                if def.is_reserved_op(&text) {
                    Token::Reserved(text)
                } else {
                    Token::Operator(text)
                }
            });
        // Quotes and digits only ever start literals, so a broken literal
        // fails the token instead of splitting into punctuation.
        let def = Arc::clone(&self.def);
        let punctuation = self.lexeme(satisfy(
            move |c| {
                !c.is_whitespace()
                    && !def.is_whitespace(c)
                    && !c.is_ascii_digit()
                    && c != '"'
                    && c != '\''
            },
            "token",
        ));

        // A sign the language also uses as an operator is left to the
        // operator branch, so `10+20` and `count-1` keep their operators.
        let signs: String = "+-".chars().filter(|c| !self.def.is_operator_char(*c)).collect();
        let number = self.lexeme(number_literal_signed_by(&signs));

        choice(vec![
            number.map(Token::Number),
            self.string_literal().map(Token::String),
            self.char_literal().map(Token::Char),
            words,
            operators,
            punctuation.map(|c| Token::Symbol(c.to_string())),
        ])
    }

    /// All tokens of a complete input, skipping leading whitespace.
    pub fn tokenize(&self) -> Parser<Vec<Token>> {
        self.whitespace().then(many_till(self.token(), eof()))
    }
}

impl From<LanguageDefinition> for TokenParser {
    fn from(def: LanguageDefinition) -> Self {
        TokenParser::new(def)
    }
}
