//! A small Lisp reader built only from the public combinators.
//!
//! The grammar covers lists, quoted forms, numbers, strings, the literals
//! `true`, `false` and `nil`, and symbols, under the
//! [`LanguageDefinition::lisp`] conventions. It is a working example of a
//! recursive grammar and the parser behind `parsnip ast`.
//!
//! Lists are read recursively, so the deepest nesting accepted is bounded by
//! the calling thread's stack.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::combinators::{
    capture, char, choice, digit, eof, many_till, not_followed_by, satisfy, skip_many, skip_many1,
};
use crate::errors::Failure;
use crate::lexer::{lexeme, whitespace, LanguageDefinition};
use crate::parser::{lazy, Parser, Success};
use crate::token::{number_literal, quoted_string, word, Number};

/// Byte range of an expression in its source, trailing whitespace excluded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One form read from Lisp source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    List(Vec<Expr>, Span),
    Symbol(String, Span),
    Number(Number, Span),
    String(String, Span),
    Bool(bool, Span),
    Nil(Span),
    Quote(Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        use Expr::*;
        match self {
            List(_, span)
            | Symbol(_, span)
            | Number(_, span)
            | String(_, span)
            | Bool(_, span)
            | Quote(_, span) => *span,
            Nil(span) => *span,
        }
    }

    /// Returns the type name of this node, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::List(..) => "List",
            Expr::Symbol(..) => "Symbol",
            Expr::Number(..) => "Number",
            Expr::String(..) => "String",
            Expr::Bool(..) => "Bool",
            Expr::Nil(_) => "Nil",
            Expr::Quote(..) => "Quote",
        }
    }

    /// Renders the expression back as Lisp source.
    pub fn pretty(&self) -> std::string::String {
        use Expr::*;
        match self {
            List(items, _) => {
                let inner = items
                    .iter()
                    .map(Expr::pretty)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({inner})")
            }
            Symbol(name, _) => name.clone(),
            Number(n, _) => n.to_string(),
            String(s, _) => format!("{s:?}"),
            Bool(b, _) => b.to_string(),
            Nil(_) => "nil".to_string(),
            Quote(quoted, _) => format!("'{}", quoted.pretty()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

// ============================================================================
// GRAMMAR
// ============================================================================

static LANGUAGE: Lazy<Arc<LanguageDefinition>> =
    Lazy::new(|| LanguageDefinition::lisp().shared());

static EXPRESSION: Lazy<Parser<Expr>> = Lazy::new(expression);

static PROGRAM: Lazy<Parser<Vec<Expr>>> = Lazy::new(|| {
    whitespace(&LANGUAGE).then(many_till((*EXPRESSION).clone(), eof()))
});

/// Pair `parser`'s value with the span it consumed.
fn located<T: 'static>(parser: Parser<T>) -> Parser<(T, Span)> {
    Parser::new(move |input| {
        let Success { value, remaining } = parser.run(input)?;
        let span = Span {
            start: input.offset(),
            end: remaining.offset(),
        };
        Ok(Success::new((value, span), remaining))
    })
}

fn atom(def: &Arc<LanguageDefinition>) -> Parser<Expr> {
    let letter = Arc::clone(def);
    let delimited_number = number_literal().skip(not_followed_by(satisfy(
        move |c| letter.identifier_letter.contains(c),
        "symbol character",
    )));

    let language = Arc::clone(def);
    let words = located(word(def)).map(move |(text, span)| {
        if language.names_equal(&text, "true") {
            Expr::Bool(true, span)
        } else if language.names_equal(&text, "false") {
            Expr::Bool(false, span)
        } else if language.names_equal(&text, "nil") {
            Expr::Nil(span)
        } else {
            Expr::Symbol(text, span)
        }
    });

    // Symbols such as `1+` start with digits. A `.` or exponent marker
    // right after the digits stays a number, so `2.` is still malformed.
    let symbol_start = Arc::clone(def);
    let symbol_letter = Arc::clone(def);
    let digit_led = capture(
        skip_many1(digit())
            .then(satisfy(
                move |c| {
                    symbol_start.identifier_letter.contains(c)
                        && !c.is_ascii_digit()
                        && !matches!(c, '.' | 'e' | 'E')
                },
                "symbol character",
            ))
            .then(skip_many(satisfy(
                move |c| symbol_letter.identifier_letter.contains(c),
                "symbol character",
            ))),
    );

    choice(vec![
        located(delimited_number).map(|(n, span)| Expr::Number(n, span)),
        located(quoted_string()).map(|(s, span)| Expr::String(s, span)),
        words,
        located(digit_led).map(|(text, span)| Expr::Symbol(text, span)),
    ])
}

fn expression() -> Parser<Expr> {
    let def = Arc::clone(&*LANGUAGE);
    let inner = lazy(|| (*EXPRESSION).clone());

    let list = located(
        char('(')
            .skip(whitespace(&def))
            .then(many_till(inner.clone(), char(')'))),
    )
    .map(|(items, span)| Expr::List(items, span));

    let quote = located(char('\'').skip(whitespace(&def)).then(inner))
        .map(|(quoted, span)| Expr::Quote(Box::new(quoted), span));

    lexeme(&def, choice(vec![list, quote, atom(&def)]))
}

/// Read every form in `text`.
///
/// The whole input must be consumed; anything left over is a failure.
pub fn parse(text: &str) -> Result<Vec<Expr>, Failure> {
    crate::parser::parse(text, &PROGRAM)
        .map(|success| success.value)
        .map_err(|failure| failure.innermost().clone())
}

/// The language definition the reader uses.
pub fn language() -> Arc<LanguageDefinition> {
    Arc::clone(&*LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;

    #[test]
    fn test_parse_nested_list() {
        let forms = parse("(define (sq x) (* x x))").unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].pretty(), "(define (sq x) (* x x))");
        assert_eq!(forms[0].span(), Span { start: 0, end: 23 });
    }

    #[test]
    fn test_spans_exclude_trailing_whitespace() {
        let forms = parse("  foo   \"bar\" ; note\n").unwrap();
        assert_eq!(forms[0].span(), Span { start: 2, end: 5 });
        assert_eq!(forms[1].span(), Span { start: 8, end: 13 });
    }

    #[test]
    fn test_literals_are_case_insensitive() {
        let forms = parse("TRUE False nil Nilly").unwrap();
        assert!(matches!(forms[0], Expr::Bool(true, _)));
        assert!(matches!(forms[1], Expr::Bool(false, _)));
        assert!(matches!(forms[2], Expr::Nil(_)));
        assert!(matches!(&forms[3], Expr::Symbol(name, _) if name == "Nilly"));
    }

    #[test]
    fn test_numbers_and_symbols() {
        let forms = parse("(+ -3 2.5 x1 -)").unwrap();
        let Expr::List(items, _) = &forms[0] else {
            panic!("expected a list, got {:?}", forms[0]);
        };
        let names: Vec<&str> = items.iter().map(Expr::type_name).collect();
        assert_eq!(names, ["Symbol", "Number", "Number", "Symbol", "Symbol"]);
        assert!(matches!(items[1], Expr::Number(Number::Integer(-3), _)));
    }

    #[test]
    fn test_quote_and_comments() {
        let forms = parse("#| block #| nested |# |# '(a b)").unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].pretty(), "'(a b)");
    }

    #[test]
    fn test_unclosed_list_fails() {
        let failure = parse("(a (b c)").unwrap_err();
        assert_eq!(failure.offset, 8);
        assert!(matches!(
            failure.kind,
            FailureKind::NoAlternative { .. } | FailureKind::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn test_digit_led_symbols() {
        let forms = parse("(1+ x) 2nd").unwrap();
        assert_eq!(forms[0].pretty(), "(1+ x)");
        let Expr::List(items, _) = &forms[0] else {
            panic!("expected a list, got {:?}", forms[0]);
        };
        assert!(matches!(&items[0], Expr::Symbol(name, _) if name == "1+"));
        assert!(matches!(&forms[1], Expr::Symbol(name, _) if name == "2nd"));
        assert!(matches!(
            parse("(f 2.)").unwrap_err().kind,
            FailureKind::MalformedNumber { .. }
        ));
    }

    #[test]
    fn test_stray_close_paren_fails() {
        assert!(parse("a )").is_err());
    }
}
