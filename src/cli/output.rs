//! Handles all user-facing output for the CLI.
//!
//! Results go to stdout, colored only when stdout is a terminal. Failures
//! are printed by the caller through [`crate::errors::print_error`].

use std::io::{IsTerminal, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::lisp::Expr;
use crate::token::Token;

fn stdout() -> StandardStream {
    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// One token per line: the kind, colored by kind, then the text.
pub fn print_tokens(tokens: &[Token]) {
    let mut out = stdout();
    for token in tokens {
        let _ = out.set_color(ColorSpec::new().set_fg(Some(kind_color(token))));
        let _ = write!(out, "{:<10}", token.kind());
        let _ = out.reset();
        let _ = writeln!(out, " {}", token.text());
    }
}

/// Each top-level form on its own line.
pub fn print_forms(forms: &[Expr]) {
    let mut out = stdout();
    if forms.is_empty() {
        let _ = writeln!(out, "(empty)");
        return;
    }
    for form in forms {
        let _ = writeln!(out, "{}", form.pretty());
    }
}

pub fn print_success(message: &str) {
    let mut out = stdout();
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(out, "ok");
    let _ = out.reset();
    let _ = writeln!(out, ": {message}");
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    let _ = writeln!(stdout(), "{json}");
    Ok(())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn kind_color(token: &Token) -> Color {
    match token {
        Token::Identifier(_) => Color::White,
        Token::Reserved(_) => Color::Magenta,
        Token::Number(_) => Color::Cyan,
        Token::String(_) | Token::Char(_) => Color::Green,
        Token::Operator(_) => Color::Yellow,
        Token::Symbol(_) => Color::Blue,
    }
}
