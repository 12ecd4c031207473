//! The parsnip command-line interface.
//!
//! A thin front end over the library: it reads a file, runs a tokenizer or
//! the sample Lisp grammar over it, and prints the result or a diagnostic.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::errors::{print_error, ReadError, SourceContext};
use crate::lexer::LanguageDefinition;
use crate::parser::parse;
use crate::token::{Token, TokenParser};
use crate::{lisp, Failure};

pub mod args;
pub mod output;

use args::{Command, ParsnipArgs};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// Parse the command line and run the chosen subcommand. Exits with status 1
/// on any failure.
pub fn run() {
    let args = ParsnipArgs::parse();

    match args.command {
        Command::Tokens {
            file,
            language,
            json,
        } => {
            let source = read_file_or_exit(&file);
            let tokens = tokenize_or_exit(&file, &source, language.as_deref());
            if json {
                print_json_or_exit(&tokens);
            } else {
                output::print_tokens(&tokens);
            }
        }

        Command::Check { file, language } => {
            let source = read_file_or_exit(&file);
            let tokens = tokenize_or_exit(&file, &source, language.as_deref());
            output::print_success(&format!("{}: {} tokens", file.display(), tokens.len()));
        }

        Command::Ast { file, json } => {
            let source = read_file_or_exit(&file);
            let forms = lisp::parse(&source).unwrap_or_else(|failure| {
                report_and_exit(&file, &source, &failure);
            });
            if json {
                print_json_or_exit(&forms);
            } else {
                output::print_forms(&forms);
            }
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_file_or_exit(path: &PathBuf) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|source| {
        print_error(ReadError {
            path: path.display().to_string(),
            source,
        });
        process::exit(1);
    })
}

fn load_language_or_exit(path: Option<&Path>) -> LanguageDefinition {
    let Some(path) = path else {
        return LanguageDefinition::lisp();
    };
    LanguageDefinition::load(path).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}

fn tokenize_or_exit(file: &Path, source: &str, language: Option<&Path>) -> Vec<Token> {
    let tokens = TokenParser::new(load_language_or_exit(language));
    match parse(source, &tokens.tokenize()) {
        Ok(success) => success.value,
        Err(failure) => report_and_exit(file, source, &failure),
    }
}

fn report_and_exit(file: &Path, source: &str, failure: &Failure) -> ! {
    let context = SourceContext::from_file(file.display().to_string(), source);
    print_error(context.report(failure));
    process::exit(1);
}

fn print_json_or_exit<T: serde::Serialize + ?Sized>(value: &T) {
    if let Err(e) = output::print_json(value) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
