//! Command-line arguments and subcommands for the `parsnip` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "parsnip",
    version,
    about = "Tokenize and parse files with parsnip's combinators."
)]
pub struct ParsnipArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tokens of a file.
    Tokens {
        /// The file to tokenize.
        #[arg(required = true)]
        file: PathBuf,
        /// A YAML or JSON language definition. Defaults to the Lisp preset.
        #[arg(short, long)]
        language: Option<PathBuf>,
        /// Print the tokens as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check that a file tokenizes cleanly.
    Check {
        /// The file to check.
        #[arg(required = true)]
        file: PathBuf,
        /// A YAML or JSON language definition. Defaults to the Lisp preset.
        #[arg(short, long)]
        language: Option<PathBuf>,
    },
    /// Parse a file with the sample Lisp grammar and print its forms.
    Ast {
        /// The Lisp file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the forms as JSON.
        #[arg(long)]
        json: bool,
    },
}
