//! Parsnip Error Handling
//!
//! Parse failures are plain values ([`Failure`]) that flow through the
//! combinators. They only become rich `miette` diagnostics ([`SyntaxError`])
//! once a caller pairs them with the source text they came from.

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::input::line_col_at;

// ============================================================================
// FAILURE VALUES - What combinators return instead of a success
// ============================================================================

/// Why a parser failed, and where.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (at byte {offset})")]
pub struct Failure {
    pub kind: FailureKind,
    /// Byte offset into the source where the failure was detected.
    pub offset: usize,
}

/// All failure reasons. Grouped by [`ErrorCategory`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureKind {
    #[error("expected {expected}, found {found:?}")]
    Expected { expected: String, found: char },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("expected end of input, found {found:?}")]
    ExpectedEnd { found: char },

    #[error("unexpected {found:?}")]
    Unexpected { found: String },

    #[error("no alternative matched{}", summarize(.alternatives))]
    NoAlternative { alternatives: Vec<Failure> },

    #[error("'{word}' is a reserved word")]
    Reserved { word: String },

    #[error("unterminated block comment, expected '{end}'")]
    UnterminatedComment { end: String },

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence '\\{sequence}'")]
    InvalidEscape { sequence: String },

    #[error("malformed number '{text}': {reason}")]
    MalformedNumber { text: String, reason: String },

    #[error("{combinator} element succeeded without consuming input")]
    NoProgress { combinator: &'static str },

    #[error("{0}")]
    Message(String),
}

fn summarize(alternatives: &[Failure]) -> String {
    if alternatives.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = alternatives.iter().map(|f| f.kind.to_string()).collect();
    format!(": {}", parts.join("; "))
}

/// The broad classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The next character(s) did not meet a combinator's precondition.
    Structural,
    /// A repetition required at least one element and a step made no progress.
    Exhaustion,
    /// Every branch of a choice failed.
    Alternatives,
    /// Unterminated comment or string.
    Lexer,
    /// A literal with invalid syntax.
    MalformedLiteral,
    /// Raised explicitly by a grammar through `fail`.
    User,
}

impl FailureKind {
    /// Get the error category for this failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Expected { .. }
            | Self::UnexpectedEnd { .. }
            | Self::ExpectedEnd { .. }
            | Self::Unexpected { .. }
            | Self::Reserved { .. } => ErrorCategory::Structural,

            Self::NoProgress { .. } => ErrorCategory::Exhaustion,

            Self::NoAlternative { .. } => ErrorCategory::Alternatives,

            Self::UnterminatedComment { .. } | Self::UnterminatedString => ErrorCategory::Lexer,

            Self::InvalidEscape { .. } | Self::MalformedNumber { .. } => {
                ErrorCategory::MalformedLiteral
            }

            Self::Message(_) => ErrorCategory::User,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Expected { .. } => "expected",
            Self::UnexpectedEnd { .. } => "unexpected_end",
            Self::ExpectedEnd { .. } => "expected_end",
            Self::Unexpected { .. } => "unexpected",
            Self::NoAlternative { .. } => "no_alternative",
            Self::Reserved { .. } => "reserved",
            Self::UnterminatedComment { .. } => "unterminated_comment",
            Self::UnterminatedString => "unterminated_string",
            Self::InvalidEscape { .. } => "invalid_escape",
            Self::MalformedNumber { .. } => "malformed_number",
            Self::NoProgress { .. } => "no_progress",
            Self::Message(_) => "message",
        }
    }
}

impl Failure {
    pub fn new(kind: FailureKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn message(message: impl Into<String>, offset: usize) -> Self {
        Self::new(FailureKind::Message(message.into()), offset)
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Lexer and literal failures mean the input clearly started a construct
    /// and got it wrong, which is worth more than "expected something else".
    fn is_committed(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Lexer | ErrorCategory::MalformedLiteral
        )
    }

    /// The failure to show a user: for exhausted choices, the branch that got
    /// furthest into the input (or a committed branch failing in place),
    /// otherwise this failure itself.
    pub fn innermost(&self) -> &Failure {
        match &self.kind {
            FailureKind::NoAlternative { alternatives } => alternatives
                .iter()
                .map(Failure::innermost)
                .max_by_key(|inner| (inner.offset, inner.is_committed()))
                .filter(|inner| inner.offset > self.offset || inner.is_committed())
                .unwrap_or(self),
            _ => self,
        }
    }
}

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// The named text a failure is reported against.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Turn a failure into a diagnostic pointing into this source.
    pub fn report(&self, failure: &Failure) -> SyntaxError {
        let shown = failure.innermost().clone();
        let start = shown.offset.min(self.content.len());
        let width = self.content[start..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        let (line, column) = line_col_at(&self.content, start);
        let error_code = format!("parsnip::parse::{}", shown.kind.code_suffix());

        SyntaxError {
            help: help_for(&shown.kind),
            kind: shown.kind,
            line,
            column,
            src: self.to_named_source(),
            span: SourceSpan::from(start..start + width),
            error_code,
        }
    }
}

fn help_for(kind: &FailureKind) -> Option<String> {
    match kind {
        FailureKind::UnterminatedComment { end } => {
            Some(format!("close the comment with '{end}'"))
        }
        FailureKind::UnterminatedString => Some("add the closing '\"'".into()),
        FailureKind::Reserved { word } => Some(format!(
            "'{word}' is reserved by the language and cannot name anything"
        )),
        FailureKind::ExpectedEnd { .. } => Some("remove the trailing input".into()),
        FailureKind::InvalidEscape { .. } => {
            Some("recognized escapes are \\n \\t \\r \\0 \\\\ \\\" \\' and \\u{..}".into())
        }
        _ => None,
    }
}

// ============================================================================
// DIAGNOSTICS - miette-facing error types
// ============================================================================

/// A parse failure with its source attached, ready for display.
#[derive(Debug, Error)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct SyntaxError {
    pub kind: FailureKind,
    pub line: usize,
    pub column: usize,
    src: Arc<NamedSource<String>>,
    span: SourceSpan,
    help: Option<String>,
    error_code: String,
}

impl SyntaxError {
    fn primary_label(&self) -> String {
        match &self.kind {
            FailureKind::Expected { expected, .. } => format!("expected {expected}"),
            FailureKind::UnexpectedEnd { .. } => "input ends here".into(),
            FailureKind::ExpectedEnd { .. } => "unexpected trailing input".into(),
            FailureKind::Unexpected { .. } => "not allowed here".into(),
            FailureKind::NoAlternative { .. } => "no alternative matched here".into(),
            FailureKind::Reserved { .. } => "reserved word".into(),
            FailureKind::UnterminatedComment { .. } => "comment never closed".into(),
            FailureKind::UnterminatedString => "string never closed".into(),
            FailureKind::InvalidEscape { .. } => "invalid escape".into(),
            FailureKind::MalformedNumber { .. } => "malformed number".into(),
            FailureKind::NoProgress { .. } => "stuck here".into(),
            FailureKind::Message(message) => message.clone(),
        }
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.src)
    }
}

/// Failures while loading a language definition.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read language definition '{path}'")]
    #[diagnostic(code(parsnip::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML language definition")]
    #[diagnostic(code(parsnip::config::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON language definition")]
    #[diagnostic(code(parsnip::config::json))]
    Json(#[from] serde_json::Error),

    #[error("unsupported language definition format '{0}'")]
    #[diagnostic(
        code(parsnip::config::format),
        help("use a .yaml, .yml or .json file")
    )]
    UnknownFormat(String),

    #[error("invalid language definition: {0}")]
    #[diagnostic(code(parsnip::config::invalid))]
    Invalid(String),
}

/// A source file named on the command line could not be read.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to read '{path}'")]
#[diagnostic(code(parsnip::io))]
pub struct ReadError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints any diagnostic with full miette formatting to stderr.
pub fn print_error<E>(error: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_prefers_furthest_branch() {
        let near = Failure::new(
            FailureKind::Expected {
                expected: "'a'".into(),
                found: 'x',
            },
            0,
        );
        let far = Failure::new(FailureKind::UnterminatedString, 4);
        let choice = Failure::new(
            FailureKind::NoAlternative {
                alternatives: vec![near, far.clone()],
            },
            0,
        );
        assert_eq!(choice.innermost(), &far);
    }

    #[test]
    fn test_report_points_at_failure() {
        let source = SourceContext::from_file("t", "ab\n\"cd");
        let error = source.report(&Failure::new(FailureKind::UnterminatedString, 3));
        assert_eq!((error.line, error.column), (2, 1));
        assert_eq!(error.kind.category(), ErrorCategory::Lexer);
        assert!(error.to_string().contains("unterminated string"));
    }

    #[test]
    fn test_no_alternative_message_lists_branches() {
        let failure = FailureKind::NoAlternative {
            alternatives: vec![Failure::message("first", 0), Failure::message("second", 0)],
        };
        assert_eq!(failure.to_string(), "no alternative matched: first; second");
    }
}
