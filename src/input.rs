//! Immutable input views.
//!
//! An [`Input`] is a shared source text plus a byte offset. Consuming never
//! touches the text; it yields a new view further along the same source, so
//! every combinator can hold on to the view it started from and "restore" it
//! simply by not using the later one.

use std::fmt;
use std::sync::Arc;

/// A read-only view of the not-yet-consumed part of some source text.
#[derive(Clone, PartialEq, Eq)]
pub struct Input {
    source: Arc<str>,
    offset: usize,
}

impl Input {
    /// Create a view positioned at the start of `source`.
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            offset: 0,
        }
    }

    /// The next character, if any.
    pub fn head(&self) -> Option<char> {
        self.as_str().chars().next()
    }

    /// The view after consuming one character. Consuming past the end is a
    /// no-op.
    pub fn rest(&self) -> Input {
        match self.head() {
            Some(c) => self.advance(c.len_utf8()),
            None => self.clone(),
        }
    }

    /// The view after consuming `bytes` bytes, clamped to the end of input.
    ///
    /// Callers must pass a length that ends on a character boundary, which
    /// holds for any length measured from a prefix of [`Input::as_str`].
    pub fn advance(&self, bytes: usize) -> Input {
        Input {
            source: Arc::clone(&self.source),
            offset: (self.offset + bytes).min(self.source.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// The remaining, unconsumed text.
    pub fn as_str(&self) -> &str {
        &self.source[self.offset..]
    }

    /// Byte offset of this view into the original source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The full original source this view was taken from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The text consumed between an earlier view of the same source and
    /// this one. Returns an empty string if `earlier` is not actually earlier
    /// or belongs to a different source.
    pub fn consumed_since(&self, earlier: &Input) -> &str {
        if !Arc::ptr_eq(&self.source, &earlier.source) || earlier.offset > self.offset {
            return "";
        }
        &self.source[earlier.offset..self.offset]
    }

    /// 1-based line and column (in characters) of this view.
    pub fn line_col(&self) -> (usize, usize) {
        line_col_at(&self.source, self.offset)
    }
}

/// 1-based line and column of a byte offset in `source`.
pub fn line_col_at(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("offset", &self.offset)
            .field("remaining", &self.as_str())
            .finish()
    }
}

impl From<&str> for Input {
    fn from(source: &str) -> Self {
        Input::new(source)
    }
}

impl From<String> for Input {
    fn from(source: String) -> Self {
        Input::new(source)
    }
}

impl From<Arc<str>> for Input {
    fn from(source: Arc<str>) -> Self {
        Input::new(source)
    }
}
