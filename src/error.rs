//! Error types surfaced across the crate's public API.
//!
//! The lexer never fails (see [`crate::lexer`]); only the parser and, in
//! strict mode, the renderer can fail. Both error types are owned and
//! `'static` so they can cross a public API boundary freely.

use std::fmt;

/// A parser failure, carrying enough position information for a caller to
/// point a user at the offending source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize, line: u32, column: u32) -> Self {
        Self { message: message.into(), offset, line, column }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at line {} col {}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A renderer failure. Only raised in [`crate::render::Options::strict`]
/// mode; non-strict rendering is infallible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("statement kind {0:?} has no rendering in strict mode")]
    UnmodeledStatement(&'static str),
    #[error("upsert has no conflict target to render for this dialect")]
    MissingConflictTarget,
}

/// The union of everything a caller going source text to rendered text in
/// one step ([`crate::render::transcode`]) can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
