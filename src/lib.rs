//! A multi-dialect SQL front-end: a hand-rolled lexer and recursive-descent
//! + Pratt parser build an arena-backed syntax tree shared by three derived
//! services: dialect-aware rendering (MySQL/PostgreSQL/SQLite), static
//! analysis of risky or non-portable patterns, and raw token-stream access.
//!
//! ```
//! use sql_frontend::{parse_all, render, analyzer};
//! use sql_frontend::render::{Dialect, Options};
//!
//! let (arena, stmts) = parse_all("SELECT IFNULL(name, 'anon') FROM users").unwrap();
//! let rendered = render(&arena, &stmts, Options::new(Dialect::Postgres)).unwrap();
//! assert_eq!(rendered, "SELECT COALESCE(name, 'anon') FROM users;");
//!
//! let findings = analyzer::analyze(&arena, &stmts, Dialect::Postgres);
//! assert!(findings.is_empty());
//! ```

pub mod analyzer;
pub mod arena;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;

pub use analyzer::{analyze, Finding};
pub use arena::{Arena, ExprId, StmtId, TableRefId};
pub use error::{Error, ParseError, RenderError};
pub use lexer::{tokenize, Token};
pub use parser::Parser;
pub use render::{render, transcode, Dialect, Options};

/// Parses exactly one statement out of `src` and returns it together with
/// the arena it was allocated into. Trailing content after the statement
/// (including a trailing `;`) is ignored; use [`parse_all`] to require the
/// entire input to be consumed.
pub fn parse_one(src: &str) -> Result<(Arena<'_>, StmtId), ParseError> {
    let mut parser = Parser::new(src);
    let id = parser.next().ok_or_else(|| ParseError::new("empty input", 0, 1, 1))??;
    Ok((parser.into_arena(), id))
}

/// Parses every `;`-separated statement in `src`, in order, stopping at the
/// first error. Returns the shared arena and the statements' ids in source
/// order.
pub fn parse_all(src: &str) -> Result<(Arena<'_>, Vec<StmtId>), ParseError> {
    let mut parser = Parser::new(src);
    let mut stmts = Vec::new();
    while let Some(result) = parser.next() {
        stmts.push(result?);
    }
    Ok((parser.into_arena(), stmts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_one_ignores_trailing_content() {
        let (arena, id) = parse_one("SELECT 1; SELECT 2").unwrap();
        assert!(matches!(arena.stmt(id), ast::Stmt::Select(_)));
    }

    #[test]
    fn parse_all_collects_every_statement() {
        let (_, stmts) = parse_all("SELECT 1; SELECT 2; SELECT 3").unwrap();
        assert_eq!(stmts.len(), 3);
    }

    #[test]
    fn parse_all_stops_at_first_error() {
        let err = parse_all("SELECT 1; SELECT FROM").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn empty_input_is_an_error_for_parse_one() {
        assert!(parse_one("").is_err());
    }

    #[test]
    fn empty_input_parses_to_zero_statements_for_parse_all() {
        let (_, stmts) = parse_all("   ").unwrap();
        assert!(stmts.is_empty());
    }
}
