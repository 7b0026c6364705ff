//! Recursive-descent statement parser + Pratt expression parser.
//!
//! The parser drives the lexer with a single current token and a
//! single-slot lookahead buffer (`peek`), exactly as specified: lookahead
//! is only populated on demand, at the handful of decision points that
//! need to distinguish a soft keyword (`duplicate`, `conflict`, `do`, …)
//! from a plain identifier, or `NOT LIKE`/`NOT IN`/`NOT BETWEEN` from a
//! bare unary `NOT`.
//!
//! Grammar productions are free functions taking `&mut Parser` rather than
//! methods, grouped by concern into sibling modules (`select`, `dml`,
//! `ddl`, `expr`), each a `fn parse_x(p: &mut Parser)` production sharing
//! the one `Parser` struct.

mod ddl;
mod dml;
mod expr;
mod select;

use crate::arena::{Arena, StmtId};
use crate::ast::{Call, Explain, Ident, QualifiedName, Stmt, TxnKind, UseStmt};
use crate::error::ParseError;
use crate::lexer::{Keyword, Lexer, LiteralKind, Position, Punct, Token, TokenKind};

pub(crate) use expr::full_expr;

/// Binding powers for the Pratt expression loop, matching the distilled
/// spec's eleven precedence levels 1:1 (low to high). `NOT_PREFIX` is the
/// odd one out: it is a *prefix* binding power (how tightly `NOT` pulls in
/// its operand), sitting between `AND` and the comparison family so that
/// `a AND NOT b = c` parses as `a AND (NOT (b = c))`.
mod bp {
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    pub const NOT_PREFIX: u8 = 3;
    pub const CMP: u8 = 4;
    pub const BIT_OR: u8 = 5;
    pub const BIT_AND: u8 = 6;
    pub const SHIFT: u8 = 7;
    pub const ADD: u8 = 8;
    pub const MUL: u8 = 9;
    pub const UNARY: u8 = 10;
    pub const JSON_POSTFIX: u8 = 11;
}

/// Recursive-descent + Pratt parser over a single source string. Every
/// tree node it builds is allocated in `arena`; every borrowed byte range
/// inside a node is a sub-slice of the source passed to [`Parser::new`]
/// or [`Parser::reset`].
pub struct Parser<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    current: Token<'src>,
    lookahead: Option<Token<'src>>,
    arena: Arena<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next();
        Self { src: source, lexer, current, lookahead: None, arena: Arena::new() }
    }

    /// Rewinds the parser onto `new_source`. Any `StmtId`/`ExprId`/
    /// `TableRefId` obtained before this call may now resolve to unrelated
    /// nodes from the next parse.
    pub fn reset(&mut self, new_source: &'src str) {
        self.src = new_source;
        self.lexer = Lexer::new(new_source);
        self.current = self.lexer.next();
        self.lookahead = None;
        self.arena.reset();
    }

    pub fn arena(&self) -> &Arena<'src> {
        &self.arena
    }

    pub fn into_arena(self) -> Arena<'src> {
        self.arena
    }

    /// Parses the next statement, transparently skipping any number of
    /// leading/separating semicolons. Returns `None` once only trivia and
    /// `;` remain before end of input.
    pub fn next(&mut self) -> Option<Result<StmtId, ParseError>> {
        while self.eat_punct(Punct::Semicolon) {}
        if self.at_eof() {
            return None;
        }
        Some(self.parse_statement())
    }

    // -- arena plumbing shared by the grammar submodules -------------------

    fn alloc_expr(&mut self, expr: crate::ast::Expr<'src>) -> crate::arena::ExprId {
        self.arena.alloc_expr(expr)
    }

    fn alloc_table_ref(&mut self, table_ref: crate::ast::TableRef<'src>) -> crate::arena::TableRefId {
        self.arena.alloc_table_ref(table_ref)
    }

    // -- token plumbing ---------------------------------------------------

    fn bump(&mut self) -> Token<'src> {
        let tok = self.current;
        self.current = self.lookahead.take().unwrap_or_else(|| self.lexer.next());
        tok
    }

    /// Populates and returns the single-slot lookahead buffer without
    /// consuming `current`.
    fn peek(&mut self) -> Token<'src> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next());
        }
        self.lookahead.unwrap()
    }

    fn at_eof(&self) -> bool {
        self.current.is_eof()
    }

    fn at_punct(&self, p: Punct) -> bool {
        matches!(self.current.kind, TokenKind::Punct(k) if k == p)
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        self.current.kind.is_keyword(kw)
    }

    fn eat_punct(&mut self, p: Punct) -> bool {
        if self.at_punct(p) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.at_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: Punct) -> Result<Token<'src>, ParseError> {
        if self.at_punct(p) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected '{}', found {}", p.as_str(), self.describe_current())))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Token<'src>, ParseError> {
        if self.at_keyword(kw) {
            Ok(self.bump())
        } else {
            Err(self.error(format!(
                "expected '{}', found {}",
                kw.as_str().to_ascii_uppercase(),
                self.describe_current()
            )))
        }
    }

    /// A "soft keyword": an identifier token (never a declared `Keyword`)
    /// whose lowercased text matches `word`. Used for the MySQL/Postgres
    /// dialect words that are not reserved anywhere in §6's keyword list
    /// (`duplicate`, `conflict`, `do`, `begin`, `commit`, `start`,
    /// `savepoint`, `release`, `call`, `interval`).
    fn current_is_soft_kw(&self, word: &str) -> bool {
        matches!(self.current.kind, TokenKind::Ident) && self.current.raw.eq_ignore_ascii_case(word)
    }

    fn peek_is_soft_kw(&mut self, word: &str) -> bool {
        let tok = self.peek();
        matches!(tok.kind, TokenKind::Ident) && tok.raw.eq_ignore_ascii_case(word)
    }

    fn eat_soft_kw(&mut self, word: &str) -> bool {
        if self.current_is_soft_kw(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_soft_kw(&mut self, word: &str) -> Result<Token<'src>, ParseError> {
        if self.current_is_soft_kw(word) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected '{}', found {}", word, self.describe_current())))
        }
    }

    fn describe_current(&self) -> String {
        if self.current.raw.is_empty() {
            self.current.kind.to_string()
        } else {
            format!("{} `{}`", self.current.kind, self.current.raw)
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let Position { offset, line, column } = self.current.position;
        ParseError::new(message, offset, line, column)
    }

    /// Strips one leading and one trailing quote byte (backtick or double
    /// quote), preserving inner bytes verbatim; doubled-quote escapes are
    /// not unescaped.
    fn strip_quotes(raw: &'src str) -> &'src str {
        let bytes = raw.as_bytes();
        if bytes.len() >= 2 {
            &raw[1..raw.len() - 1]
        } else {
            raw
        }
    }

    /// Parses a single identifier, accepting either a bare/keyword token
    /// (keywords double as identifiers at column/table-name positions,
    /// §4.4) or a backtick-/double-quoted literal.
    fn parse_ident(&mut self) -> Result<Ident<'src>, ParseError> {
        match self.current.kind {
            TokenKind::Ident | TokenKind::Keyword(_) => {
                let tok = self.bump();
                Ok(Ident::unquoted(tok.raw))
            }
            TokenKind::Literal(LiteralKind::DoubleQuotedString | LiteralKind::BacktickQuotedString) => {
                let tok = self.bump();
                Ok(Ident::quoted(Self::strip_quotes(tok.raw)))
            }
            _ => Err(self.error(format!("expected identifier, found {}", self.describe_current()))),
        }
    }

    /// A dot-separated identifier sequence: `name (. name)*`.
    fn parse_qualified_name(&mut self) -> Result<QualifiedName<'src>, ParseError> {
        let mut parts = vec![self.parse_ident()?];
        while self.eat_punct(Punct::Dot) {
            parts.push(self.parse_ident()?);
        }
        Ok(QualifiedName { parts })
    }

    fn parse_ident_list(&mut self) -> Result<Vec<Ident<'src>>, ParseError> {
        let mut idents = vec![self.parse_ident()?];
        while self.eat_punct(Punct::Comma) {
            idents.push(self.parse_ident()?);
        }
        Ok(idents)
    }

    fn parse_paren_ident_list(&mut self) -> Result<Vec<Ident<'src>>, ParseError> {
        self.expect_punct(Punct::LParen)?;
        let idents = self.parse_ident_list()?;
        self.expect_punct(Punct::RParen)?;
        Ok(idents)
    }

    // -- statement dispatch ------------------------------------------------

    /// Allocates a statement node tagged with the position its first
    /// token started at.
    fn alloc_stmt(&mut self, stmt: Stmt<'src>, start: Position) -> StmtId {
        self.arena.alloc_stmt(stmt, start)
    }

    fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current.position;
        match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                let select = select::parse_select(self)?;
                Ok(self.alloc_stmt(Stmt::Select(select), start))
            }
            TokenKind::Keyword(Keyword::With) => self.parse_with_prefixed_statement(start),
            TokenKind::Keyword(Keyword::Insert) | TokenKind::Keyword(Keyword::Replace) => {
                let insert = dml::parse_insert(self, None)?;
                Ok(self.alloc_stmt(Stmt::Insert(insert), start))
            }
            TokenKind::Keyword(Keyword::Update) => {
                let update = dml::parse_update(self, None)?;
                Ok(self.alloc_stmt(Stmt::Update(update), start))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                let delete = dml::parse_delete(self, None)?;
                Ok(self.alloc_stmt(Stmt::Delete(delete), start))
            }
            TokenKind::Keyword(Keyword::Create) => ddl::parse_create(self, start),
            TokenKind::Keyword(Keyword::Alter) => ddl::parse_alter(self, start),
            TokenKind::Keyword(Keyword::Drop) => ddl::parse_drop(self, start),
            TokenKind::Keyword(Keyword::Truncate) => ddl::parse_truncate(self, start),
            TokenKind::Keyword(Keyword::Use) => self.parse_use(start),
            TokenKind::Keyword(Keyword::Rollback) => {
                self.bump();
                self.eat_keyword(Keyword::Transaction);
                Ok(self.alloc_stmt(Stmt::Transaction(TxnKind::Rollback), start))
            }
            TokenKind::Keyword(Keyword::Set) => ddl::parse_generic_ddl(self, start, "SET"),
            TokenKind::Keyword(Keyword::Show) => self.parse_show(start),
            TokenKind::Keyword(Keyword::Explain) => self.parse_explain(start),
            TokenKind::Ident if self.current_is_soft_kw("begin") || self.current_is_soft_kw("start") => {
                self.bump();
                self.skip_to_statement_end();
                Ok(self.alloc_stmt(Stmt::Transaction(TxnKind::Begin), start))
            }
            TokenKind::Ident if self.current_is_soft_kw("commit") => {
                self.bump();
                self.skip_to_statement_end();
                Ok(self.alloc_stmt(Stmt::Transaction(TxnKind::Commit), start))
            }
            TokenKind::Ident if self.current_is_soft_kw("savepoint") || self.current_is_soft_kw("release") => {
                self.bump();
                self.skip_to_statement_end();
                Ok(self.alloc_stmt(Stmt::Transaction(TxnKind::Begin), start))
            }
            TokenKind::Ident if self.current_is_soft_kw("call") => self.parse_call(start),
            _ => Err(self.error(format!("unexpected {} at start of statement", self.describe_current()))),
        }
    }

    fn parse_with_prefixed_statement(&mut self, start: Position) -> Result<StmtId, ParseError> {
        let with = select::parse_with_clause(self)?;
        match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                let mut select = select::parse_select(self)?;
                select.with = Some(with);
                Ok(self.alloc_stmt(Stmt::Select(select), start))
            }
            TokenKind::Keyword(Keyword::Insert) | TokenKind::Keyword(Keyword::Replace) => {
                let insert = dml::parse_insert(self, Some(with))?;
                Ok(self.alloc_stmt(Stmt::Insert(insert), start))
            }
            TokenKind::Keyword(Keyword::Update) => {
                let update = dml::parse_update(self, Some(with))?;
                Ok(self.alloc_stmt(Stmt::Update(update), start))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                let delete = dml::parse_delete(self, Some(with))?;
                Ok(self.alloc_stmt(Stmt::Delete(delete), start))
            }
            _ => Err(self.error(format!(
                "expected SELECT, INSERT, UPDATE or DELETE after WITH clause, found {}",
                self.describe_current()
            ))),
        }
    }

    fn parse_use(&mut self, start: Position) -> Result<StmtId, ParseError> {
        self.expect_keyword(Keyword::Use)?;
        let name = self.parse_ident()?;
        Ok(self.alloc_stmt(Stmt::Use(UseStmt { name }), start))
    }

    fn parse_show(&mut self, start: Position) -> Result<StmtId, ParseError> {
        self.expect_keyword(Keyword::Show)?;
        let target_start = self.current.position.offset;
        while !matches!(
            self.current.kind,
            TokenKind::Punct(Punct::Semicolon) | TokenKind::Eof
        ) && !self.current_is_soft_kw("like")
        {
            self.bump();
        }
        let target = &self.src[target_start..self.current.position.offset];
        let like = if self.eat_soft_kw("like") { Some(full_expr(self)?) } else { None };
        Ok(self.alloc_stmt(Stmt::Show(crate::ast::Show { target: target.trim(), like }), start))
    }

    fn parse_explain(&mut self, start: Position) -> Result<StmtId, ParseError> {
        self.expect_keyword(Keyword::Explain)?;
        let analyze = self.eat_soft_kw("analyze") || self.eat_keyword(Keyword::Analyze);
        let stmt = self.parse_statement()?;
        Ok(self.alloc_stmt(Stmt::Explain(Explain { stmt, analyze }), start))
    }

    fn parse_call(&mut self, start: Position) -> Result<StmtId, ParseError> {
        self.expect_soft_kw("call")?;
        let name = self.parse_qualified_name()?;
        let mut args = Vec::new();
        if self.eat_punct(Punct::LParen) {
            if !self.at_punct(Punct::RParen) {
                loop {
                    args.push(full_expr(self)?);
                    if !self.eat_punct(Punct::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(Punct::RParen)?;
        }
        Ok(self.alloc_stmt(Stmt::Call(Call { name, args }), start))
    }

    /// Consumes tokens up to (but not including) the next `;` or end of
    /// input. Used by the unmodeled-statement fallbacks (`SET`, generic
    /// DDL, bare transaction-control words) which don't need a structured
    /// tree, only to not desynchronize the following statement.
    fn skip_to_statement_end(&mut self) {
        while !matches!(self.current.kind, TokenKind::Punct(Punct::Semicolon) | TokenKind::Eof) {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn skips_leading_and_trailing_semicolons() {
        let mut p = Parser::new(";; select 1 ;; select 2 ;;");
        let mut count = 0;
        while let Some(r) = p.next() {
            r.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn reset_invalidates_prior_arena_contents() {
        let mut p = Parser::new("select 1");
        p.next().unwrap().unwrap();
        assert_eq!(p.arena().stmt_count(), 1);
        p.reset("select 2");
        assert_eq!(p.arena().stmt_count(), 0);
    }

    #[test]
    fn select_from_error_reports_line_one() {
        let mut p = Parser::new("SELECT FROM");
        let err = p.next().unwrap().unwrap_err();
        assert_eq!(err.line, 1);
    }
}
