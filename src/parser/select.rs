//! `SELECT`, `WITH`, table references/joins, `ORDER BY`/`LIMIT` (distilled
//! spec §4.4 "SELECT grammar", "Column list", "Table refs").

use super::{full_expr, Parser};
use crate::arena::{StmtId, TableRefId};
use crate::ast::{
    Cte, LimitClause, NullsOrder, OrderByItem, Select, SelectColumn, SelectCore, SetOp, SetOpLink,
    Stmt, TableRef, WithClause,
};
use crate::error::ParseError;
use crate::lexer::{Keyword, Punct, TokenKind};

/// Parses a `SELECT ...` statement including its trailing set-operation
/// chain, `ORDER BY` and `LIMIT`. Does not attach a `WITH` clause; the
/// caller (statement dispatch or a parenthesized subquery) does that.
pub(crate) fn parse_select<'src>(p: &mut Parser<'src>) -> Result<Select<'src>, ParseError> {
    p.expect_keyword(Keyword::Select)?;
    parse_select_inner_after_keyword(p)
}

fn current_set_op<'src>(p: &Parser<'src>) -> Option<SetOp> {
    match p.current.kind {
        TokenKind::Keyword(Keyword::Union) => Some(SetOp::Union),
        TokenKind::Keyword(Keyword::Intersect) => Some(SetOp::Intersect),
        TokenKind::Keyword(Keyword::Except) => Some(SetOp::Except),
        _ => None,
    }
}

/// Parses a bare `SELECT core` or a `WITH`-prefixed one, returning the
/// allocated statement id. Used wherever the grammar embeds a full select
/// as a sub-term: scalar/`IN`/`EXISTS` subqueries, parenthesized table
/// refs, CTE bodies.
pub(crate) fn parse_select_or_with<'src>(p: &mut Parser<'src>) -> Result<StmtId, ParseError> {
    let start = p.current.position;
    if p.at_keyword(Keyword::With) {
        let with = parse_with_clause(p)?;
        p.expect_keyword(Keyword::Select)?;
        let mut select = parse_select_inner_after_keyword(p)?;
        select.with = Some(with);
        return Ok(p.alloc_stmt(Stmt::Select(select), start));
    }
    p.expect_keyword(Keyword::Select)?;
    let select = parse_select_inner_after_keyword(p)?;
    Ok(p.alloc_stmt(Stmt::Select(select), start))
}

/// Continues parsing a `SELECT` statement whose leading `SELECT` keyword
/// has already been consumed (so set-op right-hand selects and
/// [`parse_select_or_with`] can share one body with [`parse_select`],
/// which expects to consume `SELECT` itself).
fn parse_select_inner_after_keyword<'src>(p: &mut Parser<'src>) -> Result<Select<'src>, ParseError> {
    let core = parse_select_core_after_keyword(p)?;
    let mut set_ops = Vec::new();
    while let Some(op) = current_set_op(p) {
        p.bump();
        let all = p.eat_keyword(Keyword::All);
        p.eat_keyword(Keyword::Distinct);
        let next_core = parse_select_core(p)?;
        set_ops.push(SetOpLink { op, all, core: next_core });
    }
    let order_by = parse_optional_order_by(p)?;
    let limit = parse_optional_limit(p)?;
    Ok(Select { with: None, core, set_ops, order_by, limit })
}

fn parse_select_core<'src>(p: &mut Parser<'src>) -> Result<SelectCore<'src>, ParseError> {
    p.expect_keyword(Keyword::Select)?;
    parse_select_core_after_keyword(p)
}

fn parse_select_core_after_keyword<'src>(p: &mut Parser<'src>) -> Result<SelectCore<'src>, ParseError> {
    let distinct = p.eat_keyword(Keyword::Distinct);
    if !distinct {
        p.eat_keyword(Keyword::All);
    }

    let columns = parse_select_columns(p)?;

    let from = if p.eat_keyword(Keyword::From) { Some(parse_table_refs(p)?) } else { None };

    let where_clause = if p.eat_keyword(Keyword::Where) { Some(full_expr(p)?) } else { None };

    let group_by = if p.eat_keyword(Keyword::Group) {
        p.expect_keyword(Keyword::By)?;
        let mut exprs = vec![full_expr(p)?];
        while p.eat_punct(Punct::Comma) {
            exprs.push(full_expr(p)?);
        }
        exprs
    } else {
        Vec::new()
    };

    let having = if p.eat_keyword(Keyword::Having) { Some(full_expr(p)?) } else { None };

    Ok(SelectCore { distinct, columns, from, where_clause, group_by, having })
}

fn parse_select_columns<'src>(p: &mut Parser<'src>) -> Result<Vec<SelectColumn<'src>>, ParseError> {
    let mut columns = vec![parse_select_column(p)?];
    while p.eat_punct(Punct::Comma) {
        columns.push(parse_select_column(p)?);
    }
    Ok(columns)
}

fn parse_select_column<'src>(p: &mut Parser<'src>) -> Result<SelectColumn<'src>, ParseError> {
    let expr = full_expr(p)?;
    let alias = parse_optional_alias(p)?;
    Ok(SelectColumn { expr, alias })
}

/// `[AS] alias`, where the `AS` keyword is optional and the alias may be
/// a bare, backtick- or double-quote-quoted identifier. Returns `None`
/// when the current token cannot start an alias (callers decide what's
/// allowed to follow by where they call this).
pub(crate) fn parse_optional_alias<'src>(
    p: &mut Parser<'src>,
) -> Result<Option<crate::ast::Ident<'src>>, ParseError> {
    if p.eat_keyword(Keyword::As) {
        return Ok(Some(p.parse_ident()?));
    }
    if matches!(p.current.kind, TokenKind::Ident)
        || matches!(
            p.current.kind,
            TokenKind::Literal(crate::lexer::LiteralKind::DoubleQuotedString | crate::lexer::LiteralKind::BacktickQuotedString)
        )
    {
        return Ok(Some(p.parse_ident()?));
    }
    Ok(None)
}

// -- WITH clause / CTEs ----------------------------------------------------

pub(crate) fn parse_with_clause<'src>(p: &mut Parser<'src>) -> Result<WithClause<'src>, ParseError> {
    p.expect_keyword(Keyword::With)?;
    let recursive = p.eat_keyword(Keyword::Recursive);
    let mut ctes = vec![parse_cte(p)?];
    while p.eat_punct(Punct::Comma) {
        ctes.push(parse_cte(p)?);
    }
    Ok(WithClause { recursive, ctes })
}

fn parse_cte<'src>(p: &mut Parser<'src>) -> Result<Cte<'src>, ParseError> {
    let name = p.parse_ident()?;
    let column_names = if p.at_punct(Punct::LParen) { p.parse_paren_ident_list()? } else { Vec::new() };
    p.expect_keyword(Keyword::As)?;
    p.expect_punct(Punct::LParen)?;
    let stmt = parse_select_or_with(p)?;
    p.expect_punct(Punct::RParen)?;
    Ok(Cte { name, column_names, stmt })
}

// -- table refs / joins -----------------------------------------------------

pub(crate) fn parse_table_refs<'src>(p: &mut Parser<'src>) -> Result<TableRefId, ParseError> {
    let mut left = parse_table_ref_primary(p)?;

    loop {
        if p.eat_punct(Punct::Comma) {
            let right = parse_table_ref_primary(p)?;
            left = p.alloc_table_ref(TableRef::Join {
                left,
                right,
                kind: crate::ast::JoinKind::Cross,
                natural: false,
                on: None,
                using: Vec::new(),
            });
            continue;
        }

        if !starts_join(p) {
            break;
        }

        let natural = p.eat_keyword(Keyword::Natural);
        let kind = match p.current.kind {
            TokenKind::Keyword(Keyword::Inner) => {
                p.bump();
                crate::ast::JoinKind::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                p.bump();
                p.eat_keyword(Keyword::Outer);
                crate::ast::JoinKind::Left
            }
            TokenKind::Keyword(Keyword::Right) => {
                p.bump();
                p.eat_keyword(Keyword::Outer);
                crate::ast::JoinKind::Right
            }
            TokenKind::Keyword(Keyword::Full) => {
                p.bump();
                p.eat_keyword(Keyword::Outer);
                crate::ast::JoinKind::Full
            }
            TokenKind::Keyword(Keyword::Cross) => {
                p.bump();
                crate::ast::JoinKind::Cross
            }
            TokenKind::Keyword(Keyword::Join) => crate::ast::JoinKind::Inner,
            _ => unreachable!("starts_join guarantees one of the above"),
        };
        p.expect_keyword(Keyword::Join)?;
        let right = parse_table_ref_primary(p)?;

        let (on, using) = if p.eat_keyword(Keyword::On) {
            (Some(full_expr(p)?), Vec::new())
        } else if p.eat_keyword(Keyword::Using) {
            (None, p.parse_paren_ident_list()?)
        } else {
            (None, Vec::new())
        };

        left = p.alloc_table_ref(TableRef::Join { left, right, kind, natural, on, using });
    }

    Ok(left)
}

fn starts_join<'src>(p: &Parser<'src>) -> bool {
    matches!(
        p.current.kind,
        TokenKind::Keyword(
            Keyword::Inner
                | Keyword::Left
                | Keyword::Right
                | Keyword::Full
                | Keyword::Cross
                | Keyword::Natural
                | Keyword::Join
        )
    )
}

fn parse_table_ref_primary<'src>(p: &mut Parser<'src>) -> Result<TableRefId, ParseError> {
    if p.eat_punct(Punct::LParen) {
        if matches!(p.current.kind, TokenKind::Keyword(Keyword::Select) | TokenKind::Keyword(Keyword::With)) {
            let stmt = parse_select_or_with(p)?;
            p.expect_punct(Punct::RParen)?;
            let alias = parse_optional_alias(p)?;
            return Ok(p.alloc_table_ref(TableRef::Subquery { stmt, alias }));
        }
        // A parenthesized join: `(t1 JOIN t2 ON ...)`. No alias allowed.
        let inner = parse_table_refs(p)?;
        p.expect_punct(Punct::RParen)?;
        return Ok(inner);
    }

    let name = p.parse_qualified_name()?;
    let alias = parse_optional_alias(p)?;
    Ok(p.alloc_table_ref(TableRef::Named { name, alias }))
}

// -- ORDER BY / LIMIT --------------------------------------------------------

pub(crate) fn parse_optional_order_by<'src>(p: &mut Parser<'src>) -> Result<Vec<OrderByItem>, ParseError> {
    if !p.eat_keyword(Keyword::Order) {
        return Ok(Vec::new());
    }
    p.expect_keyword(Keyword::By)?;
    let mut items = vec![parse_order_by_item(p)?];
    while p.eat_punct(Punct::Comma) {
        items.push(parse_order_by_item(p)?);
    }
    Ok(items)
}

fn parse_order_by_item<'src>(p: &mut Parser<'src>) -> Result<OrderByItem, ParseError> {
    let expr = full_expr(p)?;
    let desc = if p.eat_keyword(Keyword::Desc) {
        true
    } else {
        p.eat_keyword(Keyword::Asc);
        false
    };
    let nulls = if p.eat_soft_kw("nulls") {
        if p.eat_keyword(Keyword::First) {
            Some(NullsOrder::First)
        } else if p.eat_keyword(Keyword::Last) {
            Some(NullsOrder::Last)
        } else {
            return Err(p.error(format!("expected FIRST or LAST after NULLS, found {}", p.describe_current())));
        }
    } else {
        None
    };
    Ok(OrderByItem { expr, desc, nulls })
}

/// `LIMIT count [OFFSET offset]` and the MySQL `LIMIT offset, count` form
/// both normalize to `(count, offset)`.
pub(crate) fn parse_optional_limit<'src>(p: &mut Parser<'src>) -> Result<Option<LimitClause>, ParseError> {
    if !p.eat_keyword(Keyword::Limit) {
        return Ok(None);
    }
    let first = full_expr(p)?;
    if p.eat_punct(Punct::Comma) {
        let count = full_expr(p)?;
        return Ok(Some(LimitClause { limit: count, offset: Some(first) }));
    }
    let offset = if p.eat_keyword(Keyword::Offset) { Some(full_expr(p)?) } else { None };
    Ok(Some(LimitClause { limit: first, offset }))
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use crate::ast::Stmt;
    use pretty_assertions::assert_eq;

    fn parse_one(src: &'static str) -> (crate::arena::Arena<'static>, crate::arena::StmtId) {
        let mut p = Parser::new(src);
        let id = p.next().unwrap().unwrap();
        (p.into_arena(), id)
    }

    #[test]
    fn limit_offset_and_comma_form_are_equivalent() {
        let (arena, id) = parse_one("SELECT 1 FROM t LIMIT 5 OFFSET 10");
        let Stmt::Select(s) = arena.stmt(id) else { panic!() };
        let limit = s.limit.unwrap();
        assert!(matches!(arena.expr(limit.limit), crate::ast::Expr::IntegerLiteral("5")));
        assert!(matches!(arena.expr(limit.offset.unwrap()), crate::ast::Expr::IntegerLiteral("10")));

        let (arena, id) = parse_one("SELECT 1 FROM t LIMIT 10, 5");
        let Stmt::Select(s) = arena.stmt(id) else { panic!() };
        let limit = s.limit.unwrap();
        assert!(matches!(arena.expr(limit.limit), crate::ast::Expr::IntegerLiteral("5")));
        assert!(matches!(arena.expr(limit.offset.unwrap()), crate::ast::Expr::IntegerLiteral("10")));
    }

    #[test]
    fn set_operation_chain_is_left_leaning() {
        let (arena, id) = parse_one("SELECT 1 UNION SELECT 2 EXCEPT SELECT 3");
        let Stmt::Select(s) = arena.stmt(id) else { panic!() };
        assert_eq!(s.set_ops.len(), 2);
        assert_eq!(s.set_ops[0].op, crate::ast::SetOp::Union);
        assert_eq!(s.set_ops[1].op, crate::ast::SetOp::Except);
    }

    #[test]
    fn comma_joined_from_list_is_cross_join() {
        let (arena, id) = parse_one("SELECT * FROM a, b, c");
        let Stmt::Select(s) = arena.stmt(id) else { panic!() };
        let from = s.core.from.unwrap();
        assert!(matches!(
            arena.table_ref(from),
            crate::ast::TableRef::Join { kind: crate::ast::JoinKind::Cross, .. }
        ));
    }

    #[test]
    fn with_clause_attaches_to_insert() {
        let (arena, id) = parse_one("WITH t AS (SELECT 1) INSERT INTO x SELECT * FROM t");
        match arena.stmt(id) {
            Stmt::Insert(ins) => assert!(ins.with.is_some()),
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn cte_prefixed_statement_is_insert_kind() {
        let (arena, id) = parse_one("WITH t AS (SELECT 1) INSERT INTO x SELECT * FROM t");
        assert_eq!(arena.stmt(id).kind_name(), "INSERT");
    }
}
