//! `INSERT`/`REPLACE`, `UPDATE`, `DELETE`.

use super::{full_expr, select, Parser};
use crate::ast::{
    Assignment, ConflictAction, Delete, Insert, InsertSource, OnConflict, Update, WithClause,
};
use crate::error::ParseError;
use crate::lexer::{Keyword, Punct};

pub(crate) fn parse_insert<'src>(
    p: &mut Parser<'src>,
    with: Option<WithClause<'src>>,
) -> Result<Insert<'src>, ParseError> {
    let replace = p.at_keyword(Keyword::Replace);
    if replace {
        p.expect_keyword(Keyword::Replace)?;
    } else {
        p.expect_keyword(Keyword::Insert)?;
    }
    let ignore = !replace && p.eat_keyword(Keyword::Ignore);
    p.eat_keyword(Keyword::Into);

    let table = p.parse_qualified_name()?;
    let alias = select::parse_optional_alias(p)?;
    let columns = if p.at_punct(Punct::LParen) { p.parse_paren_ident_list()? } else { Vec::new() };

    let source = parse_insert_source(p)?;

    let on_conflict = if !replace { parse_optional_upsert(p)? } else { None };

    Ok(Insert { with, table, alias, columns, source, on_conflict, ignore, replace })
}

fn parse_insert_source<'src>(p: &mut Parser<'src>) -> Result<InsertSource, ParseError> {
    if p.eat_soft_kw("default") && p.eat_soft_kw("values") {
        return Ok(InsertSource::DefaultValues);
    }
    if p.at_keyword(Keyword::Values) {
        p.expect_keyword(Keyword::Values)?;
        let mut rows = vec![parse_values_row(p)?];
        while p.eat_punct(Punct::Comma) {
            rows.push(parse_values_row(p)?);
        }
        return Ok(InsertSource::Values(rows));
    }
    let stmt = select::parse_select_or_with(p)?;
    Ok(InsertSource::Select(stmt))
}

fn parse_values_row<'src>(p: &mut Parser<'src>) -> Result<Vec<crate::arena::ExprId>, ParseError> {
    p.expect_punct(Punct::LParen)?;
    let mut row = vec![full_expr(p)?];
    while p.eat_punct(Punct::Comma) {
        row.push(full_expr(p)?);
    }
    p.expect_punct(Punct::RParen)?;
    Ok(row)
}

/// Sniffs the MySQL `ON DUPLICATE KEY UPDATE` tail and the
/// PostgreSQL/SQLite `ON CONFLICT ... DO ...` tail. Both arrive after a
/// shared `ON` keyword; `DUPLICATE`, `CONFLICT`, `DO` and `NOTHING` are not
/// reserved words, so they surface as plain identifier tokens the grammar
/// disambiguates by text.
fn parse_optional_upsert<'src>(p: &mut Parser<'src>) -> Result<Option<OnConflict<'src>>, ParseError> {
    if !p.at_keyword(Keyword::On) {
        return Ok(None);
    }
    if p.peek_is_soft_kw("duplicate") {
        p.bump(); // ON
        p.expect_soft_kw("duplicate")?;
        p.expect_keyword(Keyword::Key)?;
        p.expect_keyword(Keyword::Update)?;
        let assignments = parse_assignments(p)?;
        return Ok(Some(OnConflict {
            target: Vec::new(),
            action: ConflictAction::DoUpdate { assignments, where_clause: None },
        }));
    }
    if p.peek_is_soft_kw("conflict") {
        p.bump(); // ON
        p.expect_soft_kw("conflict")?;
        let target = if p.at_punct(Punct::LParen) { p.parse_paren_ident_list()? } else { Vec::new() };
        p.expect_soft_kw("do")?;
        let action = if p.eat_soft_kw("nothing") {
            ConflictAction::DoNothing
        } else {
            p.expect_keyword(Keyword::Update)?;
            p.expect_keyword(Keyword::Set)?;
            let assignments = parse_assignments(p)?;
            let where_clause = if p.eat_keyword(Keyword::Where) { Some(full_expr(p)?) } else { None };
            ConflictAction::DoUpdate { assignments, where_clause }
        };
        return Ok(Some(OnConflict { target, action }));
    }
    Ok(None)
}

fn parse_assignments<'src>(p: &mut Parser<'src>) -> Result<Vec<Assignment<'src>>, ParseError> {
    let mut assignments = vec![parse_assignment(p)?];
    while p.eat_punct(Punct::Comma) {
        assignments.push(parse_assignment(p)?);
    }
    Ok(assignments)
}

fn parse_assignment<'src>(p: &mut Parser<'src>) -> Result<Assignment<'src>, ParseError> {
    let column = p.parse_ident()?;
    p.expect_punct(Punct::Eq)?;
    let value = full_expr(p)?;
    Ok(Assignment { column, value })
}

pub(crate) fn parse_update<'src>(
    p: &mut Parser<'src>,
    with: Option<WithClause<'src>>,
) -> Result<Update<'src>, ParseError> {
    p.expect_keyword(Keyword::Update)?;
    let table = p.parse_qualified_name()?;
    let alias = select::parse_optional_alias(p)?;
    p.expect_keyword(Keyword::Set)?;
    let assignments = parse_assignments(p)?;
    let from = if p.eat_keyword(Keyword::From) { Some(select::parse_table_refs(p)?) } else { None };
    let where_clause = if p.eat_keyword(Keyword::Where) { Some(full_expr(p)?) } else { None };
    let order_by = select::parse_optional_order_by(p)?;
    let limit = select::parse_optional_limit(p)?;
    Ok(Update { with, table, alias, assignments, from, where_clause, order_by, limit })
}

pub(crate) fn parse_delete<'src>(
    p: &mut Parser<'src>,
    with: Option<WithClause<'src>>,
) -> Result<Delete<'src>, ParseError> {
    p.expect_keyword(Keyword::Delete)?;
    p.eat_keyword(Keyword::From);
    let table = p.parse_qualified_name()?;
    let alias = select::parse_optional_alias(p)?;
    let using = if p.eat_keyword(Keyword::Using) { Some(select::parse_table_refs(p)?) } else { None };
    let where_clause = if p.eat_keyword(Keyword::Where) { Some(full_expr(p)?) } else { None };
    let order_by = select::parse_optional_order_by(p)?;
    let limit = select::parse_optional_limit(p)?;
    Ok(Delete { with, table, alias, using, where_clause, order_by, limit })
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use crate::ast::{ConflictAction, Stmt};
    use pretty_assertions::assert_eq;

    fn parse_one(src: &'static str) -> (crate::arena::Arena<'static>, crate::arena::StmtId) {
        let mut p = Parser::new(src);
        let id = p.next().unwrap().unwrap();
        (p.into_arena(), id)
    }

    #[test]
    fn insert_values() {
        let (arena, id) = parse_one("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
        let Stmt::Insert(ins) = arena.stmt(id) else { panic!() };
        assert_eq!(ins.columns.len(), 2);
        match &ins.source {
            crate::ast::InsertSource::Values(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected Values, got {other:?}"),
        }
    }

    #[test]
    fn replace_into_sets_replace_flag() {
        let (arena, id) = parse_one("REPLACE INTO t (a) VALUES (1)");
        let Stmt::Insert(ins) = arena.stmt(id) else { panic!() };
        assert!(ins.replace);
    }

    #[test]
    fn on_duplicate_key_update() {
        let (arena, id) = parse_one("INSERT INTO t (id) VALUES (1) ON DUPLICATE KEY UPDATE id = 2");
        let Stmt::Insert(ins) = arena.stmt(id) else { panic!() };
        let oc = ins.on_conflict.as_ref().unwrap();
        assert!(matches!(oc.action, ConflictAction::DoUpdate { .. }));
    }

    #[test]
    fn on_conflict_do_nothing() {
        let (arena, id) = parse_one("INSERT INTO t (id) VALUES (1) ON CONFLICT (id) DO NOTHING");
        let Stmt::Insert(ins) = arena.stmt(id) else { panic!() };
        let oc = ins.on_conflict.as_ref().unwrap();
        assert_eq!(oc.target.len(), 1);
        assert!(matches!(oc.action, ConflictAction::DoNothing));
    }

    #[test]
    fn update_without_where_parses() {
        let (arena, id) = parse_one("UPDATE users SET active = 1");
        let Stmt::Update(u) = arena.stmt(id) else { panic!() };
        assert!(u.where_clause.is_none());
    }

    #[test]
    fn delete_without_from_keyword() {
        let (arena, id) = parse_one("DELETE logs WHERE id = 1");
        let Stmt::Delete(d) = arena.stmt(id) else { panic!() };
        assert!(d.where_clause.is_some());
    }
}
