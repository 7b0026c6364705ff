//! `CREATE`/`ALTER`/`DROP`/`TRUNCATE`, column definitions, table
//! constraints and data types.
//!
//! Object kinds the grammar doesn't model in detail (views dropped,
//! functions, procedures, triggers, and anything the dispatch in
//! `parser::mod` routes here directly, like `SET`) fall through to
//! [`parse_generic_ddl`], which only captures the raw statement text.

use super::{full_expr, select, Parser};
use crate::arena::StmtId;
use crate::ast::{
    AlterDatabase, AlterTable, AlterTableAction, ColumnDef, ColumnPosition, CreateDatabase,
    CreateIndex, CreateTable, CreateView, DataType, DropDatabase, DropIndex, DropTable,
    ForeignKeyRef, GeneratedColumn, GenericDdl, Ident, IndexColumn, RefAction, Stmt,
    TableConstraint, TableConstraintKind, TableOption, Truncate,
};
use crate::error::ParseError;
use crate::lexer::{Keyword, LiteralKind, Position, Punct, TokenKind};

pub(crate) fn parse_create<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Create)?;
    let or_replace = if p.eat_keyword(Keyword::Or) {
        p.expect_keyword(Keyword::Replace)?;
        true
    } else {
        false
    };
    let temporary = p.eat_soft_kw("temporary") || p.eat_soft_kw("temp");

    if p.eat_keyword(Keyword::Unique) {
        p.expect_keyword(Keyword::Index)?;
        return parse_create_index(p, start, true);
    }

    match p.current.kind {
        TokenKind::Keyword(Keyword::Database) => parse_create_database(p, start),
        TokenKind::Ident if p.current_is_soft_kw("schema") => parse_create_database(p, start),
        TokenKind::Keyword(Keyword::Table) => parse_create_table(p, start, temporary),
        TokenKind::Keyword(Keyword::View) => parse_create_view(p, start, or_replace),
        TokenKind::Keyword(Keyword::Index) => parse_create_index(p, start, false),
        _ => parse_generic_ddl(p, start, "CREATE"),
    }
}

fn parse_if_not_exists<'src>(p: &mut Parser<'src>) -> Result<bool, ParseError> {
    if p.eat_keyword(Keyword::If) {
        p.expect_keyword(Keyword::Not)?;
        p.expect_keyword(Keyword::Exists)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_if_exists<'src>(p: &mut Parser<'src>) -> Result<bool, ParseError> {
    if p.eat_keyword(Keyword::If) {
        p.expect_keyword(Keyword::Exists)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_create_database<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    if p.at_keyword(Keyword::Database) {
        p.bump();
    } else {
        p.expect_soft_kw("schema")?;
    }
    let if_not_exists = parse_if_not_exists(p)?;
    let name = p.parse_ident()?;
    p.skip_to_statement_end();
    Ok(p.alloc_stmt(Stmt::CreateDatabase(CreateDatabase { name, if_not_exists }), start))
}

fn parse_create_table<'src>(
    p: &mut Parser<'src>,
    start: Position,
    temporary: bool,
) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Table)?;
    let if_not_exists = parse_if_not_exists(p)?;
    let name = p.parse_qualified_name()?;

    let mut like = None;
    let mut as_select = None;
    let mut columns = Vec::new();
    let mut constraints = Vec::new();

    if p.eat_keyword(Keyword::Like) {
        like = Some(p.parse_qualified_name()?);
    } else if p.eat_punct(Punct::LParen) {
        loop {
            if is_table_constraint_start(p) {
                constraints.push(parse_table_constraint(p)?);
            } else {
                columns.push(parse_column_def(p)?);
            }
            if !p.eat_punct(Punct::Comma) {
                break;
            }
        }
        p.expect_punct(Punct::RParen)?;
    }

    let options = parse_table_options(p)?;

    if p.eat_keyword(Keyword::As) {
        as_select = Some(select::parse_select_or_with(p)?);
    }

    Ok(p.alloc_stmt(
        Stmt::CreateTable(CreateTable {
            name,
            temporary,
            if_not_exists,
            columns,
            constraints,
            options,
            as_select,
            like,
        }),
        start,
    ))
}

fn is_table_constraint_start<'src>(p: &Parser<'src>) -> bool {
    matches!(
        p.current.kind,
        TokenKind::Keyword(Keyword::Constraint | Keyword::Primary | Keyword::Unique | Keyword::Foreign | Keyword::Check)
    )
}

fn maybe_take_index_name<'src>(
    p: &mut Parser<'src>,
    name: &mut Option<Ident<'src>>,
) -> Result<(), ParseError> {
    if name.is_none() && matches!(p.current.kind, TokenKind::Ident) {
        *name = Some(p.parse_ident()?);
    }
    Ok(())
}

fn parse_table_constraint<'src>(p: &mut Parser<'src>) -> Result<TableConstraint<'src>, ParseError> {
    let mut name = if p.eat_keyword(Keyword::Constraint) { Some(p.parse_ident()?) } else { None };

    let kind = match p.current.kind {
        TokenKind::Keyword(Keyword::Primary) => {
            p.bump();
            p.expect_keyword(Keyword::Key)?;
            maybe_take_index_name(p, &mut name)?;
            TableConstraintKind::PrimaryKey(p.parse_paren_ident_list()?)
        }
        TokenKind::Keyword(Keyword::Unique) => {
            p.bump();
            p.eat_keyword(Keyword::Index);
            p.eat_keyword(Keyword::Key);
            maybe_take_index_name(p, &mut name)?;
            TableConstraintKind::Unique(p.parse_paren_ident_list()?)
        }
        TokenKind::Keyword(Keyword::Foreign) => {
            p.bump();
            p.expect_keyword(Keyword::Key)?;
            maybe_take_index_name(p, &mut name)?;
            let columns = p.parse_paren_ident_list()?;
            p.expect_keyword(Keyword::References)?;
            let reference = parse_foreign_key_ref(p)?;
            TableConstraintKind::ForeignKey { columns, reference }
        }
        TokenKind::Keyword(Keyword::Check) => {
            p.bump();
            p.expect_punct(Punct::LParen)?;
            let expr = full_expr(p)?;
            p.expect_punct(Punct::RParen)?;
            TableConstraintKind::Check(expr)
        }
        _ => return Err(p.error(format!("expected table constraint, found {}", p.describe_current()))),
    };

    let using = if p.eat_keyword(Keyword::Using) { Some(p.parse_ident()?) } else { None };
    Ok(TableConstraint { name, kind, using })
}

fn parse_foreign_key_ref<'src>(p: &mut Parser<'src>) -> Result<ForeignKeyRef<'src>, ParseError> {
    let table = p.parse_qualified_name()?;
    let columns = if p.at_punct(Punct::LParen) { p.parse_paren_ident_list()? } else { Vec::new() };
    let mut on_delete = None;
    let mut on_update = None;
    while p.eat_keyword(Keyword::On) {
        if p.eat_keyword(Keyword::Delete) {
            on_delete = Some(parse_ref_action(p)?);
        } else if p.eat_keyword(Keyword::Update) {
            on_update = Some(parse_ref_action(p)?);
        } else {
            return Err(p.error(format!("expected DELETE or UPDATE after ON, found {}", p.describe_current())));
        }
    }
    Ok(ForeignKeyRef { table, columns, on_delete, on_update })
}

fn parse_ref_action<'src>(p: &mut Parser<'src>) -> Result<RefAction, ParseError> {
    if p.eat_keyword(Keyword::Cascade) {
        return Ok(RefAction::Cascade);
    }
    if p.eat_keyword(Keyword::Restrict) {
        return Ok(RefAction::Restrict);
    }
    if p.eat_keyword(Keyword::Set) {
        return if p.eat_keyword(Keyword::Null) {
            Ok(RefAction::SetNull)
        } else {
            p.expect_keyword(Keyword::Default)?;
            Ok(RefAction::SetDefault)
        };
    }
    if p.eat_keyword(Keyword::No) {
        p.expect_soft_kw("action")?;
        return Ok(RefAction::NoAction);
    }
    Err(p.error(format!("expected referential action, found {}", p.describe_current())))
}

fn parse_column_def<'src>(p: &mut Parser<'src>) -> Result<ColumnDef<'src>, ParseError> {
    let name = p.parse_ident()?;
    let data_type = parse_data_type(p)?;

    let mut not_null = false;
    let mut default = None;
    let mut primary_key = false;
    let mut unique = false;
    let mut auto_increment = false;
    let mut generated = None;
    let mut references = None;
    let mut check = None;
    let mut collate = None;
    let mut comment = None;
    let mut on_update = None;

    loop {
        if p.eat_keyword(Keyword::Not) {
            p.expect_keyword(Keyword::Null)?;
            not_null = true;
        } else if p.eat_keyword(Keyword::Null) {
            not_null = false;
        } else if p.eat_keyword(Keyword::Default) {
            default = Some(full_expr(p)?);
        } else if p.eat_keyword(Keyword::AutoIncrement) {
            auto_increment = true;
        } else if p.eat_keyword(Keyword::Primary) {
            p.expect_keyword(Keyword::Key)?;
            primary_key = true;
        } else if p.eat_keyword(Keyword::Unique) {
            p.eat_keyword(Keyword::Key);
            unique = true;
        } else if p.eat_keyword(Keyword::Key) {
            // bare `KEY` column modifier (MySQL index-on-this-column shorthand),
            // not modeled beyond the fact that it was present.
        } else if p.eat_keyword(Keyword::References) {
            references = Some(parse_foreign_key_ref(p)?);
        } else if p.eat_keyword(Keyword::Check) {
            p.expect_punct(Punct::LParen)?;
            check = Some(full_expr(p)?);
            p.expect_punct(Punct::RParen)?;
        } else if p.eat_keyword(Keyword::Collate) {
            collate = Some(p.parse_ident()?);
        } else if p.eat_keyword(Keyword::Comment) {
            comment = Some(parse_string_literal(p)?);
        } else if p.eat_soft_kw("generated") {
            p.eat_soft_kw("always");
            p.expect_keyword(Keyword::As)?;
            p.expect_punct(Punct::LParen)?;
            let expr = full_expr(p)?;
            p.expect_punct(Punct::RParen)?;
            let stored = p.eat_soft_kw("stored");
            p.eat_soft_kw("virtual");
            generated = Some(GeneratedColumn { expr, stored });
        } else if p.eat_keyword(Keyword::On) {
            p.expect_keyword(Keyword::Update)?;
            on_update = Some(full_expr(p)?);
        } else {
            break;
        }
    }

    Ok(ColumnDef {
        name,
        data_type,
        not_null,
        default,
        primary_key,
        unique,
        auto_increment,
        generated,
        references,
        check,
        collate,
        comment,
        on_update,
    })
}

fn parse_string_literal<'src>(p: &mut Parser<'src>) -> Result<&'src str, ParseError> {
    if !matches!(p.current.kind, TokenKind::Literal(LiteralKind::SingleQuotedString)) {
        return Err(p.error(format!("expected string literal, found {}", p.describe_current())));
    }
    let tok = p.bump();
    Ok(Parser::strip_quotes(tok.raw))
}

fn parse_uint<'src>(p: &mut Parser<'src>) -> Result<u64, ParseError> {
    if !matches!(p.current.kind, TokenKind::Literal(LiteralKind::Integer)) {
        return Err(p.error(format!("expected integer, found {}", p.describe_current())));
    }
    let pos = p.current.position;
    let tok = p.bump();
    tok.raw
        .parse::<u64>()
        .map_err(|_| crate::error::ParseError::new(format!("integer literal `{}` out of range", tok.raw), pos.offset, pos.line, pos.column))
}

/// A column type name plus its parenthesized precision/scale or `ENUM`/
/// `SET` value list, any `UNSIGNED`/`ZEROFILL` modifiers, and a trailing
/// character-set/collation clause. Shared by column definitions and
/// `CAST(expr AS type)`.
pub(crate) fn parse_data_type<'src>(p: &mut Parser<'src>) -> Result<DataType<'src>, ParseError> {
    let name = match p.current.kind {
        TokenKind::Keyword(_) | TokenKind::Ident => p.bump().raw,
        _ => return Err(p.error(format!("expected type name, found {}", p.describe_current()))),
    };

    let mut precision = None;
    let mut scale = None;
    let mut values = Vec::new();

    if p.eat_punct(Punct::LParen) {
        if matches!(p.current.kind, TokenKind::Literal(LiteralKind::SingleQuotedString)) {
            values.push(parse_string_literal(p)?);
            while p.eat_punct(Punct::Comma) {
                values.push(parse_string_literal(p)?);
            }
        } else {
            precision = Some(parse_uint(p)?);
            if p.eat_punct(Punct::Comma) {
                scale = Some(parse_uint(p)?);
            }
        }
        p.expect_punct(Punct::RParen)?;
    }

    let unsigned = p.eat_soft_kw("unsigned");
    let zerofill = p.eat_soft_kw("zerofill");

    let charset = if p.eat_keyword(Keyword::Character) {
        p.expect_keyword(Keyword::Set)?;
        Some(p.parse_ident()?)
    } else if p.eat_soft_kw("charset") {
        Some(p.parse_ident()?)
    } else {
        None
    };

    let collation = if p.eat_keyword(Keyword::Collate) { Some(p.parse_ident()?) } else { None };

    Ok(DataType { name, precision, scale, unsigned, zerofill, charset, collation, values })
}

/// Trailing `CREATE TABLE`/`ALTER DATABASE` options: `ENGINE=InnoDB`,
/// `DEFAULT CHARSET=utf8mb4`, `COMMENT='...'`, `WITHOUT ROWID`. The set of
/// options is open-ended and dialect-specific, so these are captured as
/// raw name/value text rather than modeled individually.
fn parse_table_options<'src>(p: &mut Parser<'src>) -> Result<Vec<TableOption<'src>>, ParseError> {
    let mut options = Vec::new();
    loop {
        if p.eat_keyword(Keyword::Without) {
            let what = p.parse_ident()?;
            options.push(TableOption { name: "without", value: Some(what.text) });
            continue;
        }
        match p.current.kind {
            TokenKind::Ident | TokenKind::Keyword(_) if !p.at_keyword(Keyword::As) => {
                let name_tok = p.bump();
                p.eat_punct(Punct::Eq);
                let value = match p.current.kind {
                    TokenKind::Ident | TokenKind::Keyword(_) | TokenKind::Literal(_) => Some(p.bump().raw),
                    _ => None,
                };
                options.push(TableOption { name: name_tok.raw, value });
            }
            _ => break,
        }
    }
    Ok(options)
}

fn parse_create_view<'src>(
    p: &mut Parser<'src>,
    start: Position,
    or_replace: bool,
) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::View)?;
    let name = p.parse_qualified_name()?;
    let columns = if p.at_punct(Punct::LParen) { p.parse_paren_ident_list()? } else { Vec::new() };
    p.expect_keyword(Keyword::As)?;
    let query = select::parse_select_or_with(p)?;
    Ok(p.alloc_stmt(Stmt::CreateView(CreateView { name, or_replace, columns, query }), start))
}

fn parse_create_index<'src>(
    p: &mut Parser<'src>,
    start: Position,
    unique: bool,
) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Index)?;
    let if_not_exists = parse_if_not_exists(p)?;
    let name = p.parse_ident()?;
    p.expect_keyword(Keyword::On)?;
    let table = p.parse_qualified_name()?;
    p.expect_punct(Punct::LParen)?;
    let mut columns = vec![parse_index_column(p)?];
    while p.eat_punct(Punct::Comma) {
        columns.push(parse_index_column(p)?);
    }
    p.expect_punct(Punct::RParen)?;
    Ok(p.alloc_stmt(Stmt::CreateIndex(CreateIndex { name, table, unique, if_not_exists, columns }), start))
}

fn parse_index_column<'src>(p: &mut Parser<'src>) -> Result<IndexColumn<'src>, ParseError> {
    let name = p.parse_ident()?;
    let prefix_len = if p.eat_punct(Punct::LParen) {
        let n = parse_uint(p)?;
        p.expect_punct(Punct::RParen)?;
        Some(n)
    } else {
        None
    };
    let desc = if p.eat_keyword(Keyword::Desc) {
        true
    } else {
        p.eat_keyword(Keyword::Asc);
        false
    };
    Ok(IndexColumn { name, prefix_len, desc })
}

pub(crate) fn parse_alter<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Alter)?;
    match p.current.kind {
        TokenKind::Keyword(Keyword::Table) => parse_alter_table(p, start),
        TokenKind::Keyword(Keyword::Database) => parse_alter_database(p, start),
        TokenKind::Ident if p.current_is_soft_kw("schema") => parse_alter_database(p, start),
        _ => parse_generic_ddl(p, start, "ALTER"),
    }
}

fn parse_alter_table<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Table)?;
    let name = p.parse_qualified_name()?;
    let mut actions = vec![parse_alter_table_action(p)?];
    while p.eat_punct(Punct::Comma) {
        actions.push(parse_alter_table_action(p)?);
    }
    Ok(p.alloc_stmt(Stmt::AlterTable(AlterTable { name, actions }), start))
}

fn parse_alter_table_action<'src>(p: &mut Parser<'src>) -> Result<AlterTableAction<'src>, ParseError> {
    if p.eat_keyword(Keyword::Add) {
        if p.eat_keyword(Keyword::Column) {
            let column = parse_column_def(p)?;
            let position = parse_column_position(p)?;
            return Ok(AlterTableAction::AddColumn { column, position });
        }
        if matches!(p.current.kind, TokenKind::Keyword(Keyword::Constraint | Keyword::Primary | Keyword::Foreign | Keyword::Check)) {
            return Ok(AlterTableAction::AddConstraint(parse_table_constraint(p)?));
        }
        if p.at_keyword(Keyword::Unique) {
            let next = p.peek();
            let is_index =
                matches!(next.kind, TokenKind::Keyword(Keyword::Index)) || (matches!(next.kind, TokenKind::Ident) && next.raw.eq_ignore_ascii_case("key"));
            if is_index {
                p.bump(); // UNIQUE
                p.bump(); // INDEX | KEY
                let name = if matches!(p.current.kind, TokenKind::Ident) { Some(p.parse_ident()?) } else { None };
                let columns = p.parse_paren_ident_list()?;
                return Ok(AlterTableAction::AddIndex { name, columns, unique: true });
            }
            return Ok(AlterTableAction::AddConstraint(parse_table_constraint(p)?));
        }
        if p.eat_keyword(Keyword::Index) || p.eat_keyword(Keyword::Key) {
            let name = if matches!(p.current.kind, TokenKind::Ident) { Some(p.parse_ident()?) } else { None };
            let columns = p.parse_paren_ident_list()?;
            return Ok(AlterTableAction::AddIndex { name, columns, unique: false });
        }
        let column = parse_column_def(p)?;
        let position = parse_column_position(p)?;
        return Ok(AlterTableAction::AddColumn { column, position });
    }

    if p.eat_keyword(Keyword::Drop) {
        if p.eat_keyword(Keyword::Column) {
            return Ok(AlterTableAction::DropColumn { name: p.parse_ident()? });
        }
        if p.eat_keyword(Keyword::Constraint) {
            return Ok(AlterTableAction::DropConstraint { name: p.parse_ident()? });
        }
        if p.eat_keyword(Keyword::Primary) {
            p.expect_keyword(Keyword::Key)?;
            return Ok(AlterTableAction::DropConstraint { name: Ident::unquoted("PRIMARY") });
        }
        return Ok(AlterTableAction::DropColumn { name: p.parse_ident()? });
    }

    if p.eat_keyword(Keyword::Change) {
        p.eat_keyword(Keyword::Column);
        let _old_name = p.parse_ident()?;
        let column = parse_column_def(p)?;
        return Ok(AlterTableAction::ModifyColumn { column });
    }

    if p.eat_soft_kw("modify") {
        p.eat_keyword(Keyword::Column);
        let column = parse_column_def(p)?;
        return Ok(AlterTableAction::ModifyColumn { column });
    }

    if p.eat_keyword(Keyword::Rename) {
        if p.eat_keyword(Keyword::Column) {
            let from = p.parse_ident()?;
            p.expect_keyword(Keyword::To)?;
            let to = p.parse_ident()?;
            return Ok(AlterTableAction::RenameColumn { from, to });
        }
        p.eat_keyword(Keyword::To);
        let to = p.parse_qualified_name()?;
        return Ok(AlterTableAction::RenameTable { to });
    }

    Err(p.error(format!("unexpected {} in ALTER TABLE", p.describe_current())))
}

fn parse_column_position<'src>(p: &mut Parser<'src>) -> Result<Option<ColumnPosition<'src>>, ParseError> {
    if p.eat_keyword(Keyword::First) {
        return Ok(Some(ColumnPosition::First));
    }
    if p.eat_keyword(Keyword::After) {
        return Ok(Some(ColumnPosition::After(p.parse_ident()?)));
    }
    Ok(None)
}

fn parse_alter_database<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    if p.at_keyword(Keyword::Database) {
        p.bump();
    } else {
        p.expect_soft_kw("schema")?;
    }
    let name = p.parse_ident()?;
    let options = parse_table_options(p)?;
    Ok(p.alloc_stmt(Stmt::AlterDatabase(AlterDatabase { name, options }), start))
}

pub(crate) fn parse_drop<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Drop)?;
    match p.current.kind {
        TokenKind::Keyword(Keyword::Table) | TokenKind::Keyword(Keyword::Tables) => {
            p.bump();
            let if_exists = parse_if_exists(p)?;
            let mut names = vec![p.parse_qualified_name()?];
            while p.eat_punct(Punct::Comma) {
                names.push(p.parse_qualified_name()?);
            }
            let cascade = p.eat_keyword(Keyword::Cascade);
            p.eat_keyword(Keyword::Restrict);
            Ok(p.alloc_stmt(Stmt::DropTable(DropTable { names, if_exists, cascade }), start))
        }
        TokenKind::Keyword(Keyword::Index) => {
            p.bump();
            let if_exists = parse_if_exists(p)?;
            let name = p.parse_ident()?;
            let table = if p.eat_keyword(Keyword::On) { Some(p.parse_qualified_name()?) } else { None };
            Ok(p.alloc_stmt(Stmt::DropIndex(DropIndex { name, table, if_exists }), start))
        }
        TokenKind::Keyword(Keyword::Database) => {
            p.bump();
            let if_exists = parse_if_exists(p)?;
            let name = p.parse_ident()?;
            Ok(p.alloc_stmt(Stmt::DropDatabase(DropDatabase { name, if_exists }), start))
        }
        TokenKind::Ident if p.current_is_soft_kw("schema") => {
            p.bump();
            let if_exists = parse_if_exists(p)?;
            let name = p.parse_ident()?;
            Ok(p.alloc_stmt(Stmt::DropDatabase(DropDatabase { name, if_exists }), start))
        }
        _ => parse_generic_ddl(p, start, "DROP"),
    }
}

pub(crate) fn parse_truncate<'src>(p: &mut Parser<'src>, start: Position) -> Result<StmtId, ParseError> {
    p.expect_keyword(Keyword::Truncate)?;
    p.eat_keyword(Keyword::Table);
    let table = p.parse_qualified_name()?;
    Ok(p.alloc_stmt(Stmt::Truncate(Truncate { table }), start))
}

/// Catch-all for DDL the tree doesn't model in detail: `SET ...` and any
/// `CREATE`/`ALTER`/`DROP` object kind not recognized above (views,
/// functions, procedures, triggers, ...). Captures the raw source text of
/// the statement rather than a structured node; the renderer passes it
/// through verbatim outside strict mode.
pub(crate) fn parse_generic_ddl<'src>(
    p: &mut Parser<'src>,
    start: Position,
    _verb: &'static str,
) -> Result<StmtId, ParseError> {
    p.skip_to_statement_end();
    let raw = p.src[start.offset..p.current.position.offset].trim();
    Ok(p.alloc_stmt(Stmt::GenericDdl(GenericDdl { raw }), start))
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use crate::ast::{AlterTableAction, Stmt, TableConstraintKind};
    use pretty_assertions::assert_eq;

    fn parse_one(src: &'static str) -> (crate::arena::Arena<'static>, crate::arena::StmtId) {
        let mut p = Parser::new(src);
        let id = p.next().unwrap().unwrap();
        (p.into_arena(), id)
    }

    #[test]
    fn create_table_with_primary_key_and_foreign_key() {
        let (arena, id) = parse_one(
            "CREATE TABLE orders (\
                id INT PRIMARY KEY AUTO_INCREMENT, \
                customer_id INT NOT NULL, \
                FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE\
            )",
        );
        let Stmt::CreateTable(t) = arena.stmt(id) else { panic!() };
        assert_eq!(t.columns.len(), 2);
        assert!(t.columns[0].primary_key);
        assert!(t.columns[0].auto_increment);
        assert_eq!(t.constraints.len(), 1);
        assert!(matches!(t.constraints[0].kind, TableConstraintKind::ForeignKey { .. }));
    }

    #[test]
    fn create_temporary_table_sets_flag() {
        let (arena, id) = parse_one("CREATE TEMPORARY TABLE t (id INT)");
        let Stmt::CreateTable(t) = arena.stmt(id) else { panic!() };
        assert!(t.temporary);
    }

    #[test]
    fn create_table_as_select() {
        let (arena, id) = parse_one("CREATE TABLE t AS SELECT * FROM u");
        let Stmt::CreateTable(t) = arena.stmt(id) else { panic!() };
        assert!(t.as_select.is_some());
    }

    #[test]
    fn create_index_parses_columns() {
        let (arena, id) = parse_one("CREATE UNIQUE INDEX idx_name ON t (a, b DESC)");
        let Stmt::CreateIndex(idx) = arena.stmt(id) else { panic!() };
        assert!(idx.unique);
        assert_eq!(idx.columns.len(), 2);
        assert!(idx.columns[1].desc);
    }

    #[test]
    fn alter_table_add_column() {
        let (arena, id) = parse_one("ALTER TABLE t ADD COLUMN age INT NOT NULL");
        let Stmt::AlterTable(alt) = arena.stmt(id) else { panic!() };
        assert!(matches!(alt.actions[0], AlterTableAction::AddColumn { .. }));
    }

    #[test]
    fn alter_table_rename_to() {
        let (arena, id) = parse_one("ALTER TABLE t RENAME TO u");
        let Stmt::AlterTable(alt) = arena.stmt(id) else { panic!() };
        assert!(matches!(&alt.actions[0], AlterTableAction::RenameTable { to } if to.last().text == "u"));
    }

    #[test]
    fn drop_table_if_exists_cascade() {
        let (arena, id) = parse_one("DROP TABLE IF EXISTS t, u CASCADE");
        let Stmt::DropTable(d) = arena.stmt(id) else { panic!() };
        assert!(d.if_exists);
        assert!(d.cascade);
        assert_eq!(d.names.len(), 2);
    }

    #[test]
    fn drop_view_falls_back_to_generic_ddl() {
        let (arena, id) = parse_one("DROP VIEW IF EXISTS v");
        assert_eq!(arena.stmt(id).kind_name(), "DDL");
    }

    #[test]
    fn set_statement_is_generic_ddl() {
        let (arena, id) = parse_one("SET autocommit = 0");
        let Stmt::GenericDdl(g) = arena.stmt(id) else { panic!() };
        assert_eq!(g.raw, "SET autocommit = 0");
    }

    #[test]
    fn truncate_table() {
        let (arena, id) = parse_one("TRUNCATE TABLE logs");
        assert_eq!(arena.stmt(id).kind_name(), "TRUNCATE");
    }
}
