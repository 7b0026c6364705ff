//! Static analysis over a parsed tree.
//!
//! A flat collection of independent rule objects is consulted against the
//! tree and every match becomes one reported result. Rules only ever
//! *report*, never rewrite, so a `Vec<Box<dyn Rule>>` walked in full on
//! every call is simpler than a keyed registry and carries no lookup cost
//! worth paying for.

use crate::arena::{Arena, ExprId, StmtId, TableRefId};
use crate::ast::*;
use crate::lexer::Position;
use crate::render::Dialect;

/// One static-analysis finding: a stable `code`, a human-readable
/// `message`, and the position of the statement it was raised against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: &'static str,
    pub message: String,
    pub position: Position,
}

/// A single risky-pattern or portability rule. Each rule inspects one
/// statement at a time; `analyze` drives every rule over every statement.
trait Rule {
    fn check(&self, arena: &Arena, stmt: StmtId, dialect: Dialect, out: &mut Vec<Finding>);
}

fn registry() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SelectStar),
        Box::new(LikeLeadingWildcard),
        Box::new(UpdateWithoutWhere),
        Box::new(DeleteWithoutWhere),
        Box::new(FunctionDialectRewrite),
        Box::new(InsertWithoutColumnList),
        Box::new(CartesianJoin),
    ]
}

/// Walks `stmts` through every registered rule against `dialect` (the
/// dialect the analysis is being run in service of, e.g. the render target
/// a `FUNCTION_DIALECT_REWRITE` finding is relative to) and collects every
/// finding raised, in statement order.
pub fn analyze(arena: &Arena, stmts: &[StmtId], dialect: Dialect) -> Vec<Finding> {
    let rules = registry();
    let mut findings = Vec::new();
    for &id in stmts {
        for rule in &rules {
            rule.check(arena, id, dialect, &mut findings);
        }
    }
    findings
}

fn push(out: &mut Vec<Finding>, arena: &Arena, stmt: StmtId, code: &'static str, message: impl Into<String>) {
    out.push(Finding { code, message: message.into(), position: arena.stmt_position(stmt) });
}

/// `SELECT *`/`t.*` in a `SELECT` column list.
struct SelectStar;

impl Rule for SelectStar {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        let Stmt::Select(s) = arena.stmt(id) else { return };
        for core in select_cores(s) {
            for col in &core.columns {
                if matches!(arena.expr(col.expr), Expr::Star | Expr::QualifiedStar(_)) {
                    push(out, arena, id, "SELECT_STAR", "selecting all columns defeats narrow projection");
                }
            }
        }
    }
}

/// `LIKE 'prefix%'` style patterns render fine, but a pattern beginning
/// with a wildcard (`LIKE '%suffix'`) cannot use an index.
struct LikeLeadingWildcard;

impl Rule for LikeLeadingWildcard {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        walk_stmt_exprs(arena, id, &mut |expr_id| {
            if let Expr::Like { pattern, .. } = arena.expr(expr_id) {
                if let Expr::StringLiteral(raw) = arena.expr(*pattern) {
                    if pattern_has_leading_wildcard(raw) {
                        push(
                            out,
                            arena,
                            id,
                            "LIKE_LEADING_WILDCARD",
                            "LIKE pattern starts with a wildcard and cannot use an index",
                        );
                    }
                }
            }
        });
    }
}

fn pattern_has_leading_wildcard(raw: &str) -> bool {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
    matches!(inner.as_bytes().first(), Some(b'%') | Some(b'_'))
}

/// An `UPDATE` with no `WHERE` clause touches every row in the table.
struct UpdateWithoutWhere;

impl Rule for UpdateWithoutWhere {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        if let Stmt::Update(u) = arena.stmt(id) {
            if u.where_clause.is_none() {
                push(out, arena, id, "UPDATE_WITHOUT_WHERE", "UPDATE has no WHERE clause");
            }
        }
    }
}

/// A `DELETE` with no `WHERE` clause removes every row in the table.
struct DeleteWithoutWhere;

impl Rule for DeleteWithoutWhere {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        if let Stmt::Delete(d) = arena.stmt(id) {
            if d.where_clause.is_none() {
                push(out, arena, id, "DELETE_WITHOUT_WHERE", "DELETE has no WHERE clause");
            }
        }
    }
}

/// `IFNULL`/`COALESCE` calls the renderer would rewrite when targeting a
/// dialect other than the one that spells it natively.
struct FunctionDialectRewrite;

impl Rule for FunctionDialectRewrite {
    fn check(&self, arena: &Arena, id: StmtId, dialect: Dialect, out: &mut Vec<Finding>) {
        walk_stmt_exprs(arena, id, &mut |expr_id| {
            let Expr::FuncCall { name, .. } = arena.expr(expr_id) else { return };
            if name.parts.len() != 1 {
                return;
            }
            let text = name.parts[0].text;
            let is_mysql_spelling = text.eq_ignore_ascii_case("ifnull");
            let is_standard_spelling = text.eq_ignore_ascii_case("coalesce");
            if !is_mysql_spelling && !is_standard_spelling {
                return;
            }
            let rewrites = match dialect {
                Dialect::MySql => is_standard_spelling,
                Dialect::Postgres | Dialect::Sqlite => is_mysql_spelling,
            };
            if rewrites {
                push(
                    out,
                    arena,
                    id,
                    "FUNCTION_DIALECT_REWRITE",
                    format!("{text} is rewritten when rendered for the target dialect"),
                );
            }
        });
    }
}

/// An `INSERT` with no explicit column list is fragile against future
/// schema changes.
struct InsertWithoutColumnList;

impl Rule for InsertWithoutColumnList {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        if let Stmt::Insert(ins) = arena.stmt(id) {
            if ins.columns.is_empty() && !matches!(ins.source, InsertSource::DefaultValues) {
                push(
                    out,
                    arena,
                    id,
                    "INSERT_WITHOUT_COLUMN_LIST",
                    "INSERT has no explicit column list",
                );
            }
        }
    }
}

/// A cross join with no join predicate anywhere: either an explicit
/// `CROSS JOIN`, or a comma-separated `FROM` list, which this parser
/// always represents as a `Cross` join node.
struct CartesianJoin;

impl Rule for CartesianJoin {
    fn check(&self, arena: &Arena, id: StmtId, _dialect: Dialect, out: &mut Vec<Finding>) {
        let Stmt::Select(s) = arena.stmt(id) else { return };
        for core in select_cores(s) {
            if let Some(from) = core.from {
                if table_ref_has_cartesian_join(arena, from) {
                    push(
                        out,
                        arena,
                        id,
                        "CARTESIAN_JOIN",
                        "cross join has no ON/USING predicate",
                    );
                }
            }
        }
    }
}

fn table_ref_has_cartesian_join(arena: &Arena, id: TableRefId) -> bool {
    match arena.table_ref(id) {
        TableRef::Named { .. } | TableRef::Subquery { .. } => false,
        TableRef::Join { left, right, kind, on, using, .. } => {
            let this_is_cartesian = *kind == JoinKind::Cross && on.is_none() && using.is_empty();
            this_is_cartesian
                || table_ref_has_cartesian_join(arena, *left)
                || table_ref_has_cartesian_join(arena, *right)
        }
    }
}

/// Every `SelectCore` in a statement, including every arm of a
/// `UNION`/`INTERSECT`/`EXCEPT` chain.
fn select_cores<'a, 'src>(s: &'a Select<'src>) -> impl Iterator<Item = &'a SelectCore<'src>> {
    std::iter::once(&s.core).chain(s.set_ops.iter().map(|link| &link.core))
}

/// Visits every expression reachable from statement `id`: column list,
/// WHERE/HAVING/GROUP BY, ON clauses in joins, and recursively into
/// subqueries and CTEs. Shallow by design: it does not attempt full
/// semantic scoping, just enough reach to find the expression shapes the
/// rules above look for.
fn walk_stmt_exprs(arena: &Arena, id: StmtId, f: &mut dyn FnMut(ExprId)) {
    match arena.stmt(id) {
        Stmt::Select(s) => {
            for core in select_cores(s) {
                for col in &core.columns {
                    walk_expr(arena, col.expr, f);
                }
                if let Some(from) = core.from {
                    walk_table_ref(arena, from, f);
                }
                if let Some(w) = core.where_clause {
                    walk_expr(arena, w, f);
                }
                for g in &core.group_by {
                    walk_expr(arena, *g, f);
                }
                if let Some(h) = core.having {
                    walk_expr(arena, h, f);
                }
            }
            for item in &s.order_by {
                walk_expr(arena, item.expr, f);
            }
            walk_with(arena, &s.with, f);
        }
        Stmt::Insert(ins) => {
            match &ins.source {
                InsertSource::Values(rows) => {
                    for row in rows {
                        for &e in row {
                            walk_expr(arena, e, f);
                        }
                    }
                }
                InsertSource::Select(stmt) => walk_stmt_exprs(arena, *stmt, f),
                InsertSource::DefaultValues => {}
            }
            if let Some(oc) = &ins.on_conflict {
                if let ConflictAction::DoUpdate { assignments, where_clause } = &oc.action {
                    for a in assignments {
                        walk_expr(arena, a.value, f);
                    }
                    if let Some(w) = where_clause {
                        walk_expr(arena, *w, f);
                    }
                }
            }
            walk_with(arena, &ins.with, f);
        }
        Stmt::Update(u) => {
            for a in &u.assignments {
                walk_expr(arena, a.value, f);
            }
            if let Some(from) = u.from {
                walk_table_ref(arena, from, f);
            }
            if let Some(w) = u.where_clause {
                walk_expr(arena, w, f);
            }
            walk_with(arena, &u.with, f);
        }
        Stmt::Delete(d) => {
            if let Some(using) = d.using {
                walk_table_ref(arena, using, f);
            }
            if let Some(w) = d.where_clause {
                walk_expr(arena, w, f);
            }
            walk_with(arena, &d.with, f);
        }
        Stmt::CreateView(v) => walk_stmt_exprs(arena, v.query, f),
        Stmt::Explain(e) => walk_stmt_exprs(arena, e.stmt, f),
        _ => {}
    }
}

fn walk_with(arena: &Arena, with: &Option<WithClause>, f: &mut dyn FnMut(ExprId)) {
    let Some(with) = with else { return };
    for cte in &with.ctes {
        walk_stmt_exprs(arena, cte.stmt, f);
    }
}

fn walk_table_ref(arena: &Arena, id: TableRefId, f: &mut dyn FnMut(ExprId)) {
    match arena.table_ref(id) {
        TableRef::Named { .. } => {}
        TableRef::Subquery { stmt, .. } => walk_stmt_exprs(arena, *stmt, f),
        TableRef::Join { left, right, on, .. } => {
            walk_table_ref(arena, *left, f);
            walk_table_ref(arena, *right, f);
            if let Some(on) = on {
                walk_expr(arena, *on, f);
            }
        }
    }
}

/// Visits `id` and every expression nested under it, including subqueries
/// reached through `IN`/`EXISTS`/scalar-subquery positions.
fn walk_expr(arena: &Arena, id: ExprId, f: &mut dyn FnMut(ExprId)) {
    f(id);
    match arena.expr(id) {
        Expr::Paren(inner) => walk_expr(arena, *inner, f),
        Expr::Unary { expr, .. } => walk_expr(arena, *expr, f),
        Expr::Binary { lhs, rhs, .. } => {
            walk_expr(arena, *lhs, f);
            walk_expr(arena, *rhs, f);
        }
        Expr::FuncCall { args, .. } => {
            for &a in args {
                walk_expr(arena, a, f);
            }
        }
        Expr::Case { operand, whens, or_else } => {
            if let Some(operand) = operand {
                walk_expr(arena, *operand, f);
            }
            for (cond, result) in whens {
                walk_expr(arena, *cond, f);
                walk_expr(arena, *result, f);
            }
            if let Some(or_else) = or_else {
                walk_expr(arena, *or_else, f);
            }
        }
        Expr::Cast { expr, .. } => walk_expr(arena, *expr, f),
        Expr::Between { expr, low, high, .. } => {
            walk_expr(arena, *expr, f);
            walk_expr(arena, *low, f);
            walk_expr(arena, *high, f);
        }
        Expr::InList { expr, list, .. } => {
            walk_expr(arena, *expr, f);
            for &item in list {
                walk_expr(arena, item, f);
            }
        }
        Expr::InSubquery { expr, subquery, .. } => {
            walk_expr(arena, *expr, f);
            walk_stmt_exprs(arena, *subquery, f);
        }
        Expr::Like { expr, pattern, escape, .. } => {
            walk_expr(arena, *expr, f);
            walk_expr(arena, *pattern, f);
            if let Some(escape) = escape {
                walk_expr(arena, *escape, f);
            }
        }
        Expr::IsNull { expr, .. } => walk_expr(arena, *expr, f),
        Expr::Exists { subquery } => walk_stmt_exprs(arena, *subquery, f),
        Expr::Subquery(stmt) => walk_stmt_exprs(arena, *stmt, f),
        Expr::Ident(_)
        | Expr::QualifiedIdent(_)
        | Expr::Star
        | Expr::QualifiedStar(_)
        | Expr::IntegerLiteral(_)
        | Expr::FloatLiteral(_)
        | Expr::StringLiteral(_)
        | Expr::HexLiteral(_)
        | Expr::BitLiteral(_)
        | Expr::BoolLiteral(_)
        | Expr::Null
        | Expr::Param(_)
        | Expr::Interval { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn findings(src: &str, dialect: Dialect) -> Vec<&'static str> {
        let (arena, stmts) = crate::parse_all(src).unwrap();
        analyze(&arena, &stmts, dialect).into_iter().map(|f| f.code).collect()
    }

    #[test]
    fn select_star_is_flagged() {
        assert_eq!(findings("SELECT * FROM t", Dialect::Postgres), vec!["SELECT_STAR"]);
    }

    #[test]
    fn qualified_star_is_flagged() {
        assert_eq!(findings("SELECT t.* FROM t", Dialect::Postgres), vec!["SELECT_STAR"]);
    }

    #[test]
    fn narrow_projection_is_not_flagged() {
        assert!(findings("SELECT a, b FROM t", Dialect::Postgres).is_empty());
    }

    #[test]
    fn leading_wildcard_like_is_flagged() {
        let codes = findings("SELECT * FROM t WHERE name LIKE '%smith'", Dialect::Postgres);
        assert!(codes.contains(&"LIKE_LEADING_WILDCARD"));
    }

    #[test]
    fn trailing_wildcard_like_is_not_flagged() {
        let codes = findings("SELECT a FROM t WHERE name LIKE 'smith%'", Dialect::Postgres);
        assert!(!codes.contains(&"LIKE_LEADING_WILDCARD"));
    }

    #[test]
    fn update_without_where_is_flagged() {
        assert_eq!(findings("UPDATE t SET a = 1", Dialect::Postgres), vec!["UPDATE_WITHOUT_WHERE"]);
    }

    #[test]
    fn update_with_where_is_not_flagged() {
        assert!(findings("UPDATE t SET a = 1 WHERE id = 1", Dialect::Postgres).is_empty());
    }

    #[test]
    fn delete_without_where_is_flagged() {
        assert_eq!(findings("DELETE FROM t", Dialect::Postgres), vec!["DELETE_WITHOUT_WHERE"]);
    }

    #[test]
    fn ifnull_flagged_for_postgres_target() {
        let codes = findings("SELECT IFNULL(a, 1) FROM t", Dialect::Postgres);
        assert!(codes.contains(&"FUNCTION_DIALECT_REWRITE"));
    }

    #[test]
    fn coalesce_flagged_for_mysql_target() {
        let codes = findings("SELECT COALESCE(a, 1) FROM t", Dialect::MySql);
        assert!(codes.contains(&"FUNCTION_DIALECT_REWRITE"));
    }

    #[test]
    fn ifnull_not_flagged_for_mysql_target() {
        let codes = findings("SELECT IFNULL(a, 1) FROM t", Dialect::MySql);
        assert!(!codes.contains(&"FUNCTION_DIALECT_REWRITE"));
    }

    #[test]
    fn insert_without_column_list_is_flagged() {
        let codes = findings("INSERT INTO t VALUES (1, 2)", Dialect::Postgres);
        assert!(codes.contains(&"INSERT_WITHOUT_COLUMN_LIST"));
    }

    #[test]
    fn insert_with_column_list_is_not_flagged() {
        let codes = findings("INSERT INTO t (a, b) VALUES (1, 2)", Dialect::Postgres);
        assert!(!codes.contains(&"INSERT_WITHOUT_COLUMN_LIST"));
    }

    #[test]
    fn comma_join_is_flagged_as_cartesian() {
        let codes = findings("SELECT * FROM a, b", Dialect::Postgres);
        assert!(codes.contains(&"CARTESIAN_JOIN"));
    }

    #[test]
    fn explicit_cross_join_is_flagged() {
        let codes = findings("SELECT * FROM a CROSS JOIN b", Dialect::Postgres);
        assert!(codes.contains(&"CARTESIAN_JOIN"));
    }

    #[test]
    fn inner_join_with_on_is_not_flagged_as_cartesian() {
        let codes = findings("SELECT * FROM a JOIN b ON a.id = b.id", Dialect::Postgres);
        assert!(!codes.contains(&"CARTESIAN_JOIN"));
    }

    #[test]
    fn finding_carries_statement_position() {
        let (arena, stmts) = crate::parse_all("SELECT * FROM t").unwrap();
        let findings = analyze(&arena, &stmts, Dialect::Postgres);
        assert_eq!(findings[0].position, arena.stmt_position(stmts[0]));
    }
}
