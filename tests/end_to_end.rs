//! End-to-end scenarios exercising the full parse → analyze/render pipeline
//! against literal SQL inputs.

use pretty_assertions::assert_eq;
use sql_frontend::render::{Dialect, Options};
use sql_frontend::{analyze, ast, parse_all, parse_one, render};

#[test]
fn risky_pattern_analysis() {
    let src = "SELECT * FROM users WHERE name LIKE '%abc'; \
               UPDATE users SET active = 1; \
               DELETE FROM logs;";
    let (arena, stmts) = parse_all(src).unwrap();
    let codes: Vec<&str> = analyze(&arena, &stmts, Dialect::MySql).into_iter().map(|f| f.code).collect();

    for expected in ["SELECT_STAR", "LIKE_LEADING_WILDCARD", "UPDATE_WITHOUT_WHERE", "DELETE_WITHOUT_WHERE"] {
        assert!(codes.contains(&expected), "missing {expected} in {codes:?}");
    }
}

#[test]
fn dialect_function_rewrite() {
    let (arena, stmts) = parse_all("SELECT IFNULL(name, 'x') FROM users").unwrap();
    let findings = analyze(&arena, &stmts, Dialect::Postgres);
    assert!(findings.iter().any(|f| f.code == "FUNCTION_DIALECT_REWRITE"));
}

#[test]
fn upsert_dialect_translation() {
    let src = "INSERT INTO users (id, name) VALUES (1, IFNULL(:name, 'x')) \
               ON DUPLICATE KEY UPDATE name = IFNULL(:name, name)";
    let (arena, stmts) = parse_all(src).unwrap();
    let rendered = render(&arena, &stmts, Options::new(Dialect::Postgres)).unwrap();
    assert_eq!(
        rendered,
        "INSERT INTO users (id, name) VALUES (1, COALESCE($1, 'x')) \
         ON CONFLICT (id) DO UPDATE SET name = COALESCE($2, name);"
    );
}

#[test]
fn json_operator_parse() {
    let src = "SELECT payload->>'user' FROM events \
               WHERE payload @> '{\"a\":1}' AND payload ?| '{a,b}'";
    let (arena, stmts) = parse_all(src).unwrap();
    assert_eq!(stmts.len(), 1);

    let ast::Stmt::Select(select) = arena.stmt(stmts[0]) else { panic!("expected SELECT") };
    let col = &select.core.columns[0];
    assert!(matches!(
        arena.expr(col.expr),
        ast::Expr::Binary { op: ast::BinOp::JsonArrowText, .. }
    ));

    let where_clause = select.core.where_clause.expect("WHERE clause");
    let ast::Expr::Binary { op: ast::BinOp::And, lhs, rhs } = arena.expr(where_clause) else {
        panic!("expected AND at top of WHERE clause")
    };
    assert!(matches!(arena.expr(*lhs), ast::Expr::Binary { op: ast::BinOp::JsonContains, .. }));
    assert!(matches!(arena.expr(*rhs), ast::Expr::Binary { op: ast::BinOp::JsonExistsAny, .. }));
}

#[test]
fn parse_error_reporting() {
    let err = parse_one("SELECT FROM").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.message.to_ascii_uppercase().contains("FROM"));
}

#[test]
fn cte_prefixed_statement_routing() {
    let (arena, id) = parse_one("WITH t AS (SELECT 1) INSERT INTO x SELECT * FROM t").unwrap();
    let ast::Stmt::Insert(insert) = arena.stmt(id) else { panic!("expected INSERT") };
    assert!(insert.with.is_some());
}

#[test]
fn statements_separated_by_arbitrary_semicolons() {
    let (_, stmts) = parse_all(";;SELECT 1;; SELECT 2;;;").unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn limit_offset_and_limit_comma_form_are_equivalent() {
    let (arena_a, id_a) = parse_one("SELECT a FROM t LIMIT 5 OFFSET 10").unwrap();
    let (arena_b, id_b) = parse_one("SELECT a FROM t LIMIT 10, 5").unwrap();

    let ast::Stmt::Select(a) = arena_a.stmt(id_a) else { panic!() };
    let ast::Stmt::Select(b) = arena_b.stmt(id_b) else { panic!() };
    let limit_a = a.limit.unwrap();
    let limit_b = b.limit.unwrap();

    assert_eq!(arena_a.expr(limit_a.limit), arena_b.expr(limit_b.limit));
    assert_eq!(arena_a.expr(limit_a.offset.unwrap()), arena_b.expr(limit_b.offset.unwrap()));
}

#[test]
fn bare_trailing_not_is_a_unary_operator() {
    let (arena, id) = parse_one("SELECT NOT a FROM t").unwrap();
    let ast::Stmt::Select(s) = arena.stmt(id) else { panic!() };
    assert!(matches!(arena.expr(s.core.columns[0].expr), ast::Expr::Unary { op: ast::UnaryOp::Not, .. }));
}

#[test]
fn not_like_parses_as_negated_like_not_as_unary_then_like() {
    let (arena, id) = parse_one("SELECT a FROM t WHERE a NOT LIKE 'x%'").unwrap();
    let ast::Stmt::Select(s) = arena.stmt(id) else { panic!() };
    let where_clause = s.core.where_clause.unwrap();
    assert!(matches!(arena.expr(where_clause), ast::Expr::Like { negated: true, .. }));
}

#[test]
fn dialect_render_determinism_across_statement_kinds() {
    let src = "CREATE TABLE t (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(32) UNSIGNED)";
    let (arena, stmts) = parse_all(src).unwrap();
    let once = render(&arena, &stmts, Options::new(Dialect::Sqlite)).unwrap();
    let twice = render(&arena, &stmts, Options::new(Dialect::Sqlite)).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn parse_then_render_round_trip_same_dialect() {
    let src = "SELECT a, b FROM t WHERE a = 1 AND b = 2 ORDER BY a DESC LIMIT 10";
    let (arena, stmts) = parse_all(src).unwrap();
    let rendered = render(&arena, &stmts, Options::new(Dialect::MySql)).unwrap();

    let (arena2, stmts2) = parse_all(&rendered).unwrap();
    let rendered_again = render(&arena2, &stmts2, Options::new(Dialect::MySql)).unwrap();
    assert_eq!(rendered, rendered_again);
}
