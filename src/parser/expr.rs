//! Pratt expression parser.
//!
//! One function, [`parse_expr`], recursing on an integer precedence floor,
//! the standard top-down operator-precedence pattern (§9 design notes).
//! Mixfix keyword operators (`IS NULL`, `LIKE`, `BETWEEN`, `IN`) are
//! special-cased inside the infix loop before falling through to the
//! generic binary-operator path, exactly as the design notes prescribe.

use super::{bp, Parser};
use crate::arena::ExprId;
use crate::ast::{BinOp, Expr, Param, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Keyword, LiteralKind, Punct, TokenKind};

/// Parses a complete expression at the lowest precedence floor (`OR`),
/// wrapping the floor-parameterized internal entry point.
pub(crate) fn full_expr<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    parse_expr(p, bp::OR)
}

pub(crate) fn parse_expr<'src>(p: &mut Parser<'src>, min_bp: u8) -> Result<ExprId, ParseError> {
    let mut lhs = parse_prefix(p)?;

    loop {
        let Some((op, op_bp)) = infix(p) else { break };
        if op_bp < min_bp {
            break;
        }

        lhs = match op {
            Infix::Bin(bin_op) => {
                p.bump();
                let rhs = parse_expr(p, op_bp + 1)?;
                p.alloc_expr(Expr::Binary { op: bin_op, lhs, rhs })
            }
            Infix::IsNull => {
                p.bump(); // IS
                let negated = p.eat_keyword(Keyword::Not);
                p.expect_keyword(Keyword::Null)?;
                p.alloc_expr(Expr::IsNull { expr: lhs, negated })
            }
            Infix::Like { negated } => {
                if negated {
                    p.bump(); // NOT
                }
                p.bump(); // LIKE
                let pattern = parse_expr(p, bp::MUL)?;
                let escape = if p.eat_keyword(Keyword::Escape) { Some(parse_expr(p, bp::MUL)?) } else { None };
                p.alloc_expr(Expr::Like { expr: lhs, negated, pattern, escape })
            }
            Infix::Between { negated } => {
                if negated {
                    p.bump(); // NOT
                }
                p.bump(); // BETWEEN
                let low = parse_expr(p, bp::BIT_OR)?;
                p.expect_keyword(Keyword::And)?;
                let high = parse_expr(p, bp::BIT_OR)?;
                p.alloc_expr(Expr::Between { expr: lhs, negated, low, high })
            }
            Infix::In { negated } => {
                if negated {
                    p.bump(); // NOT
                }
                p.bump(); // IN
                p.expect_punct(Punct::LParen)?;
                if matches!(p.current.kind, TokenKind::Keyword(Keyword::Select) | TokenKind::Keyword(Keyword::With)) {
                    let subquery = super::select::parse_select_or_with(p)?;
                    p.expect_punct(Punct::RParen)?;
                    p.alloc_expr(Expr::InSubquery { expr: lhs, negated, subquery })
                } else {
                    let mut list = vec![full_expr(p)?];
                    while p.eat_punct(Punct::Comma) {
                        list.push(full_expr(p)?);
                    }
                    p.expect_punct(Punct::RParen)?;
                    p.alloc_expr(Expr::InList { expr: lhs, negated, list })
                }
            }
        };
    }

    Ok(lhs)
}

enum Infix {
    Bin(BinOp),
    IsNull,
    Like { negated: bool },
    Between { negated: bool },
    In { negated: bool },
}

/// Looks at (but does not consume) the current token and decides whether
/// it continues the expression being built as an infix/postfix operator,
/// and at what binding power. `NOT` requires one token of lookahead to
/// tell `NOT LIKE`/`NOT IN`/`NOT BETWEEN` apart from a bare unary `NOT`
/// that terminates this expression.
fn infix<'src>(p: &mut Parser<'src>) -> Option<(Infix, u8)> {
    use Punct::*;
    match p.current.kind {
        TokenKind::Keyword(Keyword::Or) => Some((Infix::Bin(BinOp::Or), bp::OR)),
        TokenKind::Keyword(Keyword::And) => Some((Infix::Bin(BinOp::And), bp::AND)),
        TokenKind::Punct(AmpAmp) => Some((Infix::Bin(BinOp::And), bp::AND)),
        TokenKind::Keyword(Keyword::Is) => Some((Infix::IsNull, bp::CMP)),
        TokenKind::Keyword(Keyword::Like) => Some((Infix::Like { negated: false }, bp::CMP)),
        TokenKind::Keyword(Keyword::Between) => Some((Infix::Between { negated: false }, bp::CMP)),
        TokenKind::Keyword(Keyword::In) => Some((Infix::In { negated: false }, bp::CMP)),
        TokenKind::Keyword(Keyword::Not) => match p.peek().kind {
            TokenKind::Keyword(Keyword::Like) => Some((Infix::Like { negated: true }, bp::CMP)),
            TokenKind::Keyword(Keyword::Between) => Some((Infix::Between { negated: true }, bp::CMP)),
            TokenKind::Keyword(Keyword::In) => Some((Infix::In { negated: true }, bp::CMP)),
            _ => None,
        },
        TokenKind::Punct(Eq) => Some((Infix::Bin(BinOp::Eq), bp::CMP)),
        TokenKind::Punct(BangEq) | TokenKind::Punct(LtGt) => Some((Infix::Bin(BinOp::NotEq), bp::CMP)),
        TokenKind::Punct(Lt) => Some((Infix::Bin(BinOp::Lt), bp::CMP)),
        TokenKind::Punct(Gt) => Some((Infix::Bin(BinOp::Gt), bp::CMP)),
        TokenKind::Punct(Le) => Some((Infix::Bin(BinOp::Le), bp::CMP)),
        TokenKind::Punct(Ge) => Some((Infix::Bin(BinOp::Ge), bp::CMP)),
        TokenKind::Punct(AtArrow) => Some((Infix::Bin(BinOp::JsonContains), bp::CMP)),
        TokenKind::Punct(ArrowAt) => Some((Infix::Bin(BinOp::JsonContainedBy), bp::CMP)),
        TokenKind::Literal(LiteralKind::QMarkParam) => Some((Infix::Bin(BinOp::JsonExists), bp::CMP)),
        TokenKind::Punct(QPipe) => Some((Infix::Bin(BinOp::JsonExistsAny), bp::CMP)),
        TokenKind::Punct(QAmp) => Some((Infix::Bin(BinOp::JsonExistsAll), bp::CMP)),
        TokenKind::Punct(Pipe) => Some((Infix::Bin(BinOp::BitOr), bp::BIT_OR)),
        TokenKind::Punct(Caret) => Some((Infix::Bin(BinOp::BitXor), bp::BIT_OR)),
        TokenKind::Punct(Amp) => Some((Infix::Bin(BinOp::BitAnd), bp::BIT_AND)),
        TokenKind::Punct(LShift) => Some((Infix::Bin(BinOp::Shl), bp::SHIFT)),
        TokenKind::Punct(RShift) => Some((Infix::Bin(BinOp::Shr), bp::SHIFT)),
        TokenKind::Punct(Plus) => Some((Infix::Bin(BinOp::Add), bp::ADD)),
        TokenKind::Punct(Minus) => Some((Infix::Bin(BinOp::Sub), bp::ADD)),
        TokenKind::Punct(PipePipe) => Some((Infix::Bin(BinOp::Concat), bp::ADD)),
        TokenKind::Punct(Star) => Some((Infix::Bin(BinOp::Mul), bp::MUL)),
        TokenKind::Punct(Slash) => Some((Infix::Bin(BinOp::Div), bp::MUL)),
        TokenKind::Punct(Percent) => Some((Infix::Bin(BinOp::Mod), bp::MUL)),
        TokenKind::Punct(Arrow) => Some((Infix::Bin(BinOp::JsonArrow), bp::JSON_POSTFIX)),
        TokenKind::Punct(Arrow2) => Some((Infix::Bin(BinOp::JsonArrowText), bp::JSON_POSTFIX)),
        TokenKind::Punct(HashArrow) => Some((Infix::Bin(BinOp::JsonHashArrow), bp::JSON_POSTFIX)),
        TokenKind::Punct(HashArrow2) => Some((Infix::Bin(BinOp::JsonHashArrowText), bp::JSON_POSTFIX)),
        _ => None,
    }
}

/// Parses a primary expression or a prefix operator applied to one:
/// everything the infix loop in [`parse_expr`] cannot itself start with.
fn parse_prefix<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    match p.current.kind {
        TokenKind::Keyword(Keyword::Not) => {
            p.bump();
            let expr = parse_expr(p, bp::CMP)?;
            Ok(p.alloc_expr(Expr::Unary { op: UnaryOp::Not, expr }))
        }
        TokenKind::Punct(Punct::Minus) => {
            p.bump();
            let expr = parse_expr(p, bp::UNARY)?;
            Ok(p.alloc_expr(Expr::Unary { op: UnaryOp::Neg, expr }))
        }
        TokenKind::Punct(Punct::Plus) => {
            p.bump();
            let expr = parse_expr(p, bp::UNARY)?;
            Ok(p.alloc_expr(Expr::Unary { op: UnaryOp::Pos, expr }))
        }
        TokenKind::Punct(Punct::Tilde) => {
            p.bump();
            let expr = parse_expr(p, bp::UNARY)?;
            Ok(p.alloc_expr(Expr::Unary { op: UnaryOp::BitNot, expr }))
        }
        TokenKind::Keyword(Keyword::Case) => parse_case(p),
        TokenKind::Keyword(Keyword::Cast) => parse_cast(p),
        TokenKind::Keyword(Keyword::Exists) => parse_exists(p),
        TokenKind::Keyword(Keyword::Null) => {
            p.bump();
            Ok(p.alloc_expr(Expr::Null))
        }
        TokenKind::Keyword(Keyword::True) => {
            p.bump();
            Ok(p.alloc_expr(Expr::BoolLiteral(true)))
        }
        TokenKind::Keyword(Keyword::False) => {
            p.bump();
            Ok(p.alloc_expr(Expr::BoolLiteral(false)))
        }
        TokenKind::Literal(LiteralKind::Integer) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::IntegerLiteral(tok.raw)))
        }
        TokenKind::Literal(LiteralKind::Float) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::FloatLiteral(tok.raw)))
        }
        TokenKind::Literal(LiteralKind::SingleQuotedString) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::StringLiteral(tok.raw)))
        }
        TokenKind::Literal(LiteralKind::DoubleQuotedString | LiteralKind::BacktickQuotedString) => {
            let ident = p.parse_ident()?;
            Ok(p.alloc_expr(Expr::Ident(ident)))
        }
        TokenKind::Literal(LiteralKind::Hex) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::HexLiteral(tok.raw)))
        }
        TokenKind::Literal(LiteralKind::Bit) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::BitLiteral(tok.raw)))
        }
        TokenKind::Literal(LiteralKind::QMarkParam) => {
            p.bump();
            Ok(p.alloc_expr(Expr::Param(Param::QMark)))
        }
        TokenKind::Literal(LiteralKind::NamedParam) => {
            let tok = p.bump();
            Ok(p.alloc_expr(Expr::Param(Param::Named(tok.raw))))
        }
        TokenKind::Punct(Punct::Star) => {
            p.bump();
            Ok(p.alloc_expr(Expr::Star))
        }
        TokenKind::Punct(Punct::LParen) => parse_paren(p),
        TokenKind::Ident if p.current_is_soft_kw("interval") => parse_interval(p),
        TokenKind::Ident => parse_ident_led(p),
        TokenKind::Keyword(Keyword::Replace)
        | TokenKind::Keyword(Keyword::Left)
        | TokenKind::Keyword(Keyword::Right)
        | TokenKind::Keyword(Keyword::Insert)
            if matches!(p.peek().kind, TokenKind::Punct(Punct::LParen)) =>
        {
            parse_ident_led(p)
        }
        _ => Err(p.error(format!("unexpected {} in expression", p.describe_current()))),
    }
}

/// An identifier (possibly dotted, possibly followed by `*` for
/// `t.*`, possibly followed by `(` for a function call) in expression
/// position.
fn parse_ident_led<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    let first = p.parse_ident()?;
    let mut parts = vec![first];

    while p.eat_punct(Punct::Dot) {
        if p.at_punct(Punct::Star) {
            p.bump();
            return Ok(p.alloc_expr(Expr::QualifiedStar(crate::ast::QualifiedName { parts })));
        }
        parts.push(p.parse_ident()?);
    }
    let name = crate::ast::QualifiedName { parts };

    if p.at_punct(Punct::LParen) {
        return parse_func_call(p, name);
    }

    if name.parts.len() == 1 {
        Ok(p.alloc_expr(Expr::Ident(name.parts[0])))
    } else {
        Ok(p.alloc_expr(Expr::QualifiedIdent(name)))
    }
}

fn parse_func_call<'src>(
    p: &mut Parser<'src>,
    name: crate::ast::QualifiedName<'src>,
) -> Result<ExprId, ParseError> {
    p.expect_punct(Punct::LParen)?;
    let mut distinct = false;
    let mut star = false;
    let mut args = Vec::new();

    if p.eat_punct(Punct::RParen) {
        return Ok(p.alloc_expr(Expr::FuncCall { name, args, distinct, star }));
    }

    if p.at_punct(Punct::Star) {
        p.bump();
        star = true;
    } else {
        distinct = p.eat_keyword(Keyword::Distinct);
        args.push(full_expr(p)?);
        while p.eat_punct(Punct::Comma) {
            args.push(full_expr(p)?);
        }
    }
    p.expect_punct(Punct::RParen)?;
    Ok(p.alloc_expr(Expr::FuncCall { name, args, distinct, star }))
}

fn parse_paren<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    p.expect_punct(Punct::LParen)?;
    if matches!(p.current.kind, TokenKind::Keyword(Keyword::Select) | TokenKind::Keyword(Keyword::With)) {
        let stmt = super::select::parse_select_or_with(p)?;
        p.expect_punct(Punct::RParen)?;
        return Ok(p.alloc_expr(Expr::Subquery(stmt)));
    }
    let inner = full_expr(p)?;
    p.expect_punct(Punct::RParen)?;
    Ok(p.alloc_expr(Expr::Paren(inner)))
}

fn parse_case<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    p.expect_keyword(Keyword::Case)?;
    let operand = if p.at_keyword(Keyword::When) { None } else { Some(full_expr(p)?) };

    let mut whens = Vec::new();
    while p.eat_keyword(Keyword::When) {
        let cond = full_expr(p)?;
        p.expect_keyword(Keyword::Then)?;
        let result = full_expr(p)?;
        whens.push((cond, result));
    }
    if whens.is_empty() {
        return Err(p.error("CASE expression requires at least one WHEN clause"));
    }

    let or_else = if p.eat_keyword(Keyword::Else) { Some(full_expr(p)?) } else { None };
    p.expect_keyword(Keyword::End)?;

    Ok(p.alloc_expr(Expr::Case { operand, whens, or_else }))
}

fn parse_cast<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    p.expect_keyword(Keyword::Cast)?;
    p.expect_punct(Punct::LParen)?;
    let expr = full_expr(p)?;
    p.expect_keyword(Keyword::As)?;
    let type_name = super::ddl::parse_data_type(p)?;
    p.expect_punct(Punct::RParen)?;
    Ok(p.alloc_expr(Expr::Cast { expr, type_name }))
}

fn parse_exists<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    p.expect_keyword(Keyword::Exists)?;
    p.expect_punct(Punct::LParen)?;
    let subquery = super::select::parse_select_or_with(p)?;
    p.expect_punct(Punct::RParen)?;
    Ok(p.alloc_expr(Expr::Exists { subquery }))
}

/// `INTERVAL '3' DAY`-style literal. `INTERVAL` is not in §6's reserved
/// keyword list, so it is recognized as a soft keyword the way
/// `conflict`/`duplicate`/`do` are elsewhere in the grammar.
fn parse_interval<'src>(p: &mut Parser<'src>) -> Result<ExprId, ParseError> {
    p.expect_soft_kw("interval")?;
    let value_tok = match p.current.kind {
        TokenKind::Literal(LiteralKind::SingleQuotedString) => p.bump(),
        _ => return Err(p.error(format!("expected string literal after INTERVAL, found {}", p.describe_current()))),
    };
    let unit = match p.current.kind {
        TokenKind::Ident | TokenKind::Keyword(_) => Some(p.parse_ident()?),
        _ => None,
    };
    Ok(p.alloc_expr(Expr::Interval { value: value_tok.raw, unit }))
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use crate::ast::{BinOp, Expr};
    use pretty_assertions::assert_eq;

    fn parse_expr_src(src: &str) -> (crate::arena::Arena<'static>, crate::arena::ExprId) {
        let leaked: &'static str = Box::leak(src.to_owned().into_boxed_str());
        let mut p = Parser::new(leaked);
        let id = super::full_expr(&mut p).unwrap();
        (p.into_arena(), id)
    }

    #[test]
    fn precedence_multiplication_over_addition() {
        let (arena, id) = parse_expr_src("1 + 2 * 3");
        match arena.expr(id) {
            Expr::Binary { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(arena.expr(*rhs), Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("expected Add at top, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_multiplication() {
        let (arena, id) = parse_expr_src("-1 * 2");
        match arena.expr(id) {
            Expr::Binary { op: BinOp::Mul, lhs, .. } => {
                assert!(matches!(arena.expr(*lhs), Expr::Unary { .. }));
            }
            other => panic!("expected Mul at top, got {other:?}"),
        }
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let (arena, id) = parse_expr_src("NOT a = b");
        match arena.expr(id) {
            Expr::Unary { expr, .. } => {
                assert!(matches!(arena.expr(*expr), Expr::Binary { op: BinOp::Eq, .. }));
            }
            other => panic!("expected Unary Not at top, got {other:?}"),
        }
    }

    #[test]
    fn like_pattern_parses_at_multiplicative_precedence() {
        let (arena, id) = parse_expr_src("a LIKE 'x' || 'y'");
        match arena.expr(id) {
            Expr::Like { pattern, .. } => {
                assert!(matches!(arena.expr(*pattern), Expr::Binary { op: BinOp::Concat, .. }));
            }
            other => panic!("expected Like at top, got {other:?}"),
        }
    }

    #[test]
    fn not_like_recognized() {
        let (arena, id) = parse_expr_src("a NOT LIKE 'x'");
        match arena.expr(id) {
            Expr::Like { negated, .. } => assert!(negated),
            other => panic!("expected Like at top, got {other:?}"),
        }
    }

    #[test]
    fn bare_trailing_not_is_unary() {
        let (arena, id) = parse_expr_src("NOT a");
        assert!(matches!(arena.expr(id), Expr::Unary { op: crate::ast::UnaryOp::Not, .. }));
    }

    #[test]
    fn json_operators_parse() {
        let (arena, id) = parse_expr_src("payload->>'user'");
        assert!(matches!(arena.expr(id), Expr::Binary { op: BinOp::JsonArrowText, .. }));

        let (arena, id) = parse_expr_src("payload @> '{}'");
        assert!(matches!(arena.expr(id), Expr::Binary { op: BinOp::JsonContains, .. }));

        let (arena, id) = parse_expr_src("payload ?| x");
        assert!(matches!(arena.expr(id), Expr::Binary { op: BinOp::JsonExistsAny, .. }));
    }

    #[test]
    fn qualified_star() {
        let (arena, id) = parse_expr_src("t.*");
        assert!(matches!(arena.expr(id), Expr::QualifiedStar(_)));
    }

    #[test]
    fn function_call_with_distinct() {
        let (arena, id) = parse_expr_src("COUNT(DISTINCT a, b)");
        match arena.expr(id) {
            Expr::FuncCall { distinct, args, .. } => {
                assert!(*distinct);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected FuncCall, got {other:?}"),
        }
    }
}
