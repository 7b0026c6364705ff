//! Expression nodes.

use super::{Ident, QualifiedName};
use crate::arena::{ExprId, StmtId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'src> {
    Ident(Ident<'src>),
    QualifiedIdent(QualifiedName<'src>),
    Star,
    QualifiedStar(QualifiedName<'src>),

    IntegerLiteral(&'src str),
    FloatLiteral(&'src str),
    StringLiteral(&'src str),
    HexLiteral(&'src str),
    BitLiteral(&'src str),
    BoolLiteral(bool),
    Null,
    Param(Param<'src>),

    Paren(ExprId),
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    FuncCall {
        name: QualifiedName<'src>,
        args: Vec<ExprId>,
        distinct: bool,
        star: bool,
    },
    Case {
        operand: Option<ExprId>,
        whens: Vec<(ExprId, ExprId)>,
        or_else: Option<ExprId>,
    },
    Cast {
        expr: ExprId,
        type_name: super::DataType<'src>,
    },
    Between {
        expr: ExprId,
        negated: bool,
        low: ExprId,
        high: ExprId,
    },
    InList {
        expr: ExprId,
        negated: bool,
        list: Vec<ExprId>,
    },
    InSubquery {
        expr: ExprId,
        negated: bool,
        subquery: StmtId,
    },
    Like {
        expr: ExprId,
        negated: bool,
        pattern: ExprId,
        escape: Option<ExprId>,
    },
    IsNull {
        expr: ExprId,
        negated: bool,
    },
    Exists {
        subquery: StmtId,
    },
    Subquery(StmtId),
    Interval {
        value: &'src str,
        unit: Option<Ident<'src>>,
    },
}

/// A bound parameter placeholder. `QMark` is the bare `?` form shared by
/// MySQL and SQLite; `Named` covers `?N`, `$N`, `$name`, `:name` and
/// `@name`, keeping the caller's raw spelling rather than parsing out a
/// number or identifier (dialects disagree on which of these are numeric).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param<'src> {
    QMark,
    Named(&'src str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    BitNot,
}

/// Binary operators, unified across arithmetic, comparison, boolean and the
/// PostgreSQL JSON family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Concat,
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    JsonArrow,      // ->
    JsonArrowText,  // ->>
    JsonHashArrow,  // #>
    JsonHashArrowText, // #>>
    JsonContains,   // @>
    JsonContainedBy, // <@
    JsonExists,     // ?
    JsonExistsAny,  // ?|
    JsonExistsAll,  // ?&
}
