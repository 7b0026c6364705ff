//! Table references in `FROM`/`USING`/`JOIN` position.

use super::{Ident, QualifiedName};
use crate::arena::{ExprId, StmtId, TableRefId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef<'src> {
    Named {
        name: QualifiedName<'src>,
        alias: Option<Ident<'src>>,
    },
    Subquery {
        stmt: StmtId,
        alias: Option<Ident<'src>>,
    },
    Join {
        left: TableRefId,
        right: TableRefId,
        kind: JoinKind,
        natural: bool,
        on: Option<ExprId>,
        using: Vec<Ident<'src>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}
