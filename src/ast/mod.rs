//! Typed syntax tree nodes.
//!
//! Nodes are plain enums and structs, not a lossless green/red tree: trivia
//! (whitespace, comments) is discarded by the lexer and never makes it into
//! the tree at all. Recursive fields are [`crate::arena`] indices rather than
//! owned boxes, so the tree for one statement and the tree for a thousand
//! share the same flat storage.

mod expr;
mod stmt;
mod table;

pub use expr::{BinOp, Expr, Param, UnaryOp};
pub use stmt::{
    AlterDatabase, AlterTable, AlterTableAction, Assignment, Call, ColumnDef, ColumnPosition,
    ConflictAction, Cte, CreateDatabase, CreateIndex, CreateTable, CreateView, Delete, DropDatabase,
    DropIndex, DropTable, Explain, ForeignKeyRef, GeneratedColumn, GenericDdl, IndexColumn, Insert,
    InsertSource, LimitClause, NullsOrder, OnConflict, OrderByItem, RefAction, Select, SelectColumn,
    SelectCore, SetOp, SetOpLink, Show, Stmt, TableConstraint, TableConstraintKind, TableOption,
    Truncate, TxnKind, Update, UseStmt, WithClause,
};
pub use table::{JoinKind, TableRef};

/// A source identifier, distinguishing quoted spellings (`"Foo"`, `` `Foo` ``)
/// from bare ones. `text` is the identifier's name with any surrounding
/// quotes already stripped; `quoted` records whether quoting was present so
/// the renderer can decide whether re-quoting is required for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'src> {
    pub text: &'src str,
    pub quoted: bool,
}

impl<'src> Ident<'src> {
    pub fn unquoted(text: &'src str) -> Self {
        Self { text, quoted: false }
    }

    pub fn quoted(text: &'src str) -> Self {
        Self { text, quoted: true }
    }
}

/// A dot-separated name such as `schema.table` or `t.column`, most commonly
/// one or two segments long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName<'src> {
    pub parts: Vec<Ident<'src>>,
}

impl<'src> QualifiedName<'src> {
    pub fn single(ident: Ident<'src>) -> Self {
        Self { parts: vec![ident] }
    }

    pub fn last(&self) -> Ident<'src> {
        *self.parts.last().expect("QualifiedName always has at least one part")
    }
}

/// A column type name plus its parenthesized numeric arguments and
/// modifiers, e.g. `VARCHAR(255)`, `DECIMAL(10, 2) UNSIGNED`, or
/// `ENUM('a', 'b')`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType<'src> {
    pub name: &'src str,
    pub precision: Option<u64>,
    pub scale: Option<u64>,
    pub unsigned: bool,
    pub zerofill: bool,
    pub charset: Option<Ident<'src>>,
    pub collation: Option<Ident<'src>>,
    pub values: Vec<&'src str>,
}
