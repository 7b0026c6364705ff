//! Statement nodes.

use super::{DataType, Ident, QualifiedName};
use crate::arena::{ExprId, StmtId, TableRefId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt<'src> {
    Select(Select<'src>),
    Insert(Insert<'src>),
    Update(Update<'src>),
    Delete(Delete<'src>),
    CreateTable(CreateTable<'src>),
    CreateIndex(CreateIndex<'src>),
    CreateView(CreateView<'src>),
    CreateDatabase(CreateDatabase<'src>),
    AlterTable(AlterTable<'src>),
    AlterDatabase(AlterDatabase<'src>),
    DropTable(DropTable<'src>),
    DropIndex(DropIndex<'src>),
    DropDatabase(DropDatabase<'src>),
    Truncate(Truncate<'src>),
    Use(UseStmt<'src>),
    Show(Show<'src>),
    Explain(Explain),
    Call(Call<'src>),
    Transaction(TxnKind),
    /// A DDL statement recognized at the dispatch level but not modeled in
    /// detail; the renderer passes its raw span through verbatim outside
    /// strict mode.
    GenericDdl(GenericDdl<'src>),
}

impl<'src> Stmt<'src> {
    /// The statement kind's name, used in error messages and by the
    /// renderer's strict-mode rejection.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Insert(_) => "INSERT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
            Self::CreateTable(_) => "CREATE TABLE",
            Self::CreateIndex(_) => "CREATE INDEX",
            Self::CreateView(_) => "CREATE VIEW",
            Self::CreateDatabase(_) => "CREATE DATABASE",
            Self::AlterTable(_) => "ALTER TABLE",
            Self::AlterDatabase(_) => "ALTER DATABASE",
            Self::DropTable(_) => "DROP TABLE",
            Self::DropIndex(_) => "DROP INDEX",
            Self::DropDatabase(_) => "DROP DATABASE",
            Self::Truncate(_) => "TRUNCATE",
            Self::Use(_) => "USE",
            Self::Show(_) => "SHOW",
            Self::Explain(_) => "EXPLAIN",
            Self::Call(_) => "CALL",
            Self::Transaction(_) => "TRANSACTION",
            Self::GenericDdl(_) => "DDL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause<'src> {
    pub recursive: bool,
    pub ctes: Vec<Cte<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cte<'src> {
    pub name: Ident<'src>,
    pub column_names: Vec<Ident<'src>>,
    pub stmt: StmtId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn<'src> {
    pub expr: ExprId,
    pub alias: Option<Ident<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCore<'src> {
    pub distinct: bool,
    pub columns: Vec<SelectColumn<'src>>,
    pub from: Option<TableRefId>,
    pub where_clause: Option<ExprId>,
    pub group_by: Vec<ExprId>,
    pub having: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

/// One link in a left-leaning chain of set operations: `core SETOP next`,
/// read left to right as the chain is built up, so a three-way
/// `a UNION b EXCEPT c` is `Select { core: a, set_ops: [(Union, b), (Except, c)] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOpLink<'src> {
    pub op: SetOp,
    pub all: bool,
    pub core: SelectCore<'src>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select<'src> {
    pub with: Option<WithClause<'src>>,
    pub core: SelectCore<'src>,
    pub set_ops: Vec<SetOpLink<'src>>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<LimitClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderByItem {
    pub expr: ExprId,
    pub desc: bool,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitClause {
    pub limit: ExprId,
    pub offset: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert<'src> {
    pub with: Option<WithClause<'src>>,
    pub table: QualifiedName<'src>,
    pub alias: Option<Ident<'src>>,
    pub columns: Vec<Ident<'src>>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict<'src>>,
    pub ignore: bool,
    /// Set for `REPLACE INTO`, which shares this node's shape but replaces
    /// any conflicting row outright instead of erroring or upserting.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    Values(Vec<Vec<ExprId>>),
    Select(StmtId),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict<'src> {
    pub target: Vec<Ident<'src>>,
    pub action: ConflictAction<'src>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction<'src> {
    DoNothing,
    DoUpdate { assignments: Vec<Assignment<'src>>, where_clause: Option<ExprId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'src> {
    pub column: Ident<'src>,
    pub value: ExprId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update<'src> {
    pub with: Option<WithClause<'src>>,
    pub table: QualifiedName<'src>,
    pub alias: Option<Ident<'src>>,
    pub assignments: Vec<Assignment<'src>>,
    pub from: Option<TableRefId>,
    pub where_clause: Option<ExprId>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<LimitClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete<'src> {
    pub with: Option<WithClause<'src>>,
    pub table: QualifiedName<'src>,
    pub alias: Option<Ident<'src>>,
    pub using: Option<TableRefId>,
    pub where_clause: Option<ExprId>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<LimitClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef<'src> {
    pub name: Ident<'src>,
    pub data_type: DataType<'src>,
    pub not_null: bool,
    pub default: Option<ExprId>,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub generated: Option<GeneratedColumn>,
    pub references: Option<ForeignKeyRef<'src>>,
    pub check: Option<ExprId>,
    pub collate: Option<Ident<'src>>,
    pub comment: Option<&'src str>,
    pub on_update: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedColumn {
    pub expr: ExprId,
    pub stored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef<'src> {
    pub table: QualifiedName<'src>,
    pub columns: Vec<Ident<'src>>,
    pub on_delete: Option<RefAction>,
    pub on_update: Option<RefAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint<'src> {
    pub name: Option<Ident<'src>>,
    pub kind: TableConstraintKind<'src>,
    /// Index-algorithm hint, e.g. `USING BTREE`.
    pub using: Option<Ident<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraintKind<'src> {
    PrimaryKey(Vec<Ident<'src>>),
    Unique(Vec<Ident<'src>>),
    ForeignKey { columns: Vec<Ident<'src>>, reference: ForeignKeyRef<'src> },
    Check(ExprId),
}

/// A dialect-specific table option, e.g. `ENGINE=InnoDB` or
/// `WITHOUT ROWID`. Kept as name/raw-value text rather than modeled in
/// detail since the set of options is open-ended and dialect-specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOption<'src> {
    pub name: &'src str,
    pub value: Option<&'src str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable<'src> {
    pub name: QualifiedName<'src>,
    pub temporary: bool,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef<'src>>,
    pub constraints: Vec<TableConstraint<'src>>,
    pub options: Vec<TableOption<'src>>,
    /// `CREATE TABLE ... AS SELECT ...`.
    pub as_select: Option<StmtId>,
    /// `CREATE TABLE ... LIKE other_table`.
    pub like: Option<QualifiedName<'src>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexColumn<'src> {
    pub name: Ident<'src>,
    pub prefix_len: Option<u64>,
    pub desc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex<'src> {
    pub name: Ident<'src>,
    pub table: QualifiedName<'src>,
    pub unique: bool,
    pub if_not_exists: bool,
    pub columns: Vec<IndexColumn<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateView<'src> {
    pub name: QualifiedName<'src>,
    pub or_replace: bool,
    pub columns: Vec<Ident<'src>>,
    pub query: StmtId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDatabase<'src> {
    pub name: Ident<'src>,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPosition<'src> {
    First,
    After(Ident<'src>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction<'src> {
    AddColumn { column: ColumnDef<'src>, position: Option<ColumnPosition<'src>> },
    DropColumn { name: Ident<'src> },
    RenameColumn { from: Ident<'src>, to: Ident<'src> },
    ModifyColumn { column: ColumnDef<'src> },
    AddConstraint(TableConstraint<'src>),
    DropConstraint { name: Ident<'src> },
    RenameTable { to: QualifiedName<'src> },
    AddIndex { name: Option<Ident<'src>>, columns: Vec<IndexColumn<'src>>, unique: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable<'src> {
    pub name: QualifiedName<'src>,
    pub actions: Vec<AlterTableAction<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterDatabase<'src> {
    pub name: Ident<'src>,
    pub options: Vec<TableOption<'src>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable<'src> {
    pub names: Vec<QualifiedName<'src>>,
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndex<'src> {
    pub name: Ident<'src>,
    pub table: Option<QualifiedName<'src>>,
    pub if_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropDatabase<'src> {
    pub name: Ident<'src>,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncate<'src> {
    pub table: QualifiedName<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseStmt<'src> {
    pub name: Ident<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Show<'src> {
    pub target: &'src str,
    pub like: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explain {
    pub stmt: StmtId,
    pub analyze: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'src> {
    pub name: QualifiedName<'src>,
    pub args: Vec<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericDdl<'src> {
    pub raw: &'src str,
}
