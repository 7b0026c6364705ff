//! A monotonic, reusable arena backing every node in a parsed syntax tree.
//!
//! Rather than the byte-slab-and-raw-pointer arena of the system this crate
//! re-architects, nodes live in per-kind [`Vec`]s and are addressed by a
//! small `Copy` index (design note (b): "an indexed arena ... avoids
//! lifetimes entirely and is trivially movable"). Pushing a node is an
//! amortized O(1) `Vec::push`, so there is still no per-node heap allocation
//! on the hot path; [`Arena::reset`] just truncates the vectors back to
//! zero length and keeps their backing capacity, exactly mirroring the
//! slab-reuse behaviour the original arena's `reset` provides.

use crate::ast::{Expr, Stmt, TableRef};
use crate::lexer::Position;

macro_rules! node_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(idx: usize) -> Self {
                Self(idx as u32)
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

node_id!(ExprId);
node_id!(StmtId);
node_id!(TableRefId);

/// Owns every expression, statement and table-reference node produced by a
/// single parse. A tree's lifetime is bounded by `min(Arena, 'src)`: nodes
/// borrow identifier and literal text from the source (`'src`), while the
/// node storage itself lives in the arena.
#[derive(Debug, Default)]
pub struct Arena<'src> {
    exprs: Vec<Expr<'src>>,
    stmts: Vec<Stmt<'src>>,
    /// Parallel to `stmts`: the position of each statement's first token.
    /// Kept out-of-line rather than as a field on every `Stmt` variant so
    /// the variants themselves stay exactly the shape the data model
    /// describes.
    stmt_positions: Vec<Position>,
    table_refs: Vec<TableRef<'src>>,
}

impl<'src> Arena<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logically drops every node allocated so far and rewinds the arena to
    /// empty, reusing prior capacity. Callers must not retain `ExprId`,
    /// `StmtId` or `TableRefId` values obtained before a reset: they may now
    /// resolve to unrelated nodes from the next parse.
    pub fn reset(&mut self) {
        self.exprs.clear();
        self.stmts.clear();
        self.stmt_positions.clear();
        self.table_refs.clear();
    }

    pub(crate) fn alloc_expr(&mut self, expr: Expr<'src>) -> ExprId {
        self.exprs.push(expr);
        ExprId::new(self.exprs.len() - 1)
    }

    pub(crate) fn alloc_stmt(&mut self, stmt: Stmt<'src>, position: Position) -> StmtId {
        self.stmts.push(stmt);
        self.stmt_positions.push(position);
        StmtId::new(self.stmts.len() - 1)
    }

    /// The position of the first token of the statement `id` refers to.
    pub fn stmt_position(&self, id: StmtId) -> Position {
        self.stmt_positions[id.index()]
    }

    pub(crate) fn alloc_table_ref(&mut self, table_ref: TableRef<'src>) -> TableRefId {
        self.table_refs.push(table_ref);
        TableRefId::new(self.table_refs.len() - 1)
    }

    pub fn expr(&self, id: ExprId) -> &Expr<'src> {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt<'src> {
        &self.stmts[id.index()]
    }

    pub fn table_ref(&self, id: TableRefId) -> &TableRef<'src> {
        &self.table_refs[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}
