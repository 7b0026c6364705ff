//! Dialect-aware pretty printer.
//!
//! A tree walk over an already-parsed [`crate::arena::Arena`] that emits SQL
//! text for one of three target dialects, applying the rewrites distilled
//! spec §4.5 enumerates: identifier quoting, `IFNULL`/`COALESCE` function
//! substitution, parameter placeholder reshaping, upsert clause translation,
//! and a handful of data-type and statement-shape differences. The renderer
//! is total over the modeled tree outside strict mode (§7): it always
//! produces *some* output, falling back to best-effort text rather than
//! failing, because the parser already accepted the source, and a caller
//! asking for output back is not well served by a renderer that refuses.

mod assignments;

use crate::arena::{Arena, ExprId, StmtId, TableRefId};
use crate::ast::*;
use crate::error::RenderError;
use std::fmt::Write as _;

/// The three SQL dialects this renderer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
}

/// Rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub dialect: Dialect,
    /// When set, an unmodeled statement shape or an upsert that cannot be
    /// reshaped for lack of a conflict target raises [`RenderError`] instead
    /// of emitting best-effort output.
    pub strict: bool,
}

impl Options {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect, strict: false }
    }

    pub fn strict(dialect: Dialect) -> Self {
        Self { dialect, strict: true }
    }
}

/// Renders every statement in `stmts`, each terminated by `;`, as a single
/// string. Rendering the same tree with the same [`Options`] twice yields
/// byte-identical output, since nothing here depends on wall-clock time,
/// randomness, or prior calls.
pub fn render(arena: &Arena, stmts: &[StmtId], opts: Options) -> Result<String, RenderError> {
    let mut r = Renderer { arena, opts, param_counter: 0, out: String::new() };
    for &id in stmts {
        r.render_stmt(id)?;
        r.out.push_str(";\n");
    }
    r.out.pop(); // trailing '\n'
    Ok(r.out)
}

/// Parses `src` once and renders it to `to` in one call. `from_hint`
/// documents the caller's belief about the source dialect; the grammar
/// this crate parses is a superset covering
/// all three dialects, so parsing itself never needs it, but callers that
/// know the source dialect still get to state it for clarity and so a
/// future dialect-sensitive parse mode has somewhere to read it from.
pub fn transcode(
    src: &str,
    _from_hint: Dialect,
    to: Dialect,
    strict: bool,
) -> Result<String, crate::error::Error> {
    let (arena, stmts) = crate::parse_all(src)?;
    let opts = Options { dialect: to, strict };
    render(&arena, &stmts, opts).map_err(Into::into)
}

struct Renderer<'a, 'src> {
    arena: &'a Arena<'src>,
    opts: Options,
    /// Running count of parameters emitted so far, used to number
    /// PostgreSQL's `$1`, `$2`, … placeholders left to right across the
    /// whole rendered output.
    param_counter: u32,
    out: String,
}

impl<'a, 'src> Renderer<'a, 'src> {
    fn unmodeled(&self, kind: &'static str) -> Result<(), RenderError> {
        if self.opts.strict {
            Err(RenderError::UnmodeledStatement(kind))
        } else {
            Ok(())
        }
    }

    // -- identifiers / names -------------------------------------------

    /// Quoted identifiers are re-quoted with the target dialect's quote
    /// character, doubling any inner occurrence; bare identifiers are
    /// emitted as-is.
    fn write_ident(&mut self, ident: &Ident<'src>) {
        if !ident.quoted {
            self.out.push_str(ident.text);
            return;
        }
        let q = match self.opts.dialect {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        };
        self.out.push(q);
        for ch in ident.text.chars() {
            if ch == q {
                self.out.push(q);
            }
            self.out.push(ch);
        }
        self.out.push(q);
    }

    fn write_qualified_name(&mut self, name: &QualifiedName<'src>) {
        for (i, part) in name.parts.iter().enumerate() {
            if i > 0 {
                self.out.push('.');
            }
            self.write_ident(part);
        }
    }

    fn write_ident_list(&mut self, idents: &[Ident<'src>]) {
        for (i, ident) in idents.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_ident(ident);
        }
    }

    // -- statements -------------------------------------------------------

    fn render_stmt(&mut self, id: StmtId) -> Result<(), RenderError> {
        match self.arena.stmt(id).clone() {
            Stmt::Select(s) => self.render_select(&s),
            Stmt::Insert(ins) => self.render_insert(&ins),
            Stmt::Update(u) => self.render_update(&u),
            Stmt::Delete(d) => self.render_delete(&d),
            Stmt::CreateTable(t) => self.render_create_table(&t),
            Stmt::CreateIndex(i) => self.render_create_index(&i),
            Stmt::CreateView(v) => self.render_create_view(&v),
            Stmt::CreateDatabase(d) => self.render_create_database(&d),
            Stmt::AlterTable(a) => self.render_alter_table(&a),
            Stmt::AlterDatabase(a) => self.render_alter_database(&a),
            Stmt::DropTable(d) => self.render_drop_table(&d),
            Stmt::DropIndex(d) => self.render_drop_index(&d),
            Stmt::DropDatabase(d) => self.render_drop_database(&d),
            Stmt::Truncate(t) => {
                self.out.push_str("TRUNCATE TABLE ");
                self.write_qualified_name(&t.table);
                Ok(())
            }
            Stmt::Use(u) => {
                self.out.push_str("USE ");
                self.write_ident(&u.name);
                Ok(())
            }
            Stmt::Show(s) => {
                write!(self.out, "SHOW {}", s.target).unwrap();
                if let Some(like) = s.like {
                    self.out.push_str(" LIKE ");
                    self.render_expr(like)?;
                }
                Ok(())
            }
            Stmt::Explain(e) => {
                self.out.push_str("EXPLAIN ");
                if e.analyze {
                    self.out.push_str("ANALYZE ");
                }
                self.render_stmt(e.stmt)
            }
            Stmt::Call(c) => {
                self.out.push_str("CALL ");
                self.write_qualified_name(&c.name);
                self.out.push('(');
                self.render_expr_list(&c.args)?;
                self.out.push(')');
                Ok(())
            }
            Stmt::Transaction(kind) => {
                self.out.push_str(match kind {
                    TxnKind::Begin => "BEGIN",
                    TxnKind::Commit => "COMMIT",
                    TxnKind::Rollback => "ROLLBACK",
                });
                Ok(())
            }
            Stmt::GenericDdl(g) => {
                self.unmodeled("DDL")?;
                self.out.push_str(g.raw);
                Ok(())
            }
        }
    }

    fn render_with(&mut self, with: &Option<WithClause<'src>>) -> Result<(), RenderError> {
        let Some(with) = with else { return Ok(()) };
        self.out.push_str("WITH ");
        if with.recursive {
            self.out.push_str("RECURSIVE ");
        }
        for (i, cte) in with.ctes.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_ident(&cte.name);
            if !cte.column_names.is_empty() {
                self.out.push('(');
                self.write_ident_list(&cte.column_names);
                self.out.push(')');
            }
            self.out.push_str(" AS (");
            self.render_stmt(cte.stmt)?;
            self.out.push(')');
        }
        self.out.push(' ');
        Ok(())
    }

    fn render_select(&mut self, s: &Select<'src>) -> Result<(), RenderError> {
        self.render_with(&s.with)?;
        self.render_select_core(&s.core)?;
        for link in &s.set_ops {
            self.out.push(' ');
            self.out.push_str(match link.op {
                SetOp::Union => "UNION",
                SetOp::Intersect => "INTERSECT",
                SetOp::Except => "EXCEPT",
            });
            if link.all {
                self.out.push_str(" ALL");
            }
            self.out.push(' ');
            self.render_select_core(&link.core)?;
        }
        self.render_order_by(&s.order_by)?;
        self.render_limit(&s.limit)?;
        Ok(())
    }

    fn render_select_core(&mut self, core: &SelectCore<'src>) -> Result<(), RenderError> {
        self.out.push_str("SELECT ");
        if core.distinct {
            self.out.push_str("DISTINCT ");
        }
        for (i, col) in core.columns.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.render_select_column(col)?;
        }
        if let Some(from) = core.from {
            self.out.push_str(" FROM ");
            self.render_table_ref(from)?;
        }
        if let Some(w) = core.where_clause {
            self.out.push_str(" WHERE ");
            self.render_expr(w)?;
        }
        if !core.group_by.is_empty() {
            self.out.push_str(" GROUP BY ");
            self.render_expr_list(&core.group_by)?;
        }
        if let Some(h) = core.having {
            self.out.push_str(" HAVING ");
            self.render_expr(h)?;
        }
        Ok(())
    }

    fn render_select_column(&mut self, col: &SelectColumn<'src>) -> Result<(), RenderError> {
        self.render_expr(col.expr)?;
        if let Some(alias) = &col.alias {
            self.out.push_str(" AS ");
            self.write_ident(alias);
        }
        Ok(())
    }

    fn render_order_by(&mut self, items: &[OrderByItem]) -> Result<(), RenderError> {
        if items.is_empty() {
            return Ok(());
        }
        self.out.push_str(" ORDER BY ");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.render_expr(item.expr)?;
            if item.desc {
                self.out.push_str(" DESC");
            }
            match item.nulls {
                Some(NullsOrder::First) => self.out.push_str(" NULLS FIRST"),
                Some(NullsOrder::Last) => self.out.push_str(" NULLS LAST"),
                None => {}
            }
        }
        Ok(())
    }

    fn render_limit(&mut self, limit: &Option<LimitClause>) -> Result<(), RenderError> {
        let Some(limit) = limit else { return Ok(()) };
        self.out.push_str(" LIMIT ");
        self.render_expr(limit.limit)?;
        if let Some(offset) = limit.offset {
            self.out.push_str(" OFFSET ");
            self.render_expr(offset)?;
        }
        Ok(())
    }

    // -- INSERT / upsert ----------------------------------------------------

    fn render_insert(&mut self, ins: &Insert<'src>) -> Result<(), RenderError> {
        self.render_with(&ins.with)?;
        if ins.replace {
            self.out.push_str("REPLACE INTO ");
        } else if ins.ignore && self.opts.dialect == Dialect::MySql {
            self.out.push_str("INSERT IGNORE INTO ");
        } else {
            self.out.push_str("INSERT INTO ");
        }
        self.write_qualified_name(&ins.table);
        if let Some(alias) = &ins.alias {
            self.out.push(' ');
            self.write_ident(alias);
        }
        if !ins.columns.is_empty() {
            self.out.push(' ');
            self.out.push('(');
            self.write_ident_list(&ins.columns);
            self.out.push(')');
        }
        self.out.push(' ');
        match &ins.source {
            InsertSource::Values(rows) => {
                self.out.push_str("VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push('(');
                    self.render_expr_list(row)?;
                    self.out.push(')');
                }
            }
            InsertSource::Select(stmt) => self.render_stmt(*stmt)?,
            InsertSource::DefaultValues => self.out.push_str("DEFAULT VALUES"),
        }
        if !ins.replace {
            self.render_upsert(ins)?;
        }
        Ok(())
    }

    /// Translates whichever upsert tail the source had (MySQL's
    /// `ON DUPLICATE KEY UPDATE` or the standard `ON CONFLICT ... DO ...`)
    /// into the target dialect's form.
    fn render_upsert(&mut self, ins: &Insert<'src>) -> Result<(), RenderError> {
        let Some(oc) = &ins.on_conflict else { return Ok(()) };

        match self.opts.dialect {
            Dialect::MySql => match &oc.action {
                ConflictAction::DoUpdate { assignments, .. } => {
                    self.out.push_str(" ON DUPLICATE KEY UPDATE ");
                    self.render_assignments(assignments)?;
                }
                ConflictAction::DoNothing => {
                    // MySQL has no direct "do nothing on conflict" clause;
                    // best-effort output simply omits the tail.
                    self.unmodeled("ON CONFLICT DO NOTHING (MySQL target)")?;
                }
            },
            Dialect::Postgres | Dialect::Sqlite => {
                self.out.push_str(" ON CONFLICT");
                let target = assignments::conflict_target(oc, ins);
                match target {
                    Some(cols) if !cols.is_empty() => {
                        self.out.push_str(" (");
                        self.write_ident_list(&cols);
                        self.out.push(')');
                    }
                    Some(_) | None => {
                        if self.opts.strict && matches!(oc.action, ConflictAction::DoUpdate { .. }) {
                            return Err(RenderError::MissingConflictTarget);
                        }
                    }
                }
                match &oc.action {
                    ConflictAction::DoNothing => self.out.push_str(" DO NOTHING"),
                    ConflictAction::DoUpdate { assignments, where_clause } => {
                        self.out.push_str(" DO UPDATE SET ");
                        self.render_assignments(assignments)?;
                        if let Some(w) = where_clause {
                            self.out.push_str(" WHERE ");
                            self.render_expr(*w)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn render_assignments(&mut self, assignments: &[Assignment<'src>]) -> Result<(), RenderError> {
        for (i, a) in assignments.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_ident(&a.column);
            self.out.push_str(" = ");
            self.render_expr(a.value)?;
        }
        Ok(())
    }

    fn render_update(&mut self, u: &Update<'src>) -> Result<(), RenderError> {
        self.render_with(&u.with)?;
        self.out.push_str("UPDATE ");
        self.write_qualified_name(&u.table);
        if let Some(alias) = &u.alias {
            self.out.push(' ');
            self.write_ident(alias);
        }
        self.out.push_str(" SET ");
        self.render_assignments(&u.assignments)?;
        if let Some(from) = u.from {
            self.out.push_str(" FROM ");
            self.render_table_ref(from)?;
        }
        if let Some(w) = u.where_clause {
            self.out.push_str(" WHERE ");
            self.render_expr(w)?;
        }
        self.render_order_by(&u.order_by)?;
        self.render_limit(&u.limit)?;
        Ok(())
    }

    fn render_delete(&mut self, d: &Delete<'src>) -> Result<(), RenderError> {
        self.render_with(&d.with)?;
        self.out.push_str("DELETE FROM ");
        self.write_qualified_name(&d.table);
        if let Some(alias) = &d.alias {
            self.out.push(' ');
            self.write_ident(alias);
        }
        if let Some(using) = d.using {
            self.out.push_str(" USING ");
            self.render_table_ref(using)?;
        }
        if let Some(w) = d.where_clause {
            self.out.push_str(" WHERE ");
            self.render_expr(w)?;
        }
        self.render_order_by(&d.order_by)?;
        self.render_limit(&d.limit)?;
        Ok(())
    }

    // -- DDL ----------------------------------------------------------------

    fn render_create_table(&mut self, t: &CreateTable<'src>) -> Result<(), RenderError> {
        self.out.push_str("CREATE ");
        if t.temporary {
            self.out.push_str("TEMPORARY ");
        }
        self.out.push_str("TABLE ");
        if t.if_not_exists {
            self.out.push_str("IF NOT EXISTS ");
        }
        self.write_qualified_name(&t.name);

        if let Some(like) = &t.like {
            self.out.push_str(" LIKE ");
            self.write_qualified_name(like);
            return Ok(());
        }

        if !t.columns.is_empty() || !t.constraints.is_empty() {
            self.out.push_str(" (");
            let mut first = true;
            for col in &t.columns {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.render_column_def(col)?;
            }
            for c in &t.constraints {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.render_table_constraint(c)?;
            }
            self.out.push(')');
        }

        for opt in &t.options {
            self.out.push(' ');
            self.out.push_str(opt.name);
            if let Some(v) = opt.value {
                self.out.push('=');
                self.out.push_str(v);
            }
        }

        if let Some(as_select) = t.as_select {
            self.out.push_str(" AS ");
            self.render_stmt(as_select)?;
        }
        Ok(())
    }

    fn render_column_def(&mut self, col: &ColumnDef<'src>) -> Result<(), RenderError> {
        self.write_ident(&col.name);
        self.out.push(' ');
        self.render_data_type(&col.data_type);

        if col.not_null {
            self.out.push_str(" NOT NULL");
        }
        if let Some(default) = col.default {
            self.out.push_str(" DEFAULT ");
            self.render_expr(default)?;
        }
        if col.auto_increment {
            match self.opts.dialect {
                Dialect::MySql => self.out.push_str(" AUTO_INCREMENT"),
                Dialect::Postgres => self.out.push_str(" GENERATED BY DEFAULT AS IDENTITY"),
                Dialect::Sqlite => self.out.push_str(" AUTOINCREMENT"),
            }
        }
        if col.primary_key {
            self.out.push_str(" PRIMARY KEY");
        }
        if col.unique {
            self.out.push_str(" UNIQUE");
        }
        if let Some(gen) = &col.generated {
            self.out.push_str(" GENERATED ALWAYS AS (");
            self.render_expr(gen.expr)?;
            self.out.push_str(if gen.stored { ") STORED" } else { ") VIRTUAL" });
        }
        if let Some(refs) = &col.references {
            self.out.push_str(" REFERENCES ");
            self.render_foreign_key_ref(refs)?;
        }
        if let Some(check) = col.check {
            self.out.push_str(" CHECK (");
            self.render_expr(check)?;
            self.out.push(')');
        }
        if let Some(collate) = &col.collate {
            self.out.push_str(" COLLATE ");
            self.write_ident(collate);
        }
        if let Some(comment) = col.comment {
            write!(self.out, " COMMENT '{comment}'").unwrap();
        }
        if let Some(on_update) = col.on_update {
            self.out.push_str(" ON UPDATE ");
            self.render_expr(on_update)?;
        }
        Ok(())
    }

    /// `JSONB`/`JSON`/`UNSIGNED`/`ZEROFILL` translate or drop per dialect.
    fn render_data_type(&mut self, dt: &DataType<'src>) {
        let upper = dt.name.to_ascii_uppercase();
        let name = match (upper.as_str(), self.opts.dialect) {
            ("JSONB", Dialect::MySql) => "JSON",
            ("JSONB", Dialect::Sqlite) => "TEXT",
            ("JSON", Dialect::Sqlite) => "TEXT",
            _ => dt.name,
        };
        self.out.push_str(name);

        if !dt.values.is_empty() {
            self.out.push('(');
            for (i, v) in dt.values.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                write!(self.out, "'{v}'").unwrap();
            }
            self.out.push(')');
        } else if let Some(p) = dt.precision {
            self.out.push('(');
            write!(self.out, "{p}").unwrap();
            if let Some(s) = dt.scale {
                write!(self.out, ", {s}").unwrap();
            }
            self.out.push(')');
        }

        if self.opts.dialect == Dialect::MySql {
            if dt.unsigned {
                self.out.push_str(" UNSIGNED");
            }
            if dt.zerofill {
                self.out.push_str(" ZEROFILL");
            }
        }
        if let Some(cs) = &dt.charset {
            self.out.push_str(" CHARACTER SET ");
            self.write_ident(cs);
        }
        if let Some(coll) = &dt.collation {
            self.out.push_str(" COLLATE ");
            self.write_ident(coll);
        }
    }

    fn render_table_constraint(&mut self, c: &TableConstraint<'src>) -> Result<(), RenderError> {
        if let Some(name) = &c.name {
            self.out.push_str("CONSTRAINT ");
            self.write_ident(name);
            self.out.push(' ');
        }
        match &c.kind {
            TableConstraintKind::PrimaryKey(cols) => {
                self.out.push_str("PRIMARY KEY (");
                self.write_ident_list(cols);
                self.out.push(')');
            }
            TableConstraintKind::Unique(cols) => {
                self.out.push_str("UNIQUE (");
                self.write_ident_list(cols);
                self.out.push(')');
            }
            TableConstraintKind::ForeignKey { columns, reference } => {
                self.out.push_str("FOREIGN KEY (");
                self.write_ident_list(columns);
                self.out.push_str(") REFERENCES ");
                self.render_foreign_key_ref(reference)?;
            }
            TableConstraintKind::Check(expr) => {
                self.out.push_str("CHECK (");
                self.render_expr(*expr)?;
                self.out.push(')');
            }
        }
        if let Some(using) = &c.using {
            self.out.push_str(" USING ");
            self.write_ident(using);
        }
        Ok(())
    }

    fn render_foreign_key_ref(&mut self, r: &ForeignKeyRef<'src>) -> Result<(), RenderError> {
        self.write_qualified_name(&r.table);
        if !r.columns.is_empty() {
            self.out.push('(');
            self.write_ident_list(&r.columns);
            self.out.push(')');
        }
        if let Some(a) = r.on_delete {
            self.out.push_str(" ON DELETE ");
            self.out.push_str(ref_action_str(a));
        }
        if let Some(a) = r.on_update {
            self.out.push_str(" ON UPDATE ");
            self.out.push_str(ref_action_str(a));
        }
        Ok(())
    }

    fn render_create_index(&mut self, i: &CreateIndex<'src>) -> Result<(), RenderError> {
        self.out.push_str("CREATE ");
        if i.unique {
            self.out.push_str("UNIQUE ");
        }
        self.out.push_str("INDEX ");
        if i.if_not_exists {
            self.out.push_str("IF NOT EXISTS ");
        }
        self.write_ident(&i.name);
        self.out.push_str(" ON ");
        self.write_qualified_name(&i.table);
        self.out.push_str(" (");
        self.write_index_columns(&i.columns);
        self.out.push(')');
        Ok(())
    }

    fn write_index_columns(&mut self, columns: &[IndexColumn<'src>]) {
        for (idx, col) in columns.iter().enumerate() {
            if idx > 0 {
                self.out.push_str(", ");
            }
            self.write_ident(&col.name);
            if let Some(len) = col.prefix_len {
                write!(self.out, "({len})").unwrap();
            }
            if col.desc {
                self.out.push_str(" DESC");
            }
        }
    }

    fn render_create_view(&mut self, v: &CreateView<'src>) -> Result<(), RenderError> {
        self.out.push_str("CREATE ");
        if v.or_replace {
            self.out.push_str("OR REPLACE ");
        }
        self.out.push_str("VIEW ");
        self.write_qualified_name(&v.name);
        if !v.columns.is_empty() {
            self.out.push('(');
            self.write_ident_list(&v.columns);
            self.out.push(')');
        }
        self.out.push_str(" AS ");
        self.render_stmt(v.query)
    }

    fn render_create_database(&mut self, d: &CreateDatabase<'src>) -> Result<(), RenderError> {
        self.out.push_str("CREATE DATABASE ");
        if d.if_not_exists {
            self.out.push_str("IF NOT EXISTS ");
        }
        self.write_ident(&d.name);
        Ok(())
    }

    fn render_alter_table(&mut self, a: &AlterTable<'src>) -> Result<(), RenderError> {
        self.out.push_str("ALTER TABLE ");
        self.write_qualified_name(&a.name);
        self.out.push(' ');
        for (i, action) in a.actions.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.render_alter_table_action(action)?;
        }
        Ok(())
    }

    fn render_alter_table_action(&mut self, action: &AlterTableAction<'src>) -> Result<(), RenderError> {
        match action {
            AlterTableAction::AddColumn { column, position } => {
                self.out.push_str("ADD COLUMN ");
                self.render_column_def(column)?;
                match position {
                    Some(ColumnPosition::First) => self.out.push_str(" FIRST"),
                    Some(ColumnPosition::After(ident)) => {
                        self.out.push_str(" AFTER ");
                        self.write_ident(ident);
                    }
                    None => {}
                }
            }
            AlterTableAction::DropColumn { name } => {
                self.out.push_str("DROP COLUMN ");
                self.write_ident(name);
            }
            AlterTableAction::RenameColumn { from, to } => {
                self.out.push_str("RENAME COLUMN ");
                self.write_ident(from);
                self.out.push_str(" TO ");
                self.write_ident(to);
            }
            AlterTableAction::ModifyColumn { column } => {
                self.out.push_str("MODIFY COLUMN ");
                self.render_column_def(column)?;
            }
            AlterTableAction::AddConstraint(c) => {
                self.out.push_str("ADD ");
                self.render_table_constraint(c)?;
            }
            AlterTableAction::DropConstraint { name } => {
                self.out.push_str("DROP CONSTRAINT ");
                self.write_ident(name);
            }
            AlterTableAction::RenameTable { to } => {
                self.out.push_str("RENAME TO ");
                self.write_qualified_name(to);
            }
            AlterTableAction::AddIndex { name, columns, unique } => {
                self.out.push_str("ADD ");
                if *unique {
                    self.out.push_str("UNIQUE ");
                }
                self.out.push_str("INDEX ");
                if let Some(name) = name {
                    self.write_ident(name);
                    self.out.push(' ');
                }
                self.out.push('(');
                self.write_index_columns(columns);
                self.out.push(')');
            }
        }
        Ok(())
    }

    fn render_alter_database(&mut self, a: &AlterDatabase<'src>) -> Result<(), RenderError> {
        self.out.push_str("ALTER DATABASE ");
        self.write_ident(&a.name);
        for opt in &a.options {
            self.out.push(' ');
            self.out.push_str(opt.name);
            if let Some(v) = opt.value {
                self.out.push('=');
                self.out.push_str(v);
            }
        }
        Ok(())
    }

    fn render_drop_table(&mut self, d: &DropTable<'src>) -> Result<(), RenderError> {
        self.out.push_str("DROP TABLE ");
        if d.if_exists {
            self.out.push_str("IF EXISTS ");
        }
        for (i, name) in d.names.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_qualified_name(name);
        }
        if d.cascade {
            self.out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// MySQL requires the owning table (`DROP INDEX name ON table`);
    /// PostgreSQL/SQLite drop by name alone.
    fn render_drop_index(&mut self, d: &DropIndex<'src>) -> Result<(), RenderError> {
        self.out.push_str("DROP INDEX ");
        match self.opts.dialect {
            Dialect::MySql => {
                self.write_ident(&d.name);
                if let Some(table) = &d.table {
                    self.out.push_str(" ON ");
                    self.write_qualified_name(table);
                } else {
                    self.unmodeled("DROP INDEX without owning table (MySQL target)")?;
                }
            }
            Dialect::Postgres | Dialect::Sqlite => {
                if d.if_exists {
                    self.out.push_str("IF EXISTS ");
                }
                self.write_ident(&d.name);
            }
        }
        Ok(())
    }

    fn render_drop_database(&mut self, d: &DropDatabase<'src>) -> Result<(), RenderError> {
        self.out.push_str("DROP DATABASE ");
        if d.if_exists {
            self.out.push_str("IF EXISTS ");
        }
        self.write_ident(&d.name);
        Ok(())
    }

    // -- table refs -----------------------------------------------------

    fn render_table_ref(&mut self, id: TableRefId) -> Result<(), RenderError> {
        match self.arena.table_ref(id).clone() {
            TableRef::Named { name, alias } => {
                self.write_qualified_name(&name);
                if let Some(alias) = &alias {
                    self.out.push(' ');
                    self.write_ident(alias);
                }
            }
            TableRef::Subquery { stmt, alias } => {
                self.out.push('(');
                self.render_stmt(stmt)?;
                self.out.push(')');
                if let Some(alias) = &alias {
                    self.out.push(' ');
                    self.write_ident(alias);
                }
            }
            TableRef::Join { left, right, kind, natural, on, using } => {
                self.render_table_ref(left)?;
                self.out.push(' ');
                if natural {
                    self.out.push_str("NATURAL ");
                }
                self.out.push_str(match kind {
                    JoinKind::Inner => "JOIN",
                    JoinKind::Left => "LEFT JOIN",
                    JoinKind::Right => "RIGHT JOIN",
                    JoinKind::Full => "FULL JOIN",
                    JoinKind::Cross => "CROSS JOIN",
                });
                self.out.push(' ');
                self.render_table_ref(right)?;
                if let Some(on) = on {
                    self.out.push_str(" ON ");
                    self.render_expr(on)?;
                } else if !using.is_empty() {
                    self.out.push_str(" USING (");
                    self.write_ident_list(&using);
                    self.out.push(')');
                }
            }
        }
        Ok(())
    }

    // -- expressions -------------------------------------------------------

    fn render_expr_list(&mut self, exprs: &[ExprId]) -> Result<(), RenderError> {
        for (i, &e) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.render_expr(e)?;
        }
        Ok(())
    }

    fn render_expr(&mut self, id: ExprId) -> Result<(), RenderError> {
        match self.arena.expr(id).clone() {
            Expr::Ident(ident) => self.write_ident(&ident),
            Expr::QualifiedIdent(name) => self.write_qualified_name(&name),
            Expr::Star => self.out.push('*'),
            Expr::QualifiedStar(name) => {
                self.write_qualified_name(&name);
                self.out.push_str(".*");
            }
            Expr::IntegerLiteral(raw) | Expr::FloatLiteral(raw) => self.out.push_str(raw),
            Expr::StringLiteral(raw) | Expr::HexLiteral(raw) | Expr::BitLiteral(raw) => {
                self.out.push_str(raw)
            }
            Expr::BoolLiteral(b) => self.out.push_str(if b { "TRUE" } else { "FALSE" }),
            Expr::Null => self.out.push_str("NULL"),
            Expr::Param(_) => self.write_param(),
            Expr::Paren(inner) => {
                self.out.push('(');
                self.render_expr(inner)?;
                self.out.push(')');
            }
            Expr::Unary { op, expr } => {
                self.out.push_str(unary_op_str(op));
                if matches!(op, UnaryOp::Not) {
                    self.out.push(' ');
                }
                self.render_expr(expr)?;
            }
            Expr::Binary { op, lhs, rhs } => {
                self.render_expr(lhs)?;
                write!(self.out, " {} ", bin_op_str(op)).unwrap();
                self.render_expr(rhs)?;
            }
            Expr::FuncCall { name, args, distinct, star } => {
                self.write_func_name(&name);
                self.out.push('(');
                if distinct {
                    self.out.push_str("DISTINCT ");
                }
                if star {
                    self.out.push('*');
                } else {
                    self.render_expr_list(&args)?;
                }
                self.out.push(')');
            }
            Expr::Case { operand, whens, or_else } => {
                self.out.push_str("CASE");
                if let Some(operand) = operand {
                    self.out.push(' ');
                    self.render_expr(operand)?;
                }
                for (cond, result) in &whens {
                    self.out.push_str(" WHEN ");
                    self.render_expr(*cond)?;
                    self.out.push_str(" THEN ");
                    self.render_expr(*result)?;
                }
                if let Some(or_else) = or_else {
                    self.out.push_str(" ELSE ");
                    self.render_expr(or_else)?;
                }
                self.out.push_str(" END");
            }
            Expr::Cast { expr, type_name } => {
                self.out.push_str("CAST(");
                self.render_expr(expr)?;
                self.out.push_str(" AS ");
                self.render_data_type(&type_name);
                self.out.push(')');
            }
            Expr::Between { expr, negated, low, high } => {
                self.render_expr(expr)?;
                self.out.push_str(if negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.render_expr(low)?;
                self.out.push_str(" AND ");
                self.render_expr(high)?;
            }
            Expr::InList { expr, negated, list } => {
                self.render_expr(expr)?;
                self.out.push_str(if negated { " NOT IN (" } else { " IN (" });
                self.render_expr_list(&list)?;
                self.out.push(')');
            }
            Expr::InSubquery { expr, negated, subquery } => {
                self.render_expr(expr)?;
                self.out.push_str(if negated { " NOT IN (" } else { " IN (" });
                self.render_stmt(subquery)?;
                self.out.push(')');
            }
            Expr::Like { expr, negated, pattern, escape } => {
                self.render_expr(expr)?;
                self.out.push_str(if negated { " NOT LIKE " } else { " LIKE " });
                self.render_expr(pattern)?;
                if let Some(escape) = escape {
                    self.out.push_str(" ESCAPE ");
                    self.render_expr(escape)?;
                }
            }
            Expr::IsNull { expr, negated } => {
                self.render_expr(expr)?;
                self.out.push_str(if negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Exists { subquery } => {
                self.out.push_str("EXISTS (");
                self.render_stmt(subquery)?;
                self.out.push(')');
            }
            Expr::Subquery(stmt) => {
                self.out.push('(');
                self.render_stmt(stmt)?;
                self.out.push(')');
            }
            Expr::Interval { value, unit } => {
                write!(self.out, "INTERVAL {value}").unwrap();
                if let Some(unit) = unit {
                    self.out.push(' ');
                    self.write_ident(&unit);
                }
            }
        }
        Ok(())
    }

    /// `IFNULL`/`COALESCE` are the one function-name rewrite this renderer
    /// performs; every other name is passed through verbatim. Multi-part
    /// (schema-qualified) names are never rewritten.
    fn write_func_name(&mut self, name: &QualifiedName<'src>) {
        if name.parts.len() == 1 {
            let text = name.parts[0].text;
            if text.eq_ignore_ascii_case("ifnull") || text.eq_ignore_ascii_case("coalesce") {
                self.out.push_str(match self.opts.dialect {
                    Dialect::MySql => "IFNULL",
                    Dialect::Postgres | Dialect::Sqlite => "COALESCE",
                });
                return;
            }
        }
        self.write_qualified_name(name);
    }

    /// Every parameter, regardless of its original spelling, renders as a
    /// bare `?` for MySQL/SQLite or the next `$N` for PostgreSQL.
    fn write_param(&mut self) {
        match self.opts.dialect {
            Dialect::MySql | Dialect::Sqlite => self.out.push('?'),
            Dialect::Postgres => {
                self.param_counter += 1;
                write!(self.out, "${}", self.param_counter).unwrap();
            }
        }
    }
}

fn ref_action_str(a: RefAction) -> &'static str {
    match a {
        RefAction::Cascade => "CASCADE",
        RefAction::SetNull => "SET NULL",
        RefAction::SetDefault => "SET DEFAULT",
        RefAction::Restrict => "RESTRICT",
        RefAction::NoAction => "NO ACTION",
    }
}

fn unary_op_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Pos => "+",
        UnaryOp::Not => "NOT",
        UnaryOp::BitNot => "~",
    }
}

fn bin_op_str(op: BinOp) -> &'static str {
    use BinOp::*;
    match op {
        Or => "OR",
        And => "AND",
        Eq => "=",
        NotEq => "!=",
        Lt => "<",
        Gt => ">",
        Le => "<=",
        Ge => ">=",
        Concat => "||",
        BitOr => "|",
        BitAnd => "&",
        BitXor => "^",
        Shl => "<<",
        Shr => ">>",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        JsonArrow => "->",
        JsonArrowText => "->>",
        JsonHashArrow => "#>",
        JsonHashArrowText => "#>>",
        JsonContains => "@>",
        JsonContainedBy => "<@",
        JsonExists => "?",
        JsonExistsAny => "?|",
        JsonExistsAll => "?&",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render_sql(src: &str, dialect: Dialect) -> String {
        let (arena, stmts) = crate::parse_all(src).unwrap();
        render(&arena, &stmts, Options::new(dialect)).unwrap()
    }

    #[test]
    fn identifier_quoting_translates_quote_character() {
        let sql = render_sql(r#"SELECT "a" FROM "t""#, Dialect::MySql);
        assert_eq!(sql, "SELECT `a` FROM `t`;");
    }

    #[test]
    fn bare_identifiers_stay_unquoted() {
        let sql = render_sql("SELECT a FROM t", Dialect::Postgres);
        assert_eq!(sql, "SELECT a FROM t;");
    }

    #[test]
    fn ifnull_becomes_coalesce_outside_mysql() {
        let sql = render_sql("SELECT IFNULL(name, 'x') FROM users", Dialect::Postgres);
        assert_eq!(sql, "SELECT COALESCE(name, 'x') FROM users;");
    }

    #[test]
    fn coalesce_becomes_ifnull_for_mysql() {
        let sql = render_sql("SELECT COALESCE(name, 'x') FROM users", Dialect::MySql);
        assert_eq!(sql, "SELECT IFNULL(name, 'x') FROM users;");
    }

    #[test]
    fn params_renumber_for_postgres() {
        let sql = render_sql("SELECT * FROM t WHERE a = ? AND b = ?", Dialect::Postgres);
        assert_eq!(sql, "SELECT * FROM t WHERE a = $1 AND b = $2;");
    }

    #[test]
    fn named_params_also_renumber_for_postgres() {
        let sql = render_sql("SELECT * FROM t WHERE a = :x AND b = :y", Dialect::Postgres);
        assert_eq!(sql, "SELECT * FROM t WHERE a = $1 AND b = $2;");
    }

    #[test]
    fn params_stay_qmark_for_sqlite() {
        let sql = render_sql("SELECT * FROM t WHERE a = :x", Dialect::Sqlite);
        assert_eq!(sql, "SELECT * FROM t WHERE a = ?;");
    }

    #[test]
    fn upsert_dialect_translation_scenario() {
        let src = "INSERT INTO users (id, name) VALUES (1, IFNULL(:name, 'x')) \
                   ON DUPLICATE KEY UPDATE name = IFNULL(:name, name)";
        let sql = render_sql(src, Dialect::Postgres);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES (1, COALESCE($1, 'x')) \
             ON CONFLICT (id) DO UPDATE SET name = COALESCE($2, name);"
        );
    }

    #[test]
    fn on_conflict_translates_to_mysql() {
        let src = "INSERT INTO users (id) VALUES (1) ON CONFLICT (id) DO UPDATE SET id = 2";
        let sql = render_sql(src, Dialect::MySql);
        assert_eq!(sql, "INSERT INTO users (id) VALUES (1) ON DUPLICATE KEY UPDATE id = 2;");
    }

    #[test]
    fn insert_ignore_dropped_outside_mysql() {
        let sql = render_sql("INSERT IGNORE INTO t (a) VALUES (1)", Dialect::Postgres);
        assert_eq!(sql, "INSERT INTO t (a) VALUES (1);");
    }

    #[test]
    fn jsonb_translates_per_dialect() {
        assert_eq!(render_sql("CREATE TABLE t (a JSONB)", Dialect::MySql), "CREATE TABLE t (a JSON);");
        assert_eq!(render_sql("CREATE TABLE t (a JSONB)", Dialect::Sqlite), "CREATE TABLE t (a TEXT);");
        assert_eq!(render_sql("CREATE TABLE t (a JSONB)", Dialect::Postgres), "CREATE TABLE t (a JSONB);");
    }

    #[test]
    fn unsigned_suppressed_outside_mysql() {
        let sql = render_sql("CREATE TABLE t (a INT UNSIGNED)", Dialect::Postgres);
        assert_eq!(sql, "CREATE TABLE t (a INT);");
    }

    #[test]
    fn auto_increment_translates_to_identity_for_postgres() {
        let sql = render_sql("CREATE TABLE t (id INT AUTO_INCREMENT)", Dialect::Postgres);
        assert_eq!(sql, "CREATE TABLE t (id INT GENERATED BY DEFAULT AS IDENTITY);");
    }

    #[test]
    fn drop_index_forms_differ_by_dialect() {
        let sql = render_sql("DROP INDEX idx ON t", Dialect::MySql);
        assert_eq!(sql, "DROP INDEX idx ON t;");
        let sql = render_sql("DROP INDEX idx ON t", Dialect::Postgres);
        assert_eq!(sql, "DROP INDEX idx;");
    }

    #[test]
    fn rendering_same_tree_twice_is_deterministic() {
        let (arena, stmts) = crate::parse_all("SELECT a FROM t WHERE a = ?").unwrap();
        let once = render(&arena, &stmts, Options::new(Dialect::Postgres)).unwrap();
        let twice = render(&arena, &stmts, Options::new(Dialect::Postgres)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn strict_mode_errors_on_missing_conflict_target() {
        let src = "INSERT INTO users (id) VALUES (1) ON DUPLICATE KEY UPDATE id = 2";
        let (arena, _) = crate::parse_all(src).unwrap();
        // Columns present, so non-strict synthesizes a target from them;
        // strict mode with no column list at all should fail instead.
        let src_no_cols = "INSERT INTO users VALUES (1) ON DUPLICATE KEY UPDATE id = 2";
        let (arena2, stmts2) = crate::parse_all(src_no_cols).unwrap();
        let err = render(&arena2, &stmts2, Options::strict(Dialect::Postgres)).unwrap_err();
        assert_eq!(err, RenderError::MissingConflictTarget);
        drop(arena);
    }

    #[test]
    fn transcode_parses_and_renders_in_one_call() {
        let out = transcode("SELECT IFNULL(a, 1) FROM t", Dialect::MySql, Dialect::Postgres, false).unwrap();
        assert_eq!(out, "SELECT COALESCE(a, 1) FROM t;");
    }
}
