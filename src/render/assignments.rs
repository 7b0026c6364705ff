//! Conflict-target synthesis for upsert translation.
//!
//! MySQL's `ON DUPLICATE KEY UPDATE` names no conflict target at all; the
//! engine infers it from whichever unique constraint the row collides with.
//! The standard `ON CONFLICT` clause PostgreSQL and SQLite require one
//! explicitly. When translating from the MySQL form there is nothing in the
//! parsed tree naming that constraint, so this falls back to the INSERT's
//! own column list: the first column named is assumed to be the table's key,
//! which holds for the common `INSERT ... (id, ...) VALUES (...) ON
//! DUPLICATE KEY UPDATE ...` shape this crate is asked to translate.

use crate::ast::{Ident, Insert, OnConflict};

/// Returns the conflict target columns to emit for `oc`, or `None` if there
/// is nothing to synthesize one from.
pub(super) fn conflict_target<'src>(
    oc: &OnConflict<'src>,
    ins: &Insert<'src>,
) -> Option<Vec<Ident<'src>>> {
    if !oc.target.is_empty() {
        return Some(oc.target.clone());
    }
    ins.columns.first().map(|first| vec![*first])
}
