//! Length-bucketed keyword lookup.
//!
//! A hash map would force the caller to allocate (or at least hash) a fresh
//! `String` for every identifier just to find out it isn't a keyword.
//! Bucketing by length instead turns lookup into "index a small array, then
//! linearly scan a handful of byte-slice comparisons": zero allocation,
//! and the branch pattern is predictable because bucket sizes stay small
//! (the largest, length 4, has well under a dozen entries).

use super::token::{Keyword, MAX_KEYWORD_LEN};
use std::sync::OnceLock;

/// One bucket per keyword length, indexed by `len - MIN_LEN`. Built once on
/// first use and cached in a process-wide, read-only `OnceLock`; the
/// keyword table is immutable after initialization and safe to read from
/// any number of threads concurrently.
struct Table {
    buckets: Vec<Vec<(&'static str, Keyword)>>,
}

const MIN_LEN: usize = 2;

fn build_table() -> Table {
    let mut buckets: Vec<Vec<(&'static str, Keyword)>> =
        vec![Vec::new(); MAX_KEYWORD_LEN - MIN_LEN + 1];
    for &(text, kw) in Keyword::ALL {
        buckets[text.len() - MIN_LEN].push((text, kw));
    }
    Table { buckets }
}

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Looks up a lowercase byte slice in the keyword table. Never allocates,
/// never panics: any input either matches a declared keyword or is treated
/// as a plain identifier.
pub fn lookup(lowercase: &[u8]) -> Option<Keyword> {
    let len = lowercase.len();
    if !(MIN_LEN..=MAX_KEYWORD_LEN).contains(&len) {
        return None;
    }

    table().buckets[len - MIN_LEN]
        .iter()
        .find(|(text, _)| text.as_bytes() == lowercase)
        .map(|(_, kw)| *kw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_declared_keyword_case_insensitively() {
        for &(text, kw) in Keyword::ALL {
            let upper = text.to_ascii_uppercase();
            assert_eq!(lookup(upper.to_ascii_lowercase().as_bytes()), Some(kw));
        }
    }

    #[test]
    fn non_keyword_returns_none() {
        assert_eq!(lookup(b"frobnicate"), None);
        assert_eq!(lookup(b"x"), None);
        assert_eq!(lookup(b""), None);
        assert_eq!(lookup(b"this_identifier_is_longer_than_any_keyword"), None);
    }
}
