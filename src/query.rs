//! Query engine.
//!
//! Answers "where was the subject at or around time T" against a loaded
//! database snapshot. Out-of-range queries degrade to the nearest recorded
//! entry with an advisory diagnostic; they are not errors.

use crate::database::{Database, DbEntry};

/// The entry at or after `epoch`.
///
/// Scans the (ascending) snapshot for the first entry whose epoch is
/// `>= epoch`. A query before all recorded data returns the first entry; a
/// query after all recorded data returns the last. Both cases log a
/// warning and are otherwise indistinguishable from a direct hit.
///
/// Returns `None` only for an empty database.
pub fn nearest(db: &Database, epoch: i64) -> Option<DbEntry> {
    let first = db.entries.first()?;
    if epoch < first.epoch() {
        tracing::warn!(epoch, "query predates recorded history, returning earliest entry");
        return Some(*first);
    }

    match db.entries.iter().find(|e| e.epoch() >= epoch) {
        Some(entry) => Some(*entry),
        None => {
            tracing::warn!(epoch, "no entry at or after query, returning most recent");
            db.entries.last().copied()
        }
    }
}

/// Every entry within `delta_secs` of `epoch` (inclusive), in database
/// order. An empty result is not an error; the caller decides whether to
/// diagnose it.
pub fn within(db: &Database, epoch: i64, delta_secs: i64) -> Vec<DbEntry> {
    db.entries
        .iter()
        .filter(|e| (e.epoch() - epoch).abs() <= delta_secs)
        .copied()
        .collect()
}
