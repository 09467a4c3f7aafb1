//! Database persistence.
//!
//! The timeline is persisted as a single JSON document whose root is an
//! array of `[latitude, longitude, epoch_seconds]` triples, ascending by
//! epoch. The file is small and regenerated wholesale on a daily cadence,
//! so reads load the whole document into memory and writes replace the
//! whole file.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WhereDbError};
use crate::location::TimelineEntry;

/// One persisted `(lat, lon, epoch)` triple.
///
/// Serializes as a 3-element JSON array. Epoch is integer seconds; the
/// conversion from [`TimelineEntry`] truncates sub-second components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbEntry(pub f64, pub f64, pub i64);

impl DbEntry {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }

    pub fn epoch(&self) -> i64 {
        self.2
    }
}

impl From<&TimelineEntry> for DbEntry {
    fn from(entry: &TimelineEntry) -> Self {
        DbEntry(entry.lat, entry.lon, entry.epoch())
    }
}

/// A fully loaded database snapshot.
///
/// Invariant: entries are ascending by epoch. Generation runs produce them
/// in order; the query engine relies on the ordering and does not
/// re-verify it.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub entries: Vec<DbEntry>,
}

impl Database {
    /// Convert a generated timeline into its persisted form.
    pub fn from_timeline(timeline: &[TimelineEntry]) -> Self {
        Database {
            entries: timeline.iter().map(DbEntry::from).collect(),
        }
    }

    /// Load and parse the whole database file.
    ///
    /// # Errors
    /// [`WhereDbError::Format`] when the document root is not an array or
    /// an element is not a `[number, number, integer]` triple.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| WhereDbError::Format(format!("not valid JSON: {e}")))?;

        if !value.is_array() {
            return Err(WhereDbError::Format(
                "top-level structure is not an array".to_string(),
            ));
        }

        let entries: Vec<DbEntry> = serde_json::from_value(value)
            .map_err(|e| WhereDbError::Format(format!("expected [lat, lon, epoch] triples: {e}")))?;

        tracing::debug!(entries = entries.len(), path = %path.display(), "loaded database");
        Ok(Database { entries })
    }

    /// Write the database to `path`, atomically.
    ///
    /// The document is written to a temporary sibling file and renamed
    /// into place, so a concurrent reader sees either the old or the new
    /// database, never a partial one.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer(&file, &self.entries)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;

        tracing::info!(entries = self.entries.len(), path = %path.display(), "saved database");
        Ok(())
    }

    /// Write the database document to any writer (the `generate`
    /// subcommand's stdout form; identical bytes to the file format).
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &self.entries)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
