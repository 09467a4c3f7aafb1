//! Home location index.
//!
//! A queryable view over the externally supplied home-location history,
//! answering "where was home at or before time T". Built once per
//! generation run and passed by reference to the timeline generator; its
//! lifetime is an explicit input of the run, not a hidden process-wide
//! cache.

use chrono::NaiveDateTime;

use crate::error::{Result, WhereDbError};
use crate::location::{naive, HomeEntry, TimelineEntry};

/// Normalized home history entry, timezone stripped
#[derive(Debug, Clone, Copy, PartialEq)]
struct HomePoint {
    dt: NaiveDateTime,
    lat: f64,
    lon: f64,
}

/// Reverse-chronological lookup over the home history.
#[derive(Debug, Clone)]
pub struct HomeIndex {
    /// Sorted ascending by timestamp; [`HomeIndex::at`] scans it in reverse.
    ascending: Vec<HomePoint>,
}

impl HomeIndex {
    /// Build the index from the (possibly unsorted) home history.
    ///
    /// # Errors
    /// [`WhereDbError::EmptyInput`] when the history is empty: without any
    /// home entry there is no fallback location and no start date for a
    /// generation run.
    pub fn new(entries: &[HomeEntry]) -> Result<Self> {
        if entries.is_empty() {
            return Err(WhereDbError::EmptyInput);
        }

        let mut ascending: Vec<HomePoint> = entries
            .iter()
            .map(|e| HomePoint {
                dt: naive(e.dt),
                lat: e.lat,
                lon: e.lon,
            })
            .collect();
        ascending.sort_by_key(|p| p.dt);

        Ok(HomeIndex { ascending })
    }

    /// The most recent home at or before `t`.
    ///
    /// When `t` precedes all recorded history this returns the earliest
    /// known home -- a deliberate "no data before recorded history"
    /// default, not an error. The returned entry carries the home entry's
    /// own timestamp.
    pub fn at(&self, t: NaiveDateTime) -> TimelineEntry {
        let point = self
            .ascending
            .iter()
            .rev()
            .find(|p| p.dt <= t)
            .unwrap_or(&self.ascending[0]);

        TimelineEntry {
            lat: point.lat,
            lon: point.lon,
            dt: point.dt,
        }
    }

    /// The chronologically first home entry.
    pub fn earliest(&self) -> TimelineEntry {
        let first = &self.ascending[0];
        TimelineEntry {
            lat: first.lat,
            lon: first.lon,
            dt: first.dt,
        }
    }
}
