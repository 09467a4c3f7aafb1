//! Timeline generation.
//!
//! Walks one calendar day at a time from the earliest known date to
//! tomorrow, emitting real compacted points for days that have them and a
//! heuristic fallback otherwise, so the resulting timeline has no gaps.
//!
//! ## Fallback heuristic
//!
//! For a day with no direct data there are two candidates:
//!
//! - **continuation**: re-emit the coordinates of the last accurate point
//!   with the current day's timestamp. Used only when both heuristic
//!   parameters are configured and either the day is past the cutoff date
//!   (accurate data is expected from then on, so a hole means "still
//!   there") or the last accurate point is recent enough to still trust.
//! - **home**: the home-history answer for the day. Never updates the
//!   last-accurate point.
//!
//! Note the condition is a literal OR: once the cutoff date is reached the
//! decay window no longer bounds continuation, however old the last
//! accurate point is. `test_continuation_unbounded_after_cutoff` pins this.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::home::HomeIndex;
use crate::location::{CompactPoint, TimelineEntry};

/// Heuristic parameters for days without direct data.
///
/// When either field is `None` the continuation heuristic is disabled and
/// every day without data falls back to the home history.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineParams {
    /// Date after which locations are trusted over fallbacks
    pub accurate_date_cutoff: Option<NaiveDate>,
    /// How many days a stale accurate point keeps being re-used before the
    /// cutoff
    pub previous_accurate_for_days: Option<i64>,
}

impl TimelineParams {
    fn heuristics_enabled(&self) -> bool {
        self.accurate_date_cutoff.is_some() && self.previous_accurate_for_days.is_some()
    }
}

/// Generate the gap-free daily timeline.
///
/// `now` is passed in explicitly so a run is deterministic for fixed
/// inputs; the walk covers every calendar day up to and including the day
/// of `now + 1 day` (one slack day absorbs timezone skew at the boundary).
///
/// Every day in range yields at least one entry; days with compacted
/// points yield one entry per point, in ascending order.
pub fn generate_timeline(
    points: &[CompactPoint],
    home: &HomeIndex,
    params: &TimelineParams,
    now: NaiveDateTime,
) -> Vec<TimelineEntry> {
    // relate each point to its calendar day
    let mut on_day: BTreeMap<NaiveDate, Vec<CompactPoint>> = BTreeMap::new();
    for point in points {
        on_day.entry(point.dt.date()).or_default().push(*point);
    }

    // start one day after the first home entry to sidestep timezone
    // artifacts at the boundary, unless real data reaches further back
    let mut cur: NaiveDateTime = home.earliest().dt + Duration::days(1);
    if let Some((first_day, first_points)) = on_day.first_key_value() {
        if *first_day < cur.date() {
            cur = first_points[0].dt;
        }
    }

    // compare calendar days, not instants: the cursor carries the
    // time-of-day of its seed entry, which must not decide whether the
    // final day is included
    let end_day = (now + Duration::days(1)).date();

    let mut last_accurate: Option<CompactPoint> = None;
    let mut timeline = Vec::new();

    while cur.date() <= end_day {
        match on_day.get(&cur.date()) {
            Some(day_points) => {
                for point in day_points {
                    timeline.push(TimelineEntry {
                        lat: point.lat,
                        lon: point.lon,
                        dt: point.dt,
                    });
                    last_accurate = Some(*point);
                }
            }
            None => {
                if let Some(last) = continuation_candidate(params, last_accurate, cur) {
                    timeline.push(TimelineEntry {
                        lat: last.lat,
                        lon: last.lon,
                        dt: cur,
                    });
                } else {
                    let h = home.at(cur);
                    timeline.push(TimelineEntry {
                        lat: h.lat,
                        lon: h.lon,
                        dt: cur,
                    });
                }
            }
        }
        cur += Duration::days(1);
    }

    tracing::debug!(entries = timeline.len(), "generated timeline");
    timeline
}

/// The last accurate point, if the heuristic says it should stand in for
/// a day without data.
fn continuation_candidate(
    params: &TimelineParams,
    last_accurate: Option<CompactPoint>,
    cur: NaiveDateTime,
) -> Option<CompactPoint> {
    if !params.heuristics_enabled() {
        return None;
    }
    let last = last_accurate?;
    let cutoff = params.accurate_date_cutoff?;
    let for_days = params.previous_accurate_for_days?;

    let days_since = (cur - last.dt).num_days().abs();
    if cur.date() >= cutoff || days_since < for_days {
        Some(last)
    } else {
        None
    }
}
