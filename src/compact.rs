//! Sample filtering and compaction.
//!
//! Raw samples arrive dense (a GPS logger can emit one every few seconds)
//! and noisy. The filter drops readings whose accuracy radius is too wide
//! to be useful; the compactor then reduces the remainder to representative
//! points: a new point is kept only once we have moved far enough from the
//! last kept point, or enough time has passed since it.

use chrono::Duration;

use crate::error::{Result, WhereDbError};
use crate::location::{haversine_distance, CompactPoint, RawSample};

/// Meters of reported accuracy above which a sample is discarded
pub const DEFAULT_ACCURACY_FILTER: f64 = 300.0;

/// Meters from the last kept point before a new one is emitted
pub const DEFAULT_NEW_POINT_DISTANCE: f64 = 100.0;

/// Seconds since the last kept point before a new one is emitted anyway
pub const DEFAULT_NEW_POINT_DURATION_SECS: u64 = 3 * 60 * 60;

/// Keep samples with a known accuracy strictly below the threshold.
///
/// Samples with `accuracy == accuracy_filter` are excluded, as are samples
/// whose source reported no accuracy at all. No ordering is imposed here.
pub fn filter_by_accuracy<I>(samples: I, accuracy_filter: f64) -> impl Iterator<Item = RawSample>
where
    I: IntoIterator<Item = RawSample>,
{
    samples
        .into_iter()
        .filter(move |s| s.accuracy.is_some_and(|a| a < accuracy_filter))
}

/// Reduce a filtered sample stream to representative points.
///
/// Sorts the samples by timestamp (the caller need not), always keeps the
/// first, and thereafter keeps a sample when the haversine distance to the
/// last kept sample exceeds `new_point_distance` meters OR the elapsed time
/// since it exceeds `new_point_duration`.
///
/// Output timestamps are non-decreasing and every output point is one of
/// the inputs.
///
/// # Errors
/// [`WhereDbError::EmptyInput`] when no samples remain after filtering;
/// there is nothing to seed the last-kept pointer with.
pub fn compact<I>(
    samples: I,
    new_point_distance: f64,
    new_point_duration: Duration,
) -> Result<Vec<CompactPoint>>
where
    I: IntoIterator<Item = RawSample>,
{
    let mut samples: Vec<RawSample> = samples.into_iter().collect();
    samples.sort_by_key(|s| s.dt);

    let mut iter = samples.into_iter();
    let mut last = iter.next().ok_or(WhereDbError::EmptyInput)?;
    let mut points = vec![CompactPoint::from_sample(&last)];

    for cur in iter {
        let dist = haversine_distance(last.lat, last.lon, cur.lat, cur.lon);
        // far enough away, or we haven't kept a point recently
        if dist > new_point_distance || cur.dt - last.dt > new_point_duration {
            points.push(CompactPoint::from_sample(&cur));
            last = cur;
        }
    }

    tracing::debug!(points = points.len(), "compacted sample stream");
    Ok(points)
}
