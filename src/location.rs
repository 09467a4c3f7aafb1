//! Core data model: raw samples, compacted points, home history entries,
//! and the timeline entries that end up in the database.
//!
//! All timestamps downstream of the compactor are timezone-naive: the
//! offset is discarded and the wall-clock value kept, never shifted.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single raw position reading from an upstream source.
///
/// Sources may emit samples in any order and with duplicate timestamps;
/// ordering is established by the compactor. A sample with no accuracy
/// annotation is unusable and dropped by the filter stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    pub lat: f64,
    pub lon: f64,
    /// Accuracy radius in meters, when the source reports one
    pub accuracy: Option<f64>,
    /// Timestamp as reported by the source, offset included
    pub dt: DateTime<FixedOffset>,
}

/// A representative point kept by the compactor.
///
/// Consecutive points are guaranteed to differ by more than the distance
/// threshold or the duration threshold; the sample that triggered the
/// emission is kept verbatim, never averaged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactPoint {
    pub lat: f64,
    pub lon: f64,
    pub dt: NaiveDateTime,
}

impl CompactPoint {
    pub fn from_sample(sample: &RawSample) -> Self {
        CompactPoint {
            lat: sample.lat,
            lon: sample.lon,
            dt: naive(sample.dt),
        }
    }
}

/// One entry of the externally maintained home-location history.
///
/// Externally owned and read-only to this crate; not assumed sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeEntry {
    pub dt: DateTime<FixedOffset>,
    pub lat: f64,
    pub lon: f64,
}

/// One point of the generated timeline; at least one exists per calendar
/// day between the start of home history and "tomorrow".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEntry {
    pub lat: f64,
    pub lon: f64,
    pub dt: NaiveDateTime,
}

impl TimelineEntry {
    /// Epoch seconds of this entry, truncating any sub-second component.
    pub fn epoch(&self) -> i64 {
        self.dt.and_utc().timestamp()
    }
}

/// Strip the timezone offset, keeping the wall-clock value.
pub fn naive(dt: DateTime<FixedOffset>) -> NaiveDateTime {
    dt.naive_local()
}

/// Haversine great-circle distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}
