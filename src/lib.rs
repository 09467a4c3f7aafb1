//! # wheredb
//!
//! Turns raw, noisy location samples from multiple sources into a compact,
//! gap-free daily timeline and answers "where was I at time T" against it.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Raw samples (per-source JSON exports)
//!     ↓
//! [Sample Filter]       → drop wide-accuracy readings
//!     ↓
//! [Compactor]           → representative points (distance/time thresholds)
//!     ↓
//! [Timeline Generator]  → one-or-more entries per calendar day
//!     ↑ consults
//! [Home Index]          → "where was home at time T" fallback
//!     ↓
//! [Database]            → JSON array of (lat, lon, epoch) triples
//!     ↓
//! [Query Engine]        → nearest-at-or-after / windowed lookup
//! ```
//!
//! Generation fully rewrites the database (atomically); queries fully load
//! it. Both are synchronous, single-threaded batch operations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wheredb::{compact, filter_by_accuracy, generate_timeline, Database, HomeIndex};
//!
//! let samples = wheredb::sources::load_samples(&config.sources.sample_files);
//! let filtered = filter_by_accuracy(samples, 300.0);
//! let points = compact(filtered, 100.0, chrono::Duration::hours(3))?;
//!
//! let home = HomeIndex::new(&history)?;
//! let timeline = generate_timeline(&points, &home, &params, now);
//! Database::from_timeline(&timeline).save(&path)?;
//! ```

pub mod compact;
pub mod config;
pub mod database;
pub mod dates;
pub mod error;
pub mod home;
pub mod location;
pub mod query;
pub mod sources;
pub mod timeline;

pub use compact::{compact, filter_by_accuracy};
pub use config::Config;
pub use database::{Database, DbEntry};
pub use error::{Result, WhereDbError};
pub use home::HomeIndex;
pub use location::{haversine_distance, CompactPoint, HomeEntry, RawSample, TimelineEntry};
pub use query::{nearest, within};
pub use timeline::{generate_timeline, TimelineParams};
