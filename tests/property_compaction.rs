//! Property-based compaction tests (proptest).

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use wheredb::{compact, haversine_distance, RawSample};

const NEW_POINT_DISTANCE: f64 = 100.0;
const NEW_POINT_DURATION_SECS: i64 = 3 * 60 * 60;

fn arb_sample() -> impl Strategy<Value = RawSample> {
    (
        -85.0f64..85.0,
        -180.0f64..180.0,
        // epoch range covering a few months of 2020
        1_577_836_800i64..1_588_000_000,
    )
        .prop_map(|(lat, lon, epoch)| RawSample {
            lat,
            lon,
            accuracy: Some(10.0),
            dt: Utc
                .timestamp_opt(epoch, 0)
                .single()
                .expect("epoch in range")
                .fixed_offset(),
        })
}

proptest! {
    #[test]
    fn compacted_timestamps_are_non_decreasing(
        samples in prop::collection::vec(arb_sample(), 1..60)
    ) {
        let points = compact(
            samples,
            NEW_POINT_DISTANCE,
            Duration::seconds(NEW_POINT_DURATION_SECS),
        ).expect("non-empty input");

        for pair in points.windows(2) {
            prop_assert!(pair[0].dt <= pair[1].dt);
        }
    }

    #[test]
    fn compacted_points_are_a_subset_of_input(
        samples in prop::collection::vec(arb_sample(), 1..60)
    ) {
        let points = compact(
            samples.clone(),
            NEW_POINT_DISTANCE,
            Duration::seconds(NEW_POINT_DURATION_SECS),
        ).expect("non-empty input");

        prop_assert!(points.len() <= samples.len());
        for point in &points {
            prop_assert!(samples
                .iter()
                .any(|s| s.lat == point.lat && s.lon == point.lon));
        }
    }

    #[test]
    fn consecutive_points_satisfy_a_threshold(
        samples in prop::collection::vec(arb_sample(), 2..60)
    ) {
        let points = compact(
            samples,
            NEW_POINT_DISTANCE,
            Duration::seconds(NEW_POINT_DURATION_SECS),
        ).expect("non-empty input");

        // every kept point crossed at least one threshold relative to its
        // predecessor; both being under it simultaneously is impossible
        for pair in points.windows(2) {
            let dist = haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
            let elapsed = pair[1].dt - pair[0].dt;
            prop_assert!(
                dist >= NEW_POINT_DISTANCE
                    || elapsed >= Duration::seconds(NEW_POINT_DURATION_SECS),
                "dist {dist}m, elapsed {elapsed}"
            );
        }
    }

    #[test]
    fn first_sample_is_always_kept(
        samples in prop::collection::vec(arb_sample(), 1..60)
    ) {
        let mut sorted = samples.clone();
        sorted.sort_by_key(|s| s.dt);

        let points = compact(
            samples,
            NEW_POINT_DISTANCE,
            Duration::seconds(NEW_POINT_DURATION_SECS),
        ).expect("non-empty input");

        prop_assert_eq!(points[0].lat, sorted[0].lat);
        prop_assert_eq!(points[0].lon, sorted[0].lon);
    }
}
