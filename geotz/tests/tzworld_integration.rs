//! Integration tests for the geometric index.
//!
//! These tests drive the full pipeline over synthetic shapefile pairs:
//! paired stream parsing, extent building, spatial index construction, and
//! point lookup.

mod common;

use common::{dbf_file, exclude_ring, include_ring, null_record, polygon_record, typed_record, shp_file};

use geotz::coord::CoordError;
use geotz::shapefile::ParseError;
use geotz::tzworld::{BuildError, TzWorld};

fn build(shp: Vec<u8>, dbf: Vec<u8>) -> Result<TzWorld, BuildError> {
    TzWorld::from_readers(&shp[..], &dbf[..])
}

/// One extent around San Jose, wide enough to cover the Bay Area test point.
fn los_angeles_world() -> TzWorld {
    let shp = shp_file(&[polygon_record(1, &[include_ring(-123.0, 36.0, -121.0, 38.5)])]);
    let dbf = dbf_file(&[Some("America/Los_Angeles")]);
    build(shp, dbf).expect("synthetic world builds")
}

#[test]
fn test_point_resolves_to_zone() {
    let world = los_angeles_world();
    assert_eq!(
        world.find_zone(37.29390, -121.91413).unwrap(),
        Some("America/Los_Angeles")
    );
}

#[test]
fn test_open_ocean_misses() {
    let world = los_angeles_world();
    assert_eq!(world.find_zone(0.0, 50.0).unwrap(), None);
}

#[test]
fn test_find_zone_extent_returns_full_extent() {
    let world = los_angeles_world();
    let extent = world
        .find_zone_extent(37.29390, -121.91413)
        .unwrap()
        .expect("extent found");
    assert_eq!(extent.zone(), "America/Los_Angeles");
    assert_eq!(extent.includes().len(), 1);
    assert!(extent.excludes().is_empty());
}

#[test]
fn test_domain_bounds_are_errors() {
    let world = los_angeles_world();
    assert_eq!(
        world.find_zone(90.0, 0.0),
        Err(CoordError::InvalidLatitude(90.0))
    );
    assert_eq!(
        world.find_zone(0.0, 180.0),
        Err(CoordError::InvalidLongitude(180.0))
    );
    assert_eq!(world.find_zone(-90.0, -180.0).unwrap(), None);
}

#[test]
fn test_first_match_wins_on_overlap() {
    // both extents cover (10.5, 10.5); storage order decides
    let shp = shp_file(&[
        polygon_record(1, &[include_ring(10.0, 10.0, 11.0, 11.0)]),
        polygon_record(2, &[include_ring(10.0, 10.0, 12.0, 12.0)]),
    ]);
    let dbf = dbf_file(&[Some("First/Zone"), Some("Second/Zone")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.find_zone(10.5, 10.5).unwrap(), Some("First/Zone"));
    // outside the first extent, the second still matches
    assert_eq!(world.find_zone(11.5, 11.5).unwrap(), Some("Second/Zone"));
}

#[test]
fn test_exclude_ring_is_a_hole() {
    let shp = shp_file(&[polygon_record(
        1,
        &[
            include_ring(0.0, 0.0, 4.0, 4.0),
            exclude_ring(1.0, 1.0, 2.0, 2.0),
        ],
    )]);
    let dbf = dbf_file(&[Some("Test/Zone")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.find_zone(3.0, 3.0).unwrap(), Some("Test/Zone"));
    assert_eq!(world.find_zone(1.5, 1.5).unwrap(), None);
}

#[test]
fn test_hole_does_not_veto_other_extents() {
    // the hole is cut out of the first extent only; a later extent still
    // covers the point
    let shp = shp_file(&[
        polygon_record(
            1,
            &[
                include_ring(0.0, 0.0, 4.0, 4.0),
                exclude_ring(1.0, 1.0, 2.0, 2.0),
            ],
        ),
        polygon_record(2, &[include_ring(1.0, 1.0, 2.0, 2.0)]),
    ]);
    let dbf = dbf_file(&[Some("Outer/Zone"), Some("Inner/Zone")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.find_zone(1.5, 1.5).unwrap(), Some("Inner/Zone"));
    assert_eq!(world.find_zone(3.0, 3.0).unwrap(), Some("Outer/Zone"));
}

#[test]
fn test_disjoint_fragments_both_resolve() {
    // one zone scattered across the globe, indexed per ring
    let shp = shp_file(&[polygon_record(
        1,
        &[
            include_ring(-1.0, -1.0, 1.0, 1.0),
            include_ring(100.0, 50.0, 102.0, 52.0),
        ],
    )]);
    let dbf = dbf_file(&[Some("Etc/GMT")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.find_zone(0.0, 0.0).unwrap(), Some("Etc/GMT"));
    assert_eq!(world.find_zone(51.0, 101.0).unwrap(), Some("Etc/GMT"));
    // the span between the fragments is not covered
    assert_eq!(world.find_zone(25.0, 50.0).unwrap(), None);
}

#[test]
fn test_null_shapes_are_skipped_but_stay_synchronized() {
    let shp = shp_file(&[
        null_record(1),
        polygon_record(2, &[include_ring(10.0, 10.0, 11.0, 11.0)]),
    ]);
    // the null shape's attribute row is consumed alongside it
    let dbf = dbf_file(&[Some("Ignored/Zone"), Some("Kept/Zone")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.len(), 1);
    assert_eq!(world.find_zone(10.5, 10.5).unwrap(), Some("Kept/Zone"));
}

#[test]
fn test_deleted_attribute_row_keeps_stream_synchronized() {
    let shp = shp_file(&[
        null_record(1),
        polygon_record(2, &[include_ring(10.0, 10.0, 11.0, 11.0)]),
    ]);
    let dbf = dbf_file(&[None, Some("Kept/Zone")]);
    let world = build(shp, dbf).unwrap();

    assert_eq!(world.find_zone(10.5, 10.5).unwrap(), Some("Kept/Zone"));
}

#[test]
fn test_polygon_without_zone_id_aborts_build() {
    let shp = shp_file(&[polygon_record(1, &[include_ring(0.0, 0.0, 1.0, 1.0)])]);
    let dbf = dbf_file(&[None]);
    assert!(matches!(
        build(shp, dbf),
        Err(BuildError::MissingZoneId { record: 1 })
    ));
}

#[test]
fn test_unsupported_shape_type_aborts_build() {
    let shp = shp_file(&[
        polygon_record(1, &[include_ring(0.0, 0.0, 1.0, 1.0)]),
        typed_record(2, 3), // a PolyLine record mid-stream
    ]);
    let dbf = dbf_file(&[Some("Test/Zone"), Some("Other/Zone")]);
    assert!(matches!(
        build(shp, dbf),
        Err(BuildError::Parse(ParseError::UnsupportedShapeType {
            record: 2,
            code: 3
        }))
    ));
}

#[test]
fn test_short_attribute_stream_aborts_build() {
    let shp = shp_file(&[
        polygon_record(1, &[include_ring(0.0, 0.0, 1.0, 1.0)]),
        polygon_record(2, &[include_ring(2.0, 2.0, 3.0, 3.0)]),
    ]);
    let dbf = dbf_file(&[Some("Test/Zone")]);
    assert!(matches!(
        build(shp, dbf),
        Err(BuildError::Parse(ParseError::TruncatedStream))
    ));
}

#[test]
fn test_truncated_geometry_aborts_build() {
    let mut shp = shp_file(&[polygon_record(1, &[include_ring(0.0, 0.0, 1.0, 1.0)])]);
    shp.truncate(shp.len() - 10);
    let dbf = dbf_file(&[Some("Test/Zone")]);
    assert!(matches!(
        build(shp, dbf),
        Err(BuildError::Parse(ParseError::TruncatedStream))
    ));
}

#[test]
fn test_rebuild_is_deterministic() {
    let shp = shp_file(&[
        polygon_record(1, &[include_ring(10.0, 10.0, 11.0, 11.0)]),
        polygon_record(2, &[include_ring(10.0, 10.0, 12.0, 12.0)]),
    ]);
    let dbf = dbf_file(&[Some("First/Zone"), Some("Second/Zone")]);

    let world_a = build(shp.clone(), dbf.clone()).unwrap();
    let world_b = build(shp, dbf).unwrap();

    assert_eq!(world_a.extents(), world_b.extents());
    assert_eq!(world_a.grid(), world_b.grid());
}

#[test]
fn test_queries_are_idempotent() {
    let world = los_angeles_world();
    let first = world.find_zone(37.29390, -121.91413).unwrap().map(String::from);
    for _ in 0..100 {
        let again = world.find_zone(37.29390, -121.91413).unwrap().map(String::from);
        assert_eq!(first, again);
    }
}

#[test]
fn test_index_has_no_false_negatives_for_includes() {
    // sample points inside every include ring must land in a tile whose
    // candidate list reaches the extent
    let shp = shp_file(&[
        polygon_record(1, &[include_ring(-118.9, -33.9, -118.1, -33.1)]),
        polygon_record(2, &[include_ring(139.0, 35.0, 140.9, 36.9)]),
    ]);
    let dbf = dbf_file(&[Some("Southern/Zone"), Some("Northern/Zone")]);
    let world = build(shp, dbf).unwrap();

    for (lat, lon, expected) in [
        (-33.5, -118.5, "Southern/Zone"),
        (-33.15, -118.85, "Southern/Zone"),
        (35.5, 139.5, "Northern/Zone"),
        (36.8, 140.8, "Northern/Zone"),
    ] {
        assert_eq!(world.find_zone(lat, lon).unwrap(), Some(expected));
    }
}

#[test]
fn test_shared_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let world = Arc::new(los_angeles_world());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(
                        world.find_zone(37.29390, -121.91413).unwrap(),
                        Some("America/Los_Angeles")
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("reader thread panicked");
    }
}
