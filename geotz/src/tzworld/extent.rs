//! Zone extents: classified polygon rings with containment tests.
//!
//! Each geometry record becomes one [`ZoneExtent`]: the full coverage of one
//! time-zone identifier, possibly disjoint, possibly holed. Rings are
//! classified by the sign of their planar area accumulated in trapezoid form;
//! the dataset's winding order makes a positive area an outer (include)
//! boundary and a non-positive area a hole (exclude). This sign convention is
//! a tested property of the dataset, not the textbook counterclockwise rule.

use crate::coord::{ScaledPoint, ScaledRect};
use crate::shapefile::PolygonShape;

/// One closed polygon boundary in scaled integer coordinates.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    points: Vec<ScaledPoint>,
}

impl Ring {
    fn from_part(part: &[(f64, f64)]) -> Self {
        let points = part
            .iter()
            .map(|&(x, y)| ScaledPoint {
                x: crate::coord::scale(x),
                y: crate::coord::scale(y),
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[ScaledPoint] {
        &self.points
    }

    /// The ring's own axis-aligned bounding rectangle.
    ///
    /// The spatial index registers each ring by these bounds rather than by
    /// the extent-wide box: one zone's rings can be scattered across the
    /// globe, and the extent box would register false candidates in between.
    pub fn bounds(&self) -> ScaledRect {
        let mut rect = ScaledRect {
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        };
        for &point in &self.points {
            rect.expand(point);
        }
        rect
    }

    /// Crossing-number (even-odd) containment test.
    ///
    /// Runs entirely in integer arithmetic; the intermediate products stay
    /// within `i64` for coordinates in the legal lat/lon domain. A point
    /// exactly on a ring edge has implementation-defined classification.
    #[inline]
    pub fn contains(&self, point: ScaledPoint) -> bool {
        let points = &self.points;
        let n = points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = points[i];
            let b = points[j];
            if (a.y > point.y) != (b.y > point.y) {
                let dy = i64::from(b.y) - i64::from(a.y);
                let lhs = (i64::from(point.x) - i64::from(a.x)) * dy;
                let rhs = (i64::from(b.x) - i64::from(a.x)) * (i64::from(point.y) - i64::from(a.y));
                let crosses = if dy > 0 { lhs < rhs } else { lhs > rhs };
                if crosses {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Signed planar area of a closed part, accumulated in trapezoid form over
/// consecutive vertex pairs of the unscaled coordinates.
fn signed_area(part: &[(f64, f64)]) -> f64 {
    let mut area = 0.0;
    for pair in part.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        area += (x1 - x0) * (y1 + y0) / 2.0;
    }
    area
}

/// The full geographic coverage of one time-zone identifier.
///
/// Built once at load time and never mutated; owned exclusively by the
/// extent table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneExtent {
    zone: String,
    bbox: ScaledRect,
    includes: Vec<Ring>,
    excludes: Vec<Ring>,
}

impl ZoneExtent {
    /// Fold one polygon record and its zone identifier into an extent.
    pub(crate) fn from_polygon(zone: String, shape: &PolygonShape) -> Self {
        let bbox = ScaledRect::from_degrees(
            shape.bbox.x_min,
            shape.bbox.y_min,
            shape.bbox.x_max,
            shape.bbox.y_max,
        );

        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for part in &shape.parts {
            let ring = Ring::from_part(part);
            if signed_area(part) > 0.0 {
                includes.push(ring);
            } else {
                excludes.push(ring);
            }
        }

        Self {
            zone,
            bbox,
            includes,
            excludes,
        }
    }

    /// The time-zone identifier covered by this extent.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// The bounding rectangle of the whole extent.
    pub fn bbox(&self) -> ScaledRect {
        self.bbox
    }

    /// Outer boundaries contributing coverage.
    pub fn includes(&self) -> &[Ring] {
        &self.includes
    }

    /// Holes cut out of the extent's coverage as a whole.
    pub fn excludes(&self) -> &[Ring] {
        &self.excludes
    }

    /// Exact containment test for one scaled point.
    ///
    /// Exclude rings are holes in the extent's coverage as a whole, not
    /// paired to a specific include ring, so they are evaluated first and
    /// veto unconditionally.
    #[inline]
    pub fn contains(&self, point: ScaledPoint) -> bool {
        if !self.bbox.contains(point) {
            return false;
        }
        if self.excludes.iter().any(|ring| ring.contains(point)) {
            return false;
        }
        self.includes.iter().any(|ring| ring.contains(point))
    }
}
