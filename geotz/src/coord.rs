//! Geographic coordinate domain and fixed-point scaling.
//!
//! All geometry in this crate is stored as scaled integers: a coordinate in
//! degrees becomes `floor(degrees × 10_000_000)` as an `i32`. This maps the
//! legal longitude range -180.0..180.0 comfortably inside `i32` at roughly
//! centimeter precision, halves memory versus doubles, and keeps containment
//! tests in exact integer arithmetic.

use std::fmt;

/// Multiplier between degrees and scaled integer coordinates.
pub const SCALE_FACTOR: i32 = 10_000_000;

/// Inclusive lower bound of the legal latitude domain.
pub const MIN_LAT: f64 = -90.0;
/// Exclusive upper bound of the legal latitude domain.
pub const MAX_LAT: f64 = 90.0;

/// Inclusive lower bound of the legal longitude domain.
pub const MIN_LON: f64 = -180.0;
/// Exclusive upper bound of the legal longitude domain.
pub const MAX_LON: f64 = 180.0;

/// Errors raised for query coordinates outside the legal domain.
///
/// These are reported to the caller per call; they are never clamped or
/// wrapped, and they are distinct from a lookup miss.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90).
    #[error("invalid latitude: {0} (must be in [{MIN_LAT}, {MAX_LAT}))")]
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180).
    #[error("invalid longitude: {0} (must be in [{MIN_LON}, {MAX_LON}))")]
    InvalidLongitude(f64),
}

/// Validate a (lat, lon) pair against the legal domain.
///
/// The upper bounds are exclusive: lat 90.0 and lon 180.0 are rejected
/// rather than wrapped to the antimeridian or pole tile.
#[inline]
pub fn validate(lat: f64, lon: f64) -> Result<(), CoordError> {
    if !(MIN_LAT..MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(())
}

/// Scale a coordinate in degrees to its fixed-point integer form.
#[inline]
pub fn scale(degrees: f64) -> i32 {
    (degrees * f64::from(SCALE_FACTOR)).floor() as i32
}

/// A geographic point in scaled integer coordinates.
///
/// Follows the shapefile axis convention: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaledPoint {
    /// Scaled longitude.
    pub x: i32,
    /// Scaled latitude.
    pub y: i32,
}

impl ScaledPoint {
    /// Build a scaled point from a (lat, lon) pair in degrees.
    #[inline]
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            x: scale(lon),
            y: scale(lat),
        }
    }
}

impl fmt::Display for ScaledPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in scaled integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl ScaledRect {
    /// Rectangle spanning the given corners, in degrees.
    pub fn from_degrees(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            min_x: scale(x_min),
            min_y: scale(y_min),
            max_x: scale(x_max),
            max_y: scale(y_max),
        }
    }

    /// Containment test, inclusive on all edges.
    ///
    /// This is a fast pre-filter in front of the exact ring tests; it must
    /// never reject a point that a ring would contain, so both bounds are
    /// inclusive.
    #[inline]
    pub fn contains(&self, point: ScaledPoint) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Grow the rectangle to cover `point`.
    #[inline]
    pub fn expand(&mut self, point: ScaledPoint) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }
}
