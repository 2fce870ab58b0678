//! Shape type registry and raw geometry records.

/// Shape type codes from the ESRI shapefile standard.
///
/// The full registry is decoded so unknown codes can be distinguished from
/// known-but-unsupported ones, but only `NullShape` and `Polygon` records
/// are accepted by the stream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    NullShape,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    /// Decode a shape type code, or `None` for a code outside the standard.
    pub fn from_code(code: i32) -> Option<ShapeType> {
        match code {
            0 => Some(ShapeType::NullShape),
            1 => Some(ShapeType::Point),
            3 => Some(ShapeType::PolyLine),
            5 => Some(ShapeType::Polygon),
            8 => Some(ShapeType::MultiPoint),
            11 => Some(ShapeType::PointZ),
            13 => Some(ShapeType::PolyLineZ),
            15 => Some(ShapeType::PolygonZ),
            18 => Some(ShapeType::MultiPointZ),
            21 => Some(ShapeType::PointM),
            23 => Some(ShapeType::PolyLineM),
            25 => Some(ShapeType::PolygonM),
            28 => Some(ShapeType::MultiPointM),
            31 => Some(ShapeType::MultiPatch),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ShapeType::NullShape => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
            ShapeType::MultiPatch => 31,
        }
    }
}

/// Bounding box in unscaled degrees, as declared in the geometry file.
///
/// Axis convention: x is longitude, y is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// One polygon record decoded from the geometry stream.
///
/// Each part is one closed ring; a part's winding direction determines its
/// include/exclude classification downstream. Points are (x = lon, y = lat)
/// pairs in unscaled degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub record_num: i32,
    pub bbox: GeoBounds,
    pub parts: Vec<Vec<(f64, f64)>>,
}

/// One record from the geometry stream.
///
/// Transient: records are folded into extents during the build and then
/// discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeRecord {
    /// A null shape: no geometry, but it still occupies a record slot and
    /// stays synchronized with its attribute record.
    Null { record_num: i32 },
    Polygon(PolygonShape),
}

impl ShapeRecord {
    pub fn record_num(&self) -> i32 {
        match self {
            ShapeRecord::Null { record_num } => *record_num,
            ShapeRecord::Polygon(shape) => shape.record_num,
        }
    }
}
