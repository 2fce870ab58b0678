//! Geometric time-zone resolution over the tz_world shapefile.
//!
//! [`TzWorld`] compiles the geometry + attribute pair into an extent table
//! and a 1°×1° spatial index, then answers point lookups by testing a
//! tile's few candidate extents exactly.
//!
//! # Initialization
//!
//! Building is a single-threaded, one-shot pipeline: the paired record
//! stream is consumed sequentially, the extent table grows in stream order,
//! and the spatial index is built once at the end. Any malformed record
//! aborts the whole build; a partially-built index is never returned.
//!
//! # Thread Safety
//!
//! A successfully built [`TzWorld`] is immutable: queries take `&self` and
//! there is no interior mutability, so the value is `Send + Sync` and can
//! be shared across threads behind an `Arc` once published.
//!
//! # Example
//!
//! ```ignore
//! use geotz::tzworld::TzWorld;
//!
//! let world = TzWorld::open("data/tzworld", "tz_world_mp")?;
//! let zone = world.find_zone(37.29390, -121.91413)?;
//! assert_eq!(zone, Some("America/Los_Angeles"));
//! ```

mod extent;
mod grid;

pub use extent::{Ring, ZoneExtent};
pub use grid::{TileGrid, GRID_COLS, GRID_ROWS, TILE_COUNT};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::coord::{self, CoordError, ScaledPoint};
use crate::shapefile::{ParseError, ShapeRecord, ShapefileSet};

/// Attribute field carrying the zone identifier in the tz_world dataset.
pub const TZID_FIELD: &str = "TZID";

/// Errors raised while building the index.
///
/// All of these abort construction entirely; there is no degraded or
/// partial index.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A source file could not be opened.
    #[error("cannot open {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source pair failed to decode.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A polygon record has no zone identifier attribute.
    #[error("record {record}: polygon has no {TZID_FIELD} attribute")]
    MissingZoneId { record: i32 },
}

/// The built geometric index: extent table plus spatial index.
pub struct TzWorld {
    extents: Vec<ZoneExtent>,
    grid: TileGrid,
}

impl TzWorld {
    /// Build from a shapefile pair identified by directory and shared base
    /// name, with the conventional `.shp`/`.dbf` extensions.
    pub fn open<P: AsRef<Path>>(dir: P, base_name: &str) -> Result<Self, BuildError> {
        let dir = dir.as_ref();
        let geometry = open_source(dir.join(format!("{base_name}.shp")))?;
        let attributes = open_source(dir.join(format!("{base_name}.dbf")))?;
        Self::from_readers(geometry, attributes)
    }

    /// Build from already-open geometry and attribute byte sources.
    pub fn from_readers<G: Read, A: Read>(geometry: G, attributes: A) -> Result<Self, BuildError> {
        let mut source = ShapefileSet::new(geometry, attributes)?;

        let mut extents = Vec::new();
        while let Some(record) = source.next_record()? {
            let shape = match record.shape {
                ShapeRecord::Polygon(shape) => shape,
                // null shapes occupy a record slot but carry no coverage
                ShapeRecord::Null { .. } => continue,
            };
            let zone = record
                .attributes
                .get(TZID_FIELD)
                .ok_or(BuildError::MissingZoneId {
                    record: shape.record_num,
                })?
                .clone();
            extents.push(ZoneExtent::from_polygon(zone, &shape));
        }

        let grid = TileGrid::build(&extents);
        tracing::info!(count = extents.len(), "Built time zone extent table");

        Ok(Self { extents, grid })
    }

    /// Resolve a coordinate to a time-zone identifier.
    ///
    /// Returns `Ok(None)` when the point lies outside every registered
    /// extent (open ocean); a coordinate outside the legal domain is a
    /// caller error, never clamped.
    pub fn find_zone(&self, lat: f64, lon: f64) -> Result<Option<&str>, CoordError> {
        Ok(self.find_zone_extent(lat, lon)?.map(ZoneExtent::zone))
    }

    /// Resolve a coordinate to the full matched extent.
    ///
    /// Candidates are tested in extent-table order, which is the source
    /// dataset's storage order: when a point is covered by more than one
    /// extent, the lowest-index one wins. Intended for diagnostics; the
    /// algorithm is identical to [`find_zone`](Self::find_zone).
    pub fn find_zone_extent(&self, lat: f64, lon: f64) -> Result<Option<&ZoneExtent>, CoordError> {
        coord::validate(lat, lon)?;

        let tile = grid::tile_index(lat, lon);
        let point = ScaledPoint::from_degrees(lat, lon);
        for &index in self.grid.candidates(tile) {
            let extent = &self.extents[index as usize];
            if extent.contains(point) {
                return Ok(Some(extent));
            }
        }
        Ok(None)
    }

    /// All extents, in source-stream order.
    pub fn extents(&self) -> &[ZoneExtent] {
        &self.extents
    }

    /// The built spatial index.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Number of extents in the table.
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}

fn open_source(path: PathBuf) -> Result<BufReader<File>, BuildError> {
    match File::open(&path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(source) => Err(BuildError::SourceUnavailable { path, source }),
    }
}
