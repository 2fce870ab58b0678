//! Minimal shapefile parsing, sufficient for polygon datasets.
//!
//! A "shapefile" `foo` consists of several actual files: `foo.shp` carries
//! the geometry, `foo.dbf` the per-record attributes, and `foo.shx`/`foo.prj`
//! are ignored here (the whole file is read sequentially, and the tz_world
//! dataset is known to be in the plain global lat/lon system).
//!
//! The two streams are consumed strictly in lockstep: one geometry record is
//! always read together with its matching attribute record, so the pair
//! stays synchronized even across null shapes and deleted attribute rows.

mod cursor;
mod dbf;
mod shp;
mod types;

pub use cursor::{ByteCursor, ByteOrder};
pub use dbf::{AttributeRecord, DbfReader, FieldDescriptor};
pub use shp::ShpReader;
pub use types::{GeoBounds, PolygonShape, ShapeRecord, ShapeType};

use std::io::Read;

/// Errors raised while decoding the binary source pair.
///
/// All of these are fatal during initialization: a single malformed record
/// aborts the whole build.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The source ended while more bytes were required mid-record.
    #[error("byte stream ended while more bytes were required")]
    TruncatedStream,

    /// A record declares a geometry type this parser does not support.
    ///
    /// Skipping such a record without consuming its declared length would
    /// desynchronize the stream, so this is a hard error.
    #[error("record {record}: unsupported shape type code {code}")]
    UnsupportedShapeType { record: i32, code: i32 },

    /// A header or record structure failed a basic sanity check.
    #[error("malformed header: {message}")]
    MalformedHeader { message: String },

    /// The underlying source failed mid-read.
    #[error("I/O error reading source: {0}")]
    Io(#[from] std::io::Error),
}

/// One geometry record paired with its attribute record.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedRecord {
    pub shape: ShapeRecord,
    pub attributes: AttributeRecord,
}

/// The paired geometry + attribute streams of one shapefile.
pub struct ShapefileSet<G: Read, A: Read> {
    shp: ShpReader<G>,
    dbf: DbfReader<A>,
}

impl<G: Read, A: Read> ShapefileSet<G, A> {
    /// Parse both headers and position the pair at the first record.
    pub fn new(geometry: G, attributes: A) -> Result<Self, ParseError> {
        Ok(Self {
            shp: ShpReader::new(geometry)?,
            dbf: DbfReader::new(attributes)?,
        })
    }

    /// Header data of the geometry stream.
    pub fn geometry(&self) -> &ShpReader<G> {
        &self.shp
    }

    /// Header data of the attribute stream.
    pub fn attributes(&self) -> &DbfReader<A> {
        &self.dbf
    }

    /// Sequential read of the next (shape, attributes) pair.
    ///
    /// The geometry stream drives the sequence: its graceful end ends the
    /// pair stream, while an attribute stream that runs out first breaks the
    /// 1:1 sync contract and is reported as truncation.
    pub fn next_record(&mut self) -> Result<Option<PairedRecord>, ParseError> {
        let shape = match self.shp.next_shape()? {
            Some(shape) => shape,
            None => return Ok(None),
        };
        let attributes = self
            .dbf
            .next_record()?
            .ok_or(ParseError::TruncatedStream)?;
        Ok(Some(PairedRecord { shape, attributes }))
    }
}
