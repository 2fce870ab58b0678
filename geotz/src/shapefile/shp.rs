//! Parser for the .shp geometry component of a shapefile.
//!
//! Minimal coverage of the ESRI shapefile standard, sufficient for polygon
//! datasets such as tz_world: a 100-byte header followed by a sequence of
//! records, each a big-endian record header and a little-endian body.
//!
//! Any record with a shape type other than Null or Polygon is a hard parse
//! error. Skipping such a record without consuming its declared length would
//! silently desynchronize the stream, so no recovery is attempted.

use std::io::Read;

use super::cursor::{be_i32, le_f64, le_i32, ByteCursor, ByteOrder};
use super::types::{GeoBounds, PolygonShape, ShapeRecord, ShapeType};
use super::ParseError;

const HEADER_BYTES: usize = 100;
const FILE_CODE: i32 = 9994;

/// Streaming reader over the geometry file.
///
/// Yields a lazy, finite, non-restartable sequence of shapes; the sequence
/// ends when the source is exhausted at a record boundary. Exhaustion in the
/// middle of a record is [`ParseError::TruncatedStream`].
pub struct ShpReader<R: Read> {
    cursor: ByteCursor<R>,
    file_length_bytes: u64,
    version: i32,
    shape_type: ShapeType,
    bbox: GeoBounds,
}

impl<R: Read> ShpReader<R> {
    /// Read and validate the file header.
    pub fn new(source: R) -> Result<Self, ParseError> {
        let mut cursor = ByteCursor::new(source);
        let header = cursor.read_bytes(HEADER_BYTES)?;

        // the first header fields are big-endian, the rest little-endian
        let file_code = be_i32(&header, 0);
        if file_code != FILE_CODE {
            return Err(ParseError::MalformedHeader {
                message: format!("unrecognized geometry file code {file_code}"),
            });
        }
        let file_length_words = be_i32(&header, 24);
        let version = le_i32(&header, 28);

        let type_code = le_i32(&header, 32);
        let shape_type = ShapeType::from_code(type_code).ok_or_else(|| ParseError::MalformedHeader {
            message: format!("unrecognized shape type code {type_code} in geometry header"),
        })?;

        let bbox = GeoBounds {
            x_min: le_f64(&header, 36),
            y_min: le_f64(&header, 44),
            x_max: le_f64(&header, 52),
            y_max: le_f64(&header, 60),
        };

        // file length is measured in 16-bit words
        let file_length_bytes = file_length_words as u64 * 2;
        tracing::debug!(
            version,
            shape_type = ?shape_type,
            file_length_bytes,
            "Parsed geometry file header"
        );

        Ok(Self {
            cursor,
            file_length_bytes,
            version,
            shape_type,
            bbox,
        })
    }

    /// Declared total file length in bytes.
    pub fn file_length_bytes(&self) -> u64 {
        self.file_length_bytes
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Shape type declared for the file as a whole.
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Overall bounding box declared in the header.
    pub fn bbox(&self) -> GeoBounds {
        self.bbox
    }

    /// Sequential read of the next record.
    ///
    /// Returns `Ok(None)` at a graceful end of data.
    pub fn next_shape(&mut self) -> Result<Option<ShapeRecord>, ParseError> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        // record header is big-endian
        let record_num = self.cursor.read_i32(ByteOrder::Big)?;
        let _content_words = self.cursor.read_i32(ByteOrder::Big)?;

        // record body is little-endian, starting with the shape type
        let type_code = self.cursor.read_i32(ByteOrder::Little)?;
        match ShapeType::from_code(type_code) {
            Some(ShapeType::NullShape) => Ok(Some(ShapeRecord::Null { record_num })),
            Some(ShapeType::Polygon) => {
                let shape = self.read_polygon_body(record_num)?;
                Ok(Some(ShapeRecord::Polygon(shape)))
            }
            _ => Err(ParseError::UnsupportedShapeType {
                record: record_num,
                code: type_code,
            }),
        }
    }

    fn read_polygon_body(&mut self, record_num: i32) -> Result<PolygonShape, ParseError> {
        let bbox = GeoBounds {
            x_min: self.cursor.read_f64(ByteOrder::Little)?,
            y_min: self.cursor.read_f64(ByteOrder::Little)?,
            x_max: self.cursor.read_f64(ByteOrder::Little)?,
            y_max: self.cursor.read_f64(ByteOrder::Little)?,
        };

        let num_parts = self.cursor.read_i32(ByteOrder::Little)?;
        let num_points = self.cursor.read_i32(ByteOrder::Little)?;
        if num_parts < 0 || num_points < 0 {
            return Err(ParseError::MalformedHeader {
                message: format!("record {record_num}: negative part or point count"),
            });
        }

        let mut part_starts = Vec::with_capacity(num_parts as usize);
        for _ in 0..num_parts {
            part_starts.push(self.cursor.read_i32(ByteOrder::Little)?);
        }

        let mut parts = Vec::with_capacity(num_parts as usize);
        for i in 0..num_parts as usize {
            let start = part_starts[i];
            let end = if i + 1 < num_parts as usize {
                part_starts[i + 1]
            } else {
                num_points
            };
            if start < 0 || end < start || end > num_points {
                return Err(ParseError::MalformedHeader {
                    message: format!("record {record_num}: part range {start}..{end} outside {num_points} points"),
                });
            }

            let mut points = Vec::with_capacity((end - start) as usize);
            for _ in start..end {
                let x = self.cursor.read_f64(ByteOrder::Little)?;
                let y = self.cursor.read_f64(ByteOrder::Little)?;
                points.push((x, y));
            }
            parts.push(points);
        }

        Ok(PolygonShape {
            record_num,
            bbox,
            parts,
        })
    }
}
