//! Parser for the .dbf attribute component of a shapefile.
//!
//! Fixed-width record format, little-endian throughout: a 32-byte header, a
//! field descriptor array terminated by `0x0D`, then one record per shape.
//! Only character fields (`'C'`) are decoded into values; every other field
//! type is recognized so records keep their declared width, but produces no
//! value. A record whose deletion flag is `0x2A` is a tombstone: it yields an
//! empty attribute set while still advancing the cursor by the full record
//! length.

use std::collections::HashMap;

use std::io::Read;

use super::cursor::{le_i16, le_i32, ByteCursor};
use super::ParseError;

const HEADER_BYTES: usize = 32;
const DESCRIPTOR_BYTES: usize = 32;
const DESCRIPTOR_TERMINATOR: u8 = 0x0D;
const DELETED_FLAG: u8 = 0x2A;

/// Decoded attribute values for one record, keyed by field name.
///
/// Only text fields appear; every other field type is omitted.
pub type AttributeRecord = HashMap<String, String>;

/// One entry of the field descriptor array.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: char,
    pub offset: i32,
    pub length: u8,
    pub decimal_digits: u8,
    pub flags: u8,
    pub auto_increment_next: i32,
    pub auto_increment_step: u8,
}

/// Streaming reader over the attribute file.
///
/// Yields a lazy, finite, non-restartable sequence of attribute records,
/// synchronized 1:1 with the geometry stream of the same shapefile.
pub struct DbfReader<R: Read> {
    cursor: ByteCursor<R>,
    file_type: u8,
    record_count: i32,
    record_len: usize,
    flags: u8,
    fields: Vec<FieldDescriptor>,
}

impl<R: Read> DbfReader<R> {
    /// Read the header and field descriptor array, leaving the cursor at the
    /// first data record.
    pub fn new(source: R) -> Result<Self, ParseError> {
        let mut cursor = ByteCursor::new(source);
        let header = cursor.read_bytes(HEADER_BYTES)?;

        let file_type = header[0];
        let record_count = le_i32(&header, 4);
        let data_start = le_i16(&header, 8);
        let record_len = le_i16(&header, 10);
        let flags = header[28];

        if data_start < (HEADER_BYTES + 1) as i16 {
            return Err(ParseError::MalformedHeader {
                message: format!("attribute data start offset {data_start} overlaps the header"),
            });
        }
        if record_len < 1 {
            return Err(ParseError::MalformedHeader {
                message: format!("attribute record length {record_len} is too small"),
            });
        }
        let data_start = data_start as u64;
        let record_len = record_len as usize;

        let mut fields = Vec::new();
        while cursor.peek_u8()? != DESCRIPTOR_TERMINATOR {
            let field = read_descriptor(&mut cursor)?;
            // a field must fit inside the record behind the deletion flag
            let field_end = 1 + field.offset as i64 + i64::from(field.length);
            if field.offset < 0 || field_end > record_len as i64 {
                return Err(ParseError::MalformedHeader {
                    message: format!(
                        "field {:?} spans bytes {}..{} outside record length {}",
                        field.name, field.offset, field_end, record_len
                    ),
                });
            }
            fields.push(field);
        }
        cursor.read_u8()?; // consume the terminator

        // skip any vendor bytes between the descriptors and the data
        if cursor.position() > data_start {
            return Err(ParseError::MalformedHeader {
                message: format!(
                    "field descriptors extend past declared data start {data_start}"
                ),
            });
        }
        cursor.skip(data_start - cursor.position())?;

        tracing::debug!(
            file_type,
            record_count,
            record_len,
            field_count = fields.len(),
            "Parsed attribute file header"
        );

        Ok(Self {
            cursor,
            file_type,
            record_count,
            record_len,
            flags,
            fields,
        })
    }

    pub fn file_type(&self) -> u8 {
        self.file_type
    }

    /// Record count declared in the header. Iteration is driven by the
    /// stream itself, not this count.
    pub fn record_count(&self) -> i32 {
        self.record_count
    }

    pub fn record_len(&self) -> usize {
        self.record_len
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Sequential read of the next record.
    ///
    /// Returns `Ok(None)` at a graceful end of data, and an empty map for a
    /// deleted record.
    pub fn next_record(&mut self) -> Result<Option<AttributeRecord>, ParseError> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        let bytes = self.cursor.read_bytes(self.record_len)?;
        let mut record = AttributeRecord::new();
        if bytes[0] == DELETED_FLAG {
            return Ok(Some(record));
        }

        for field in &self.fields {
            if field.field_type != 'C' {
                continue;
            }
            let start = 1 + field.offset as usize;
            let raw = &bytes[start..start + field.length as usize];
            let text = String::from_utf8_lossy(raw);
            record.insert(
                field.name.clone(),
                text.trim_matches(|c: char| c <= ' ').to_string(),
            );
        }

        Ok(Some(record))
    }
}

fn read_descriptor<R: Read>(cursor: &mut ByteCursor<R>) -> Result<FieldDescriptor, ParseError> {
    let block = cursor.read_bytes(DESCRIPTOR_BYTES)?;

    let name = String::from_utf8_lossy(&block[0..11])
        .trim_matches(|c: char| c <= ' ')
        .to_string();

    Ok(FieldDescriptor {
        name,
        field_type: block[11] as char,
        offset: le_i32(&block, 12),
        length: block[16],
        decimal_digits: block[17],
        flags: block[18],
        auto_increment_next: le_i32(&block, 19),
        auto_increment_step: block[23],
        // bytes 24..32 are reserved and discarded
    })
}
