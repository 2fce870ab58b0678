//! Shared builders for synthetic shapefile pairs.
//!
//! The encoders produce byte streams in the same wire format the parsers
//! consume: a 100-byte geometry header with mixed endianness followed by
//! records, and a little-endian attribute file with a single `TZID` text
//! field.

#![allow(dead_code)]

/// Width of the TZID character field in the synthetic attribute files.
pub const TZID_WIDTH: usize = 40;

/// A square ring wound so its trapezoid area is positive (an include ring).
pub fn include_ring(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<(f64, f64)> {
    vec![(x1, y1), (x1, y2), (x2, y2), (x2, y1), (x1, y1)]
}

/// The same square reversed: negative area (an exclude ring / hole).
pub fn exclude_ring(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<(f64, f64)> {
    let mut ring = include_ring(x1, y1, x2, y2);
    ring.reverse();
    ring
}

/// Assemble a geometry file from encoded records.
pub fn shp_file(records: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![0u8; 100];
    bytes[0..4].copy_from_slice(&9994i32.to_be_bytes());
    bytes[28..32].copy_from_slice(&1000i32.to_le_bytes());
    bytes[32..36].copy_from_slice(&5i32.to_le_bytes());
    bytes[36..44].copy_from_slice(&(-180.0f64).to_le_bytes());
    bytes[44..52].copy_from_slice(&(-90.0f64).to_le_bytes());
    bytes[52..60].copy_from_slice(&180.0f64.to_le_bytes());
    bytes[60..68].copy_from_slice(&90.0f64.to_le_bytes());

    for record in records {
        bytes.extend_from_slice(record);
    }

    let total_words = (bytes.len() / 2) as i32;
    bytes[24..28].copy_from_slice(&total_words.to_be_bytes());
    bytes
}

/// Encode one polygon record from its rings.
pub fn polygon_record(record_num: i32, rings: &[Vec<(f64, f64)>]) -> Vec<u8> {
    let mut x_min = f64::MAX;
    let mut y_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_max = f64::MIN;
    for ring in rings {
        for &(x, y) in ring {
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
    }

    let num_points: i32 = rings.iter().map(|ring| ring.len() as i32).sum();
    let mut content = Vec::new();
    content.extend_from_slice(&5i32.to_le_bytes());
    for corner in [x_min, y_min, x_max, y_max] {
        content.extend_from_slice(&corner.to_le_bytes());
    }
    content.extend_from_slice(&(rings.len() as i32).to_le_bytes());
    content.extend_from_slice(&num_points.to_le_bytes());
    let mut start = 0i32;
    for ring in rings {
        content.extend_from_slice(&start.to_le_bytes());
        start += ring.len() as i32;
    }
    for ring in rings {
        for (x, y) in ring {
            content.extend_from_slice(&x.to_le_bytes());
            content.extend_from_slice(&y.to_le_bytes());
        }
    }

    framed_record(record_num, &content)
}

/// Encode one null-shape record.
pub fn null_record(record_num: i32) -> Vec<u8> {
    framed_record(record_num, &0i32.to_le_bytes())
}

/// Encode a record carrying an arbitrary shape type code and no body.
pub fn typed_record(record_num: i32, type_code: i32) -> Vec<u8> {
    framed_record(record_num, &type_code.to_le_bytes())
}

fn framed_record(record_num: i32, content: &[u8]) -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(&record_num.to_be_bytes());
    record.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
    record.extend_from_slice(content);
    record
}

/// Assemble an attribute file with a single `TZID` character field.
///
/// `None` rows are tombstones: flagged deleted, but still occupying their
/// full record length.
pub fn dbf_file(rows: &[Option<&str>]) -> Vec<u8> {
    let record_len = (1 + TZID_WIDTH) as i16;
    let data_start = (32 + 32 + 1) as i16;

    let mut bytes = vec![0u8; 32];
    bytes[0] = 0x03;
    bytes[4..8].copy_from_slice(&(rows.len() as i32).to_le_bytes());
    bytes[8..10].copy_from_slice(&data_start.to_le_bytes());
    bytes[10..12].copy_from_slice(&record_len.to_le_bytes());

    let mut descriptor = [0u8; 32];
    descriptor[0..4].copy_from_slice(b"TZID");
    descriptor[11] = b'C';
    descriptor[12..16].copy_from_slice(&0i32.to_le_bytes());
    descriptor[16] = TZID_WIDTH as u8;
    bytes.extend_from_slice(&descriptor);
    bytes.push(0x0D);

    for row in rows {
        match row {
            Some(zone) => {
                bytes.push(0x20);
                let mut field = zone.as_bytes().to_vec();
                field.resize(TZID_WIDTH, b' ');
                bytes.extend_from_slice(&field);
            }
            None => {
                bytes.push(0x2A);
                bytes.extend_from_slice(&[b' '; TZID_WIDTH]);
            }
        }
    }
    bytes
}
