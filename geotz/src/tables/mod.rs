//! Flat tab-delimited lookup tables.
//!
//! These are the non-geometric companions of the geometric index: simple
//! bidirectional multi-maps parsed from text files in the tz database's
//! `zone.tab` family of formats. Lines starting with `#` are comments;
//! data lines are tab-separated. Insertion order is preserved so that
//! "first entry" queries are deterministic.

mod regional;
mod zone_tab;

pub use regional::RegionalZones;
pub use zone_tab::ZoneTab;

use std::path::PathBuf;

/// Errors raised while loading a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table file could not be opened.
    #[error("cannot open {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source failed mid-read.
    #[error("I/O error reading table: {0}")]
    Io(#[from] std::io::Error),
}
