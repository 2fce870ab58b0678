//! Country ↔ zone table in the `zone.tab` format.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::TableError;

/// Bidirectional multi-map between country codes and zone identifiers.
///
/// Parsed from the public domain `zone.tab` file: tab-separated columns
/// with the ISO country code in column 0 and the zone name in column 2.
/// A country spanning several zones keeps them in file order, so the
/// "first zone" for a country is the file's first entry.
#[derive(Debug, Default)]
pub struct ZoneTab {
    zones_by_country: HashMap<String, Vec<String>>,
    countries_by_zone: HashMap<String, Vec<String>>,
}

impl ZoneTab {
    /// Load from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load from an open byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut table = Self::default();

        for line in BufReader::new(reader).lines() {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 3 {
                if !line.trim().is_empty() {
                    tracing::warn!(line = %line, "Skipping malformed zone table line");
                }
                continue;
            }
            table.insert(columns[0], columns[2]);
        }

        tracing::info!(
            countries = table.zones_by_country.len(),
            zones = table.countries_by_zone.len(),
            "Loaded country zone table"
        );
        Ok(table)
    }

    fn insert(&mut self, country: &str, zone: &str) {
        self.zones_by_country
            .entry(country.to_string())
            .or_default()
            .push(zone.to_string());
        self.countries_by_zone
            .entry(zone.to_string())
            .or_default()
            .push(country.to_string());
    }

    /// All zones observed for a country, in file order.
    pub fn zones(&self, country: &str) -> Option<&[String]> {
        self.zones_by_country.get(country).map(Vec::as_slice)
    }

    /// The first-listed zone for a country.
    pub fn first_zone(&self, country: &str) -> Option<&str> {
        self.zones(country)?.first().map(String::as_str)
    }

    /// All countries a zone appears under, in file order.
    pub fn countries(&self, zone: &str) -> Option<&[String]> {
        self.countries_by_zone.get(zone).map(Vec::as_slice)
    }

    /// The first-listed country for a zone.
    pub fn first_country(&self, zone: &str) -> Option<&str> {
        self.countries(zone)?.first().map(String::as_str)
    }

    /// Iterate over all known country codes.
    pub fn country_codes(&self) -> impl Iterator<Item = &str> {
        self.zones_by_country.keys().map(String::as_str)
    }

    /// Iterate over all known zone identifiers.
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.countries_by_zone.keys().map(String::as_str)
    }
}
