//! Region ↔ zone table for subdivisions of one country.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::TableError;

/// Bidirectional multi-map between region codes and zone identifiers.
///
/// Organizes zones by regions within a single country (US states, Canadian
/// provinces, ...) to help infer a zone in countries spanning many of them.
/// The format mirrors `zone.tab` but with only two significant columns:
/// region code, then zone name.
#[derive(Debug, Default)]
pub struct RegionalZones {
    zones_by_region: HashMap<String, Vec<String>>,
    regions_by_zone: HashMap<String, Vec<String>>,
}

impl RegionalZones {
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
            if columns.len() < 2 {
                if !line.trim().is_empty() {
                    tracing::warn!(line = %line, "Skipping malformed regional table line");
                }
                continue;
            }
            table.insert(columns[0], columns[1]);
        }

        tracing::info!(
            regions = table.zones_by_region.len(),
            zones = table.regions_by_zone.len(),
            "Loaded regional zone table"
        );
        Ok(table)
    }

    fn insert(&mut self, region: &str, zone: &str) {
        self.zones_by_region
            .entry(region.to_string())
            .or_default()
            .push(zone.to_string());
        self.regions_by_zone
            .entry(zone.to_string())
            .or_default()
            .push(region.to_string());
    }

    /// All zones observed for a region, in file order.
    pub fn zones(&self, region: &str) -> Option<&[String]> {
        self.zones_by_region.get(region).map(Vec::as_slice)
    }

    /// The first-listed zone for a region.
    pub fn first_zone(&self, region: &str) -> Option<&str> {
        self.zones(region)?.first().map(String::as_str)
    }

    /// All regions a zone appears under, in file order.
    pub fn regions(&self, zone: &str) -> Option<&[String]> {
        self.regions_by_zone.get(zone).map(Vec::as_slice)
    }

    /// The first-listed region for a zone.
    pub fn first_region(&self, zone: &str) -> Option<&str> {
        self.regions(zone)?.first().map(String::as_str)
    }

    /// Iterate over all known region codes.
    pub fn region_codes(&self) -> impl Iterator<Item = &str> {
        self.zones_by_region.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# US states to zones
AZ\tAmerica/Phoenix
CA\tAmerica/Los_Angeles
OR\tAmerica/Los_Angeles
OR\tAmerica/Boise
";

    #[test]
    fn test_zones_for_region() {
        let table = RegionalZones::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.zones("CA").unwrap(), ["America/Los_Angeles"]);
        assert_eq!(
            table.zones("OR").unwrap(),
            ["America/Los_Angeles", "America/Boise"]
        );
        assert_eq!(table.first_zone("OR"), Some("America/Los_Angeles"));
    }

    #[test]
    fn test_regions_for_zone() {
        let table = RegionalZones::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.regions("America/Los_Angeles").unwrap(), ["CA", "OR"]);
        assert_eq!(table.first_region("America/Phoenix"), Some("AZ"));
    }

    #[test]
    fn test_unknown_keys() {
        let table = RegionalZones::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.zones("ZZ"), None);
        assert_eq!(table.regions("Europe/Paris"), None);
    }

    #[test]
    fn test_comments_skipped() {
        let table = RegionalZones::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.region_codes().count(), 3);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = RegionalZones::from_path("/nonexistent/tz_US.txt");
        assert!(matches!(result, Err(TableError::SourceUnavailable { .. })));
    }
}
