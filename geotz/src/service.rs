//! High-level facade wiring the geometric index and the flat tables.
//!
//! [`TzService`] answers every query shape the library supports: coordinate
//! lookup with a nautical fallback, country → zone, zone → country, and
//! region-level queries where a regional table is loaded.
//!
//! # Example
//!
//! ```ignore
//! use geotz::service::{TzService, ServiceSources};
//!
//! let sources = ServiceSources::new("data/tzworld", "tz_world_mp")
//!     .with_zone_tab("data/zone.tab")
//!     .with_regional("US", "data/tz_US.txt");
//! let service = TzService::from_sources(&sources)?;
//!
//! let zone = service.time_zone(37.29390, -121.91413)?; // America/Los_Angeles
//! let zones = service.zones_for_country("DE");          // [Europe/Berlin]
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::coord::CoordError;
use crate::tables::{RegionalZones, TableError, ZoneTab};
use crate::tzworld::{BuildError, TzWorld, ZoneExtent};

/// Errors raised while constructing the facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The geometric index failed to build.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A flat table failed to load.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Locations of the data files a [`TzService`] is built from.
#[derive(Debug, Clone)]
pub struct ServiceSources {
    /// Directory holding the shapefile pair.
    pub shapefile_dir: PathBuf,
    /// Shared base name of the `.shp`/`.dbf` pair.
    pub base_name: String,
    /// Optional `zone.tab`-format country table.
    pub zone_tab: Option<PathBuf>,
    /// Regional tables keyed by country code.
    pub regional: Vec<(String, PathBuf)>,
}

impl ServiceSources {
    pub fn new<P: Into<PathBuf>>(shapefile_dir: P, base_name: &str) -> Self {
        Self {
            shapefile_dir: shapefile_dir.into(),
            base_name: base_name.to_string(),
            zone_tab: None,
            regional: Vec::new(),
        }
    }

    pub fn with_zone_tab<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.zone_tab = Some(path.into());
        self
    }

    pub fn with_regional<P: Into<PathBuf>>(mut self, country: &str, path: P) -> Self {
        self.regional.push((country.to_string(), path.into()));
        self
    }
}

/// Central query surface over the geometric index and the flat tables.
///
/// Immutable after construction; queries take `&self` and the value can be
/// shared across threads behind an `Arc`.
pub struct TzService {
    world: TzWorld,
    zone_tab: ZoneTab,
    regional: HashMap<String, RegionalZones>,
}

impl TzService {
    /// Assemble a service from already-built parts.
    pub fn new(world: TzWorld, zone_tab: ZoneTab) -> Self {
        Self {
            world,
            zone_tab,
            regional: HashMap::new(),
        }
    }

    /// Attach a regional table for one country.
    pub fn with_regional(mut self, country: &str, table: RegionalZones) -> Self {
        self.regional.insert(country.to_string(), table);
        self
    }

    /// Build everything from the given source files.
    pub fn from_sources(sources: &ServiceSources) -> Result<Self, ServiceError> {
        let world = TzWorld::open(&sources.shapefile_dir, &sources.base_name)?;
        let zone_tab = match &sources.zone_tab {
            Some(path) => ZoneTab::from_path(path)?,
            None => ZoneTab::default(),
        };

        let mut service = Self::new(world, zone_tab);
        for (country, path) in &sources.regional {
            let table = RegionalZones::from_path(path)?;
            service = service.with_regional(country, table);
        }
        Ok(service)
    }

    /// The underlying geometric index.
    pub fn world(&self) -> &TzWorld {
        &self.world
    }

    /// The underlying country table.
    pub fn zone_tab(&self) -> &ZoneTab {
        &self.zone_tab
    }

    // =========================================================================
    // Coordinate queries
    // =========================================================================

    /// Resolve a coordinate to a zone identifier, falling back to a
    /// synthetic `Etc/GMT±N` zone by longitude when the point lies outside
    /// every registered extent (open ocean).
    pub fn time_zone(&self, lat: f64, lon: f64) -> Result<String, CoordError> {
        if let Some(zone) = self.world.find_zone(lat, lon)? {
            return Ok(zone.to_string());
        }
        Ok(nautical_zone(lon))
    }

    /// Geometric lookup without the nautical fallback.
    pub fn find_zone(&self, lat: f64, lon: f64) -> Result<Option<&str>, CoordError> {
        self.world.find_zone(lat, lon)
    }

    /// Geometric lookup returning the full matched extent.
    pub fn find_zone_extent(&self, lat: f64, lon: f64) -> Result<Option<&ZoneExtent>, CoordError> {
        self.world.find_zone_extent(lat, lon)
    }

    // =========================================================================
    // Country and region queries
    // =========================================================================

    /// All zones for a country, in table order.
    pub fn zones_for_country(&self, country: &str) -> Option<&[String]> {
        self.zone_tab.zones(country)
    }

    /// The first-listed zone for a country.
    pub fn first_zone_for_country(&self, country: &str) -> Option<&str> {
        self.zone_tab.first_zone(country)
    }

    /// All countries a zone appears under.
    pub fn countries_for_zone(&self, zone: &str) -> Option<&[String]> {
        self.zone_tab.countries(zone)
    }

    /// The first-listed country for a zone.
    pub fn first_country_for_zone(&self, zone: &str) -> Option<&str> {
        self.zone_tab.first_country(zone)
    }

    /// Zones for a region within a country.
    ///
    /// The region narrows the answer only where a regional table is loaded
    /// for that country; otherwise the country-level answer is returned.
    pub fn zones_for_region(&self, country: &str, region: &str) -> Option<&[String]> {
        if let Some(table) = self.regional.get(country) {
            if let Some(zones) = table.zones(region) {
                return Some(zones);
            }
        }
        self.zones_for_country(country)
    }

    /// The first-listed zone for a region, with the same country fallback
    /// as [`zones_for_region`](Self::zones_for_region).
    pub fn first_zone_for_region(&self, country: &str, region: &str) -> Option<&str> {
        if let Some(table) = self.regional.get(country) {
            if let Some(zone) = table.first_zone(region) {
                return Some(zone);
            }
        }
        self.first_zone_for_country(country)
    }

    /// Regions of a country a zone appears under.
    ///
    /// Only meaningful where a regional table is loaded for the country;
    /// there is no fallback.
    pub fn regions_for_zone(&self, zone: &str, country: &str) -> Option<&[String]> {
        self.regional.get(country)?.regions(zone)
    }

    /// The first-listed region for a zone within a country.
    pub fn first_region_for_zone(&self, zone: &str, country: &str) -> Option<&str> {
        self.regional.get(country)?.first_region(zone)
    }
}

/// Synthetic nautical zone for a longitude.
///
/// The tz database's `Etc/GMT±N` names carry a sign opposite the actual
/// offset in hours, so a positive offset renders with a minus sign.
fn nautical_zone(lon: f64) -> String {
    // round half toward positive infinity, matching integer nautical bands
    let offset = (lon / 15.0 + 0.5).floor() as i32;
    if offset <= 0 {
        format!("Etc/GMT+{}", -offset)
    } else {
        format!("Etc/GMT-{}", offset)
    }
}
