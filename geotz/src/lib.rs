//! geotz - Geographic time-zone resolution
//!
//! This library resolves a geographic coordinate (or a country/region code)
//! to a time-zone identifier. The geometric core parses the tz_world
//! shapefile pair into an in-memory polygon set with holes, indexes it with
//! a coarse 1°×1° tile grid, and answers point-in-polygon queries over
//! fixed-point integer coordinates.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use geotz::service::{TzService, ServiceSources};
//!
//! let sources = ServiceSources::new("data/tzworld", "tz_world_mp")
//!     .with_zone_tab("data/zone.tab");
//! let service = TzService::from_sources(&sources)?;
//!
//! // Geometric lookup with a nautical fallback for open ocean
//! let zone = service.time_zone(37.29390, -121.91413)?;
//! assert_eq!(zone, "America/Los_Angeles");
//! ```
//!
//! Callers that only need the geometric index can build a
//! [`tzworld::TzWorld`] directly and share it behind an `Arc`.

pub mod coord;
pub mod service;
pub mod shapefile;
pub mod tables;
pub mod tzworld;

/// Version of the geotz library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
