//! Coarse spatial index: a fixed 1°×1° tile grid over the whole sphere.
//!
//! Each tile lists the indices of extents whose geometry might cover it.
//! Registration walks every include ring's own bounding rectangle and marks
//! each whole-degree tile the rectangle spans, so the candidate lists have
//! no false negatives; the exact containment test at query time removes the
//! false positives.

use crate::coord::SCALE_FACTOR;

use super::extent::ZoneExtent;

/// Whole-degree latitude rows, covering [-90, 90).
pub const GRID_ROWS: usize = 180;
/// Whole-degree longitude columns, covering [-180, 180).
pub const GRID_COLS: usize = 360;
/// Total number of tiles.
pub const TILE_COUNT: usize = GRID_ROWS * GRID_COLS;

/// Map a validated (lat, lon) pair to its tile index.
#[inline]
pub fn tile_index(lat: f64, lon: f64) -> usize {
    let row = (lat.floor() as i32 + 90) as usize;
    let col = (lon.floor() as i32 + 180) as usize;
    row * GRID_COLS + col
}

/// The built index: one candidate list per tile.
///
/// Built in a single pass after all extents are known; immutable thereafter
/// and shared read-only by all queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<Vec<u32>>,
}

impl TileGrid {
    /// Register every extent's include rings into the tiles their bounding
    /// rectangles span.
    pub fn build(extents: &[ZoneExtent]) -> Self {
        let mut tiles = vec![Vec::new(); TILE_COUNT];

        for (index, extent) in extents.iter().enumerate() {
            let index = index as u32;
            for ring in extent.includes() {
                let bounds = ring.bounds();

                // floor division recovers whole degrees from scaled values
                // for negative coordinates as well; rings touching the
                // lat=90 or lon=180 edge land in the outermost tile
                let min_row = (bounds.min_y.div_euclid(SCALE_FACTOR) + 90).clamp(0, GRID_ROWS as i32 - 1);
                let max_row = (bounds.max_y.div_euclid(SCALE_FACTOR) + 90).clamp(0, GRID_ROWS as i32 - 1);
                let min_col = (bounds.min_x.div_euclid(SCALE_FACTOR) + 180).clamp(0, GRID_COLS as i32 - 1);
                let max_col = (bounds.max_x.div_euclid(SCALE_FACTOR) + 180).clamp(0, GRID_COLS as i32 - 1);

                for row in min_row..=max_row {
                    for col in min_col..=max_col {
                        let tile = &mut tiles[row as usize * GRID_COLS + col as usize];
                        // an extent appears at most once per tile no matter
                        // how many of its rings touch it
                        if !tile.contains(&index) {
                            tile.push(index);
                        }
                    }
                }
            }
        }

        let populated = tiles.iter().filter(|tile| !tile.is_empty()).count();
        tracing::info!(populated, total = TILE_COUNT, "Built spatial index");

        Self { tiles }
    }

    /// Candidate extent indices for a tile, in extent-table order.
    #[inline]
    pub fn candidates(&self, tile: usize) -> &[u32] {
        &self.tiles[tile]
    }
}
