//! Bounding-box partitioning into a uniform search grid.
//!
//! Tiles are produced in row-major order; that order is the canonical tile
//! iteration order everywhere downstream (batching, merge, logs).

use placegrid_core::{BoundingBox, Coordinate, SearchIntensity};

/// Hard ceiling on tiles per side, auto-scaling included.
pub const MAX_GRID_DENSITY: usize = 6;

/// One rectangular sub-region of the search area, identified by its
/// row/column index in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub bounds: BoundingBox,
}

impl Tile {
    #[must_use]
    pub fn id(&self) -> String {
        format!("r{}c{}", self.row, self.col)
    }
}

/// Tiles per side for the given area and intensity.
///
/// Large areas get one extra row/column so individual tile size stays
/// roughly bounded: when the larger span strictly exceeds
/// `span_threshold_deg`, density is bumped by one (capped at
/// [`MAX_GRID_DENSITY`]). A span exactly at the threshold does not scale.
#[must_use]
pub fn grid_density(
    bounds: &BoundingBox,
    intensity: SearchIntensity,
    span_threshold_deg: f64,
) -> usize {
    let base = intensity.base_grid_density();
    let span = bounds.lat_span().max(bounds.lng_span());
    if span > span_threshold_deg {
        (base + 1).min(MAX_GRID_DENSITY)
    } else {
        base
    }
}

/// Splits `bounds` into `density × density` tiles in row-major order.
///
/// Cell edges are computed as `sw + k · cell` so adjacent tiles share the
/// exact same edge value: coverage is exact and interiors never overlap,
/// with only the outermost edge subject to float tolerance.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn partition(bounds: &BoundingBox, density: usize) -> Vec<Tile> {
    let density = density.max(1);
    let cell_lat = bounds.lat_span() / density as f64;
    let cell_lng = bounds.lng_span() / density as f64;

    let mut tiles = Vec::with_capacity(density * density);
    for row in 0..density {
        for col in 0..density {
            let sw = Coordinate {
                lat: bounds.sw.lat + row as f64 * cell_lat,
                lng: bounds.sw.lng + col as f64 * cell_lng,
            };
            let ne = Coordinate {
                lat: bounds.sw.lat + (row + 1) as f64 * cell_lat,
                lng: bounds.sw.lng + (col + 1) as f64 * cell_lng,
            };
            tiles.push(Tile {
                row,
                col,
                bounds: BoundingBox { sw, ne },
            });
        }
    }
    tiles
}
