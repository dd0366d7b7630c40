//! Geographic primitives shared across the workspace.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Values are clamped to the valid
/// coordinate space at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lng: lng.clamp(-180.0, 180.0),
        }
    }
}

/// An axis-aligned rectangle given by its south-west and north-east corners.
///
/// `sw.lat <= ne.lat` and `sw.lng <= ne.lng` always hold; [`BoundingBox::new`]
/// reorders inverted input rather than rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub sw: Coordinate,
    pub ne: Coordinate,
}

impl BoundingBox {
    /// Builds a box from two opposite corners in either order.
    #[must_use]
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            sw: Coordinate::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            ne: Coordinate::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// A box extending `radius_deg` in each direction from `center`.
    #[must_use]
    pub fn around(center: Coordinate, radius_deg: f64) -> Self {
        let radius = radius_deg.abs();
        Self::new(
            Coordinate::new(center.lat - radius, center.lng - radius),
            Coordinate::new(center.lat + radius, center.lng + radius),
        )
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.ne.lat - self.sw.lat
    }

    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.ne.lng - self.sw.lng
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.sw.lat
            && point.lat <= self.ne.lat
            && point.lng >= self.sw.lng
            && point.lng <= self.ne.lng
    }
}
