//! Place domain records carried through the search pipeline.
//!
//! All of these are request-scoped: built fresh per search, serialized into
//! the response, never persisted.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One upstream search result. Identity for deduplication is `place_id` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,
}

/// A single user review, truncated to the fields the response exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: f64,
    pub text: String,
    pub relative_time: String,
}

/// An enriched place record: summary fields plus phone and up to ten reviews.
///
/// When the detail lookup fails, a `PlaceDetail` degrades to the summary
/// fields with `phone: None` and an empty review list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub summary: PlaceSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl PlaceDetail {
    #[must_use]
    pub fn from_summary(summary: PlaceSummary) -> Self {
        Self {
            summary,
            phone: None,
            reviews: Vec::new(),
        }
    }
}

/// User-facing knob controlling grid density on the wide-area search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntensity {
    #[default]
    Low,
    Medium,
    High,
}

impl SearchIntensity {
    /// Tiles per side of the square grid before span auto-scaling.
    #[must_use]
    pub fn base_grid_density(self) -> usize {
        match self {
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_owned(),
            name: "Blue Bottle".to_owned(),
            address: Some("1 Main St".to_owned()),
            location: Coordinate::new(40.0, -74.0),
            rating: Some(4.5),
            user_rating_count: Some(120),
            business_status: Some("OPERATIONAL".to_owned()),
            website: None,
            price_level: None,
        }
    }

    #[test]
    fn intensity_maps_to_base_density() {
        assert_eq!(SearchIntensity::Low.base_grid_density(), 2);
        assert_eq!(SearchIntensity::Medium.base_grid_density(), 3);
        assert_eq!(SearchIntensity::High.base_grid_density(), 4);
    }

    #[test]
    fn intensity_deserializes_lowercase() {
        let parsed: SearchIntensity = serde_json::from_str("\"medium\"").expect("parse intensity");
        assert_eq!(parsed, SearchIntensity::Medium);
    }

    #[test]
    fn detail_from_summary_has_no_reviews() {
        let detail = PlaceDetail::from_summary(summary("p1"));
        assert!(detail.reviews.is_empty());
        assert!(detail.phone.is_none());
        assert_eq!(detail.summary.place_id, "p1");
    }

    #[test]
    fn detail_serializes_summary_fields_flattened() {
        let detail = PlaceDetail::from_summary(summary("p1"));
        let json = serde_json::to_value(&detail).expect("serialize detail");
        assert_eq!(json["placeId"].as_str(), Some("p1"));
        assert_eq!(json["name"].as_str(), Some("Blue Bottle"));
        assert!(json["reviews"].as_array().is_some_and(Vec::is_empty));
        assert!(json.get("phone").is_none(), "absent phone must be omitted");
    }
}
