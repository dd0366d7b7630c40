//! Wire types for the Places and Geocoding endpoints and their conversions
//! into the shared domain records.

use placegrid_core::{BoundingBox, Coordinate, PlaceDetail, PlaceSummary, Review};
use serde::{Deserialize, Serialize};

/// Upstream reviews are truncated to this many entries per place.
pub const MAX_REVIEWS: usize = 10;

/// One page of text-search results plus the cursor for the next page.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub places: Vec<PlaceSummary>,
    pub next_page_token: Option<String>,
}

/// A geocoded location: the best-match coordinate and, when the upstream
/// provides one, the surrounding viewport.
#[derive(Debug, Clone)]
pub struct Geocoded {
    pub location: Coordinate,
    pub bounds: Option<BoundingBox>,
}

// ---------------------------------------------------------------------------
// places:searchText request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_bias: Option<LocationBias>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationBias {
    pub rectangle: Rectangle,
}

#[derive(Debug, Serialize)]
pub(crate) struct Rectangle {
    pub low: LatLng,
    pub high: LatLng,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&BoundingBox> for LocationBias {
    fn from(bounds: &BoundingBox) -> Self {
        Self {
            rectangle: Rectangle {
                low: LatLng {
                    latitude: bounds.sw.lat,
                    longitude: bounds.sw.lng,
                },
                high: LatLng {
                    latitude: bounds.ne.lat,
                    longitude: bounds.ne.lng,
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// places:searchText / place details responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<WirePlace>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePlace {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    pub business_status: Option<String>,
    pub website_uri: Option<String>,
    pub price_level: Option<String>,
}

impl WirePlace {
    /// Converts into a domain summary; records without an id or a location
    /// cannot participate in dedup or tiling and are dropped by the caller.
    pub(crate) fn into_summary(self) -> Option<PlaceSummary> {
        let id = self.id?;
        let location = self.location?;
        Some(PlaceSummary {
            place_id: id,
            name: self
                .display_name
                .and_then(|t| t.text)
                .unwrap_or_default(),
            address: self.formatted_address,
            location: Coordinate::new(location.latitude, location.longitude),
            rating: self.rating,
            user_rating_count: self.user_rating_count,
            business_status: self.business_status,
            website: self.website_uri,
            price_level: self.price_level,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePlaceDetail {
    #[serde(flatten)]
    pub place: WirePlace,
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub reviews: Vec<WireReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireReview {
    pub author_attribution: Option<WireAuthor>,
    pub rating: Option<f64>,
    pub text: Option<LocalizedText>,
    pub relative_publish_time_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAuthor {
    pub display_name: Option<String>,
}

impl WirePlaceDetail {
    pub(crate) fn into_detail(self, place_id: &str) -> PlaceDetail {
        let reviews = self
            .reviews
            .into_iter()
            .take(MAX_REVIEWS)
            .map(|r| Review {
                author: r
                    .author_attribution
                    .and_then(|a| a.display_name)
                    .unwrap_or_default(),
                rating: r.rating.unwrap_or(0.0),
                text: r.text.and_then(|t| t.text).unwrap_or_default(),
                relative_time: r.relative_publish_time_description.unwrap_or_default(),
            })
            .collect();

        let location = self
            .place
            .location
            .map_or_else(|| Coordinate::new(0.0, 0.0), |l| {
                Coordinate::new(l.latitude, l.longitude)
            });

        PlaceDetail {
            summary: PlaceSummary {
                place_id: self.place.id.unwrap_or_else(|| place_id.to_owned()),
                name: self
                    .place
                    .display_name
                    .and_then(|t| t.text)
                    .unwrap_or_default(),
                address: self.place.formatted_address,
                location,
                rating: self.place.rating,
                user_rating_count: self.place.user_rating_count,
                business_status: self.place.business_status,
                website: self.place.website_uri,
                price_level: self.place.price_level,
            },
            phone: self.national_phone_number,
            reviews,
        }
    }
}

// ---------------------------------------------------------------------------
// Geocoding response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeGeometry {
    pub location: GeocodeLatLng,
    pub viewport: Option<GeocodeViewport>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeViewport {
    pub southwest: GeocodeLatLng,
    pub northeast: GeocodeLatLng,
}

impl GeocodeResult {
    pub(crate) fn into_geocoded(self) -> Geocoded {
        let location = Coordinate::new(self.geometry.location.lat, self.geometry.location.lng);
        let bounds = self.geometry.viewport.map(|v| {
            BoundingBox::new(
                Coordinate::new(v.southwest.lat, v.southwest.lng),
                Coordinate::new(v.northeast.lat, v.northeast.lng),
            )
        });
        Geocoded { location, bounds }
    }
}
