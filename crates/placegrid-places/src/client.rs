//! HTTP client for the Google Places and Geocoding endpoints.
//!
//! Wraps `reqwest` with typed error handling, API key header management,
//! and conversion of the wire payloads into the shared domain records.
//! Base URLs are injectable so tests can point the client at a mock server.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use placegrid_core::{BoundingBox, PlaceDetail};

use crate::error::PlacesError;
use crate::types::{
    Geocoded, GeocodeResponse, LocationBias, SearchPage, SearchTextRequest, SearchTextResponse,
    WirePlaceDetail,
};

const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";
const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";

/// Results per text-search page; the upstream maximum.
const PAGE_SIZE: u32 = 20;

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.rating,places.userRatingCount,places.businessStatus,\
places.websiteUri,places.priceLevel,nextPageToken";

const DETAIL_FIELD_MASK: &str = "id,displayName,formattedAddress,location,rating,\
userRatingCount,businessStatus,websiteUri,priceLevel,nationalPhoneNumber,reviews";

/// Client for the Places text-search, place-details, and geocoding endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_urls`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    places_base: String,
    geocode_base: String,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_urls(
            api_key,
            timeout_secs,
            DEFAULT_PLACES_BASE_URL,
            DEFAULT_GEOCODE_BASE_URL,
        )
    }

    /// Creates a new client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if either
    /// base URL does not parse.
    pub fn with_base_urls(
        api_key: &str,
        timeout_secs: u64,
        places_base_url: &str,
        geocode_base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("placegrid/0.1 (place-search)")
            .build()?;

        let places_base = normalize_base_url(places_base_url)?;
        let geocode_base = normalize_base_url(geocode_base_url)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            places_base,
            geocode_base,
        })
    }

    /// Fetches one page of text-search results, optionally biased to a
    /// rectangle and/or continuing from a pagination token.
    ///
    /// An HTTP 400 response maps to [`PlacesError::InvalidRequest`] — the
    /// transient signal a fresh page token produces before the upstream has
    /// activated it. A 200 response with no places is a valid empty page
    /// (the zero-results condition), not an error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::InvalidRequest`] — HTTP 400 (retriable).
    /// - [`PlacesError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`PlacesError::Http`] — network or TLS failure.
    /// - [`PlacesError::Deserialize`] — response body does not match the
    ///   expected shape.
    pub async fn search_text(
        &self,
        query: &str,
        bias: Option<&BoundingBox>,
        page_token: Option<&str>,
    ) -> Result<SearchPage, PlacesError> {
        let url = format!("{}/v1/places:searchText", self.places_base);
        let body = SearchTextRequest {
            text_query: query,
            page_size: PAGE_SIZE,
            location_bias: bias.map(LocationBias::from),
            page_token,
        };

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let detail = truncate_body(&response.text().await.unwrap_or_default());
            return Err(PlacesError::InvalidRequest {
                endpoint: "places:searchText".to_owned(),
                detail,
            });
        }
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let raw = response.text().await?;
        let parsed: SearchTextResponse =
            serde_json::from_str(&raw).map_err(|e| PlacesError::Deserialize {
                context: format!("searchText(query={query})"),
                source: e,
            })?;

        Ok(SearchPage {
            places: parsed
                .places
                .into_iter()
                .filter_map(crate::types::WirePlace::into_summary)
                .collect(),
            next_page_token: parsed.next_page_token,
        })
    }

    /// Fetches the enriched record for one place.
    ///
    /// Reviews are truncated to ten entries. Callers are expected to fall
    /// back to the summary they already hold on any error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::UnexpectedStatus`] — any non-2xx status.
    /// - [`PlacesError::Http`] — network or TLS failure.
    /// - [`PlacesError::Deserialize`] — response body does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let url = format!("{}/v1/places/{place_id}", self.places_base);

        let response = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAIL_FIELD_MASK)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let raw = response.text().await?;
        let parsed: WirePlaceDetail =
            serde_json::from_str(&raw).map_err(|e| PlacesError::Deserialize {
                context: format!("placeDetails(id={place_id})"),
                source: e,
            })?;

        Ok(parsed.into_detail(place_id))
    }

    /// Geocodes a free-text address.
    ///
    /// Returns `Ok(None)` when the upstream reports `ZERO_RESULTS` so callers
    /// can move on to the next phrasing variant without error handling.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiStatus`] — the envelope status is neither `OK`
    ///   nor `ZERO_RESULTS`.
    /// - [`PlacesError::UnexpectedStatus`] — non-2xx HTTP status.
    /// - [`PlacesError::Http`] — network or TLS failure.
    /// - [`PlacesError::Deserialize`] — response body does not match the
    ///   expected shape.
    pub async fn geocode(&self, address: &str) -> Result<Option<Geocoded>, PlacesError> {
        let url = self.geocode_url(address)?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let raw = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&raw).map_err(|e| PlacesError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed
                .results
                .into_iter()
                .next()
                .map(crate::types::GeocodeResult::into_geocoded)),
            "ZERO_RESULTS" => Ok(None),
            other => Err(PlacesError::ApiStatus {
                status: other.to_owned(),
            }),
        }
    }

    /// Builds the geocoding URL with a properly percent-encoded address.
    fn geocode_url(&self, address: &str) -> Result<Url, PlacesError> {
        let base = format!("{}/maps/api/geocode/json", self.geocode_base);
        let mut url = Url::parse(&base).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base,
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Trims a trailing slash so URL formatting stays predictable.
fn normalize_base_url(base_url: &str) -> Result<String, PlacesError> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(trimmed.to_owned())
}

/// Keeps error payloads short enough for structured logs.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_owned()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}…", &body[..cut])
    }
}
