//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use placegrid_places::{PlacesClient, PlacesError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_urls("test-key", 30, base_url, base_url)
        .expect("client construction should not fail")
}

fn place_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "displayName": { "text": name },
        "formattedAddress": format!("{name} St, Springfield"),
        "location": { "latitude": 39.78, "longitude": -89.65 },
        "rating": 4.2,
        "userRatingCount": 37,
        "businessStatus": "OPERATIONAL"
    })
}

#[tokio::test]
async fn search_text_parses_places_and_token() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "places": [place_json("p1", "First Cafe"), place_json("p2", "Second Cafe")],
        "nextPageToken": "tok-2"
    });

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(body_partial_json(serde_json::json!({ "textQuery": "cafes" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .search_text("cafes", None, None)
        .await
        .expect("should parse search page");

    assert_eq!(page.places.len(), 2);
    assert_eq!(page.places[0].place_id, "p1");
    assert_eq!(page.places[0].name, "First Cafe");
    assert_eq!(page.places[1].rating, Some(4.2));
    assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn search_text_sends_rectangle_bias_and_token() {
    let server = MockServer::start().await;

    let expected = serde_json::json!({
        "pageToken": "tok-2",
        "locationBias": {
            "rectangle": {
                "low": { "latitude": 39.0, "longitude": -90.0 },
                "high": { "latitude": 40.0, "longitude": -89.0 }
            }
        }
    });

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .and(body_partial_json(&expected))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "places": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let bounds = placegrid_core::BoundingBox::new(
        placegrid_core::Coordinate::new(39.0, -90.0),
        placegrid_core::Coordinate::new(40.0, -89.0),
    );
    let client = test_client(&server.uri());
    let page = client
        .search_text("cafes", Some(&bounds), Some("tok-2"))
        .await
        .expect("should accept empty page");

    assert!(page.places.is_empty());
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn search_text_maps_400_to_invalid_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("{\"error\":{\"status\":\"INVALID_ARGUMENT\"}}"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_text("cafes", None, Some("not-ready-token"))
        .await
        .expect_err("400 must be an error");

    assert!(
        matches!(err, PlacesError::InvalidRequest { .. }),
        "expected InvalidRequest, got: {err}"
    );
}

#[tokio::test]
async fn search_text_maps_other_statuses_to_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_text("cafes", None, None)
        .await
        .expect_err("403 must be an error");

    assert!(matches!(
        err,
        PlacesError::UnexpectedStatus { status: 403, .. }
    ));
}

#[tokio::test]
async fn place_details_parses_phone_and_reviews() {
    let server = MockServer::start().await;

    let reviews: Vec<serde_json::Value> = (0..12)
        .map(|i| {
            serde_json::json!({
                "authorAttribution": { "displayName": format!("Reviewer {i}") },
                "rating": 4,
                "text": { "text": "solid espresso" },
                "relativePublishTimeDescription": "2 weeks ago"
            })
        })
        .collect();

    let body = serde_json::json!({
        "id": "p1",
        "displayName": { "text": "First Cafe" },
        "formattedAddress": "1 Main St, Springfield",
        "location": { "latitude": 39.78, "longitude": -89.65 },
        "rating": 4.4,
        "nationalPhoneNumber": "(217) 555-0188",
        "websiteUri": "https://firstcafe.example.com",
        "reviews": reviews
    });

    Mock::given(method("GET"))
        .and(path("/v1/places/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = client
        .place_details("p1")
        .await
        .expect("should parse detail");

    assert_eq!(detail.summary.place_id, "p1");
    assert_eq!(detail.summary.name, "First Cafe");
    assert_eq!(detail.phone.as_deref(), Some("(217) 555-0188"));
    assert_eq!(detail.reviews.len(), 10, "reviews must be capped at ten");
    assert_eq!(detail.reviews[0].author, "Reviewer 0");
    assert_eq!(detail.reviews[0].relative_time, "2 weeks ago");
}

#[tokio::test]
async fn place_details_surfaces_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/places/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .place_details("missing")
        .await
        .expect_err("404 must be an error");

    assert!(matches!(
        err,
        PlacesError::UnexpectedStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn geocode_parses_location_and_viewport() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [{
            "geometry": {
                "location": { "lat": 39.7817, "lng": -89.6501 },
                "viewport": {
                    "southwest": { "lat": 39.6, "lng": -89.8 },
                    "northeast": { "lat": 39.9, "lng": -89.5 }
                }
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Springfield"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let geocoded = client
        .geocode("Springfield")
        .await
        .expect("should parse geocode response")
        .expect("OK status should yield a result");

    assert!((geocoded.location.lat - 39.7817).abs() < 1e-6);
    let bounds = geocoded.bounds.expect("viewport should map to bounds");
    assert!((bounds.sw.lng - (-89.8)).abs() < 1e-6);
    assert!((bounds.ne.lat - 39.9).abs() < 1e-6);
}

#[tokio::test]
async fn geocode_zero_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let geocoded = client
        .geocode("Nowhereville")
        .await
        .expect("ZERO_RESULTS is not an error");

    assert!(geocoded.is_none());
}

#[tokio::test]
async fn geocode_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode("Springfield")
        .await
        .expect_err("REQUEST_DENIED must be an error");

    assert!(
        matches!(err, PlacesError::ApiStatus { ref status } if status == "REQUEST_DENIED"),
        "expected ApiStatus(REQUEST_DENIED), got: {err}"
    );
}
