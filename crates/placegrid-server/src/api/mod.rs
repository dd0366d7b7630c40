mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use placegrid_core::AppConfig;
use placegrid_places::PlacesClient;
use placegrid_search::GridSearchConfig;

use crate::middleware::request_id;

/// Shared request-handling state. The upstream client is `None` when no
/// credential is configured; each search request then gets a credential
/// error rather than the server refusing to start.
#[derive(Clone)]
pub struct AppState {
    pub client: Option<Arc<PlacesClient>>,
    pub search_config: Arc<GridSearchConfig>,
}

impl AppState {
    /// Builds state from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = match &config.google_places_api_key {
            Some(key) => Some(Arc::new(PlacesClient::with_base_urls(
                key,
                config.request_timeout_secs,
                &config.places_base_url,
                &config.geocode_base_url,
            )?)),
            None => {
                tracing::warn!(
                    "GOOGLE_PLACES_API_KEY not set — search requests will be rejected"
                );
                None
            }
        };
        Ok(Self {
            client,
            search_config: Arc::new(GridSearchConfig::from_app_config(config)),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            request_id: request_id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "invalid_input" | "bad_request" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/search", post(search::search))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}
