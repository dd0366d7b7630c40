use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;

use placegrid_core::SearchIntensity;
use placegrid_search::{run_search, SearchRequest};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const DEFAULT_MAX_RESULTS: usize = 60;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    query: Option<String>,
    max_results: Option<usize>,
    search_intensity: Option<SearchIntensity>,
}

/// `POST /api/v1/search` — runs the full pipeline and returns the place
/// list plus call accounting.
///
/// A missing or blank query and a missing upstream credential are the only
/// request-level failures; everything downstream degrades gracefully inside
/// the pipeline.
pub async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchBody>,
) -> axum::response::Response {
    let query = body.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return ApiError::new(req_id.0, "invalid_input", "query is required").into_response();
    }

    let Some(client) = &state.client else {
        return ApiError::new(
            req_id.0,
            "credential_missing",
            "upstream API credential is not configured",
        )
        .into_response();
    };

    let request = SearchRequest {
        query: query.to_owned(),
        max_results: body.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        intensity: body.search_intensity.unwrap_or_default(),
    };

    tracing::info!(
        query = %request.query,
        max_results = request.max_results,
        intensity = ?request.intensity,
        "search request accepted"
    );

    let response = run_search(client, &request, &state.search_config).await;

    tracing::info!(
        results = response.results.len(),
        api_calls = response.meta.total_api_calls,
        degraded = response.meta.error.is_some(),
        "search request completed"
    );

    (StatusCode::OK, Json(response)).into_response()
}
