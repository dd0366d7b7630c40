//! Wide-area place search pipeline.
//!
//! The upstream text-search API caps a single query at three pages of
//! twenty results. To go wider, the coordinator partitions the resolved
//! search area into a grid of non-overlapping tiles, fans sub-searches out
//! over the tiles in bounded concurrent batches, and merges the results
//! into one deduplicated, order-stable list. On any unrecoverable failure
//! the pipeline degrades to a plain single-query search and reports the
//! degradation in the response metadata instead of failing the request.

pub mod coordinator;
pub mod enrich;
pub mod grid;
pub mod meta;
pub mod orchestrator;
pub mod resolver;

pub use coordinator::SearchRequest;
pub use meta::{SearchMeta, SearchResponse, TileLog};

use placegrid_core::AppConfig;
use placegrid_places::{PlacesClient, PlacesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("location could not be resolved: {phrase}")]
    LocationUnresolvable { phrase: String },

    #[error(transparent)]
    Places(#[from] PlacesError),
}

/// Tuning knobs for the search pipeline. Defaults match the production
/// upstream constraints; tests override the delays to zero.
#[derive(Debug, Clone)]
pub struct GridSearchConfig {
    pub default_country: String,
    /// Half-width in degrees of the box synthesized when geocoding returns
    /// no viewport (0.25° ≈ 25 km).
    pub default_radius_deg: f64,
    /// Boxes whose larger span exceeds this get one extra grid row/column.
    pub span_scale_threshold_deg: f64,
    pub page_depth: u32,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub tile_batch_size: usize,
    pub inter_batch_delay_ms: u64,
    /// Pagination tokens are not valid immediately; the upstream requires a
    /// pause before the follow-up call.
    pub inter_page_delay_ms: u64,
    pub detail_concurrency: usize,
    /// Budgets at or below this run the single-query standard search.
    pub standard_search_max: usize,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            default_country: "USA".to_owned(),
            default_radius_deg: 0.25,
            span_scale_threshold_deg: 0.5,
            page_depth: 3,
            max_retries: 3,
            retry_backoff_base_ms: 1_000,
            tile_batch_size: 4,
            inter_batch_delay_ms: 300,
            inter_page_delay_ms: 2_200,
            detail_concurrency: 4,
            standard_search_max: 60,
        }
    }
}

impl GridSearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_country: config.default_country.clone(),
            default_radius_deg: config.default_radius_deg,
            span_scale_threshold_deg: config.grid_span_scale_threshold_deg,
            page_depth: config.page_depth,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            tile_batch_size: config.tile_batch_size,
            inter_batch_delay_ms: config.inter_batch_delay_ms,
            inter_page_delay_ms: config.inter_page_delay_ms,
            detail_concurrency: config.detail_concurrency,
            standard_search_max: config.standard_search_max,
        }
    }
}

/// Runs the full pipeline for one request: strategy selection and merge in
/// the coordinator, then concurrent detail enrichment, then response
/// assembly. Never fails — every upstream problem either degrades a single
/// record or falls back to the standard search path.
pub async fn run_search(
    client: &PlacesClient,
    request: &SearchRequest,
    config: &GridSearchConfig,
) -> SearchResponse {
    let (places, search_meta) = coordinator::execute(client, request, config).await;
    let (results, details_calls) =
        enrich::enrich_places(client, places, config.detail_concurrency).await;
    SearchResponse::assemble(results, search_meta, details_calls)
}
