//! Strategy selection, merge/dedup, and graceful degradation.
//!
//! Small result budgets run a single-query standard search. Large budgets
//! run the grid pipeline: resolve the location, partition the area, fan out
//! over tiles, then merge. Any unrecoverable grid failure falls back to the
//! standard search with the original query — the caller always gets the
//! same success shape, and the degradation is visible only in the metadata.

use std::collections::HashSet;

use placegrid_core::{PlaceSummary, SearchIntensity};
use placegrid_places::PlacesClient;

use crate::meta::SearchMeta;
use crate::orchestrator::{self, TileOutcome};
use crate::resolver;
use crate::{grid, GridSearchConfig, SearchError};

/// One inbound search, validated by the hosting wrapper.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub intensity: SearchIntensity,
}

/// Runs the search phase and returns the deduplicated summaries plus
/// accounting. Never fails: grid-path errors degrade to the standard
/// search and are recorded in `meta.error`.
pub async fn execute(
    client: &PlacesClient,
    request: &SearchRequest,
    config: &GridSearchConfig,
) -> (Vec<PlaceSummary>, SearchMeta) {
    let mut meta = SearchMeta::default();

    if request.max_results <= config.standard_search_max {
        let places = standard_search(client, &request.query, request.max_results, config, &mut meta)
            .await;
        return (places, meta);
    }

    match grid_search(client, request, config, &mut meta).await {
        Ok(places) => (places, meta),
        Err(err) => {
            tracing::warn!(
                query = %request.query,
                error = %err,
                "grid search failed — falling back to standard search"
            );
            meta.error = Some(err.to_string());
            let places =
                standard_search(client, &request.query, request.max_results, config, &mut meta)
                    .await;
            (places, meta)
        }
    }
}

/// Single-query search following pagination up to the page-depth bound or
/// until the budget is met. No geocoding, no grid, and — by policy — no
/// truncation to `max_results`: this path caps by page count only.
async fn standard_search(
    client: &PlacesClient,
    query: &str,
    max_results: usize,
    config: &GridSearchConfig,
    meta: &mut SearchMeta,
) -> Vec<PlaceSummary> {
    let mut collected: Vec<PlaceSummary> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page_token: Option<String> = None;

    for page_index in 0..config.page_depth {
        if page_index > 0 && config.inter_page_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(config.inter_page_delay_ms))
                .await;
        }

        let (result, calls) =
            orchestrator::fetch_page(client, query, None, page_token.as_deref(), config).await;
        meta.api_calls += calls;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(query, page = page_index, error = %err, "standard search page failed");
                break;
            }
        };

        if page.places.is_empty() {
            break;
        }

        meta.raw_results += page.places.len();
        for place in page.places {
            if seen.insert(place.place_id.clone()) {
                collected.push(place);
            }
        }

        if collected.len() >= max_results {
            break;
        }
        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }

    meta.unique_results = collected.len();
    collected
}

/// The wide-area pipeline: resolve → partition → orchestrate → merge.
async fn grid_search(
    client: &PlacesClient,
    request: &SearchRequest,
    config: &GridSearchConfig,
    meta: &mut SearchMeta,
) -> Result<Vec<PlaceSummary>, SearchError> {
    let parts = resolver::split_query(&request.query);
    tracing::debug!(
        term = %parts.search_term,
        location = %parts.location_phrase,
        "query split for grid search"
    );

    let area = resolver::resolve_area(
        client,
        &parts.location_phrase,
        config,
        &mut meta.api_calls,
    )
    .await?;

    let density = grid::grid_density(
        &area.bounds,
        request.intensity,
        config.span_scale_threshold_deg,
    );
    let tiles = grid::partition(&area.bounds, density);
    meta.tiles_created = tiles.len();
    tracing::info!(
        density,
        tiles = tiles.len(),
        lat_span = area.bounds.lat_span(),
        lng_span = area.bounds.lng_span(),
        "search area partitioned"
    );

    let outcomes = orchestrator::run_tiles(
        client,
        &parts.search_term,
        &tiles,
        request.max_results,
        config,
    )
    .await;

    meta.tiles_processed = outcomes.len();
    for outcome in &outcomes {
        meta.api_calls += outcome.log.calls;
        meta.raw_results += outcome.log.raw;
    }

    let (merged, unique_total) = merge_outcomes(&outcomes, request.max_results);
    meta.unique_results = unique_total;
    meta.tile_logs = outcomes.into_iter().map(|o| o.log).collect();

    Ok(merged)
}

/// Merges tile outputs into one ordered list: tiles in grid order, places
/// in response order within a tile, first-seen-wins on `place_id`, capped
/// at `max_results`. Also returns the uncapped unique count for accounting.
fn merge_outcomes(
    outcomes: &[TileOutcome],
    max_results: usize,
) -> (Vec<PlaceSummary>, usize) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged: Vec<PlaceSummary> = Vec::new();
    let mut unique_total = 0usize;

    for outcome in outcomes {
        for place in &outcome.places {
            if seen.insert(place.place_id.as_str()) {
                unique_total += 1;
                if merged.len() < max_results {
                    merged.push(place.clone());
                }
            }
        }
    }

    (merged, unique_total)
}
