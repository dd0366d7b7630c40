//! Per-tile paginated searches fanned out in bounded concurrent batches.
//!
//! Within a tile, pages are strictly sequential: each page depends on the
//! previous page's token, and tokens need a pause before they become valid.
//! Across tiles, searches run in fixed-size batches with a delay between
//! batches for upstream rate-limit compliance. The shared seen-set is never
//! mutated during a batch's fan-out — tile tasks read an immutable snapshot
//! for diagnostics, and ids are folded in single-threaded between batches.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use placegrid_core::{BoundingBox, PlaceSummary};
use placegrid_places::{retry_with_backoff, PlacesClient, PlacesError, SearchPage};

use crate::grid::Tile;
use crate::meta::TileLog;
use crate::GridSearchConfig;

/// Everything one tile produced: its raw result list and diagnostics.
#[derive(Debug)]
pub struct TileOutcome {
    pub tile: Tile,
    pub places: Vec<PlaceSummary>,
    pub log: TileLog,
}

/// One page fetch with bounded retry on the transient invalid-request
/// signal. Returns the page result and the number of calls consumed,
/// retries included.
pub(crate) async fn fetch_page(
    client: &PlacesClient,
    query: &str,
    bias: Option<&BoundingBox>,
    page_token: Option<&str>,
    config: &GridSearchConfig,
) -> (Result<SearchPage, PlacesError>, u32) {
    let calls = AtomicU32::new(0);
    let result = retry_with_backoff(config.max_retries, config.retry_backoff_base_ms, || {
        calls.fetch_add(1, Ordering::Relaxed);
        client.search_text(query, bias, page_token)
    })
    .await;
    (result, calls.into_inner())
}

/// Runs the paginated search for one tile.
///
/// Stops paginating — without raising — when a page comes back empty, when
/// the retry budget for a page is exhausted, when any non-transient error
/// occurs, or at the page-depth bound. Results collected before the stop
/// are kept.
async fn search_tile(
    client: &PlacesClient,
    term: &str,
    tile: Tile,
    seen_snapshot: Arc<HashSet<String>>,
    config: &GridSearchConfig,
) -> TileOutcome {
    let mut log = TileLog {
        tile_id: tile.id(),
        bounds: tile.bounds,
        pages: 0,
        raw: 0,
        new_unique: 0,
        calls: 0,
    };
    let mut places: Vec<PlaceSummary> = Vec::new();
    let mut page_token: Option<String> = None;

    for page_index in 0..config.page_depth {
        if page_index > 0 && config.inter_page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_page_delay_ms)).await;
        }

        let (result, calls) = fetch_page(
            client,
            term,
            Some(&tile.bounds),
            page_token.as_deref(),
            config,
        )
        .await;
        log.calls += calls;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!(
                    tile = %log.tile_id,
                    page = page_index,
                    error = %err,
                    "tile pagination stopped"
                );
                break;
            }
        };

        if page.places.is_empty() {
            break;
        }

        log.pages += 1;
        log.raw += page.places.len();
        log.new_unique += page
            .places
            .iter()
            .filter(|p| !seen_snapshot.contains(&p.place_id))
            .count();
        places.extend(page.places);

        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }

    tracing::debug!(
        tile = %log.tile_id,
        pages = log.pages,
        raw = log.raw,
        new_unique = log.new_unique,
        calls = log.calls,
        "tile search finished"
    );

    TileOutcome {
        tile,
        places,
        log,
    }
}

/// Searches all tiles in fixed-size concurrent batches.
///
/// Between batches the accumulated unique count is checked against
/// `target_unique`: once reached, no further batches are issued. A batch in
/// flight always completes fully, so the realized count may overshoot the
/// target before the coordinator's final truncation.
pub async fn run_tiles(
    client: &PlacesClient,
    term: &str,
    tiles: &[Tile],
    target_unique: usize,
    config: &GridSearchConfig,
) -> Vec<TileOutcome> {
    let mut outcomes: Vec<TileOutcome> = Vec::with_capacity(tiles.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut first_batch = true;

    for batch in tiles.chunks(config.tile_batch_size.max(1)) {
        if !first_batch {
            if seen.len() >= target_unique {
                tracing::debug!(
                    unique = seen.len(),
                    target_unique,
                    "target reached — skipping remaining batches"
                );
                break;
            }
            if config.inter_batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.inter_batch_delay_ms)).await;
            }
        }
        first_batch = false;

        let snapshot = Arc::new(seen.clone());
        let batch_outcomes = join_all(batch.iter().map(|tile| {
            search_tile(client, term, *tile, Arc::clone(&snapshot), config)
        }))
        .await;

        // Single-threaded fold in tile order; the only writes to the set.
        for outcome in batch_outcomes {
            for place in &outcome.places {
                seen.insert(place.place_id.clone());
            }
            outcomes.push(outcome);
        }
    }

    outcomes
}
