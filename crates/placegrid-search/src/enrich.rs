//! Concurrent detail enrichment with per-record fallback.
//!
//! Every deduplicated summary gets one detail lookup. Lookups run with
//! bounded, order-preserving concurrency; a failed lookup degrades that one
//! record to its summary fields with an empty review list and never aborts
//! the batch.

use futures::stream::{self, StreamExt};
use placegrid_core::{PlaceDetail, PlaceSummary};
use placegrid_places::PlacesClient;

/// Enriches all summaries, preserving input order. Returns the detail
/// records and the number of detail calls issued (one per place).
#[allow(clippy::cast_possible_truncation)]
pub async fn enrich_places(
    client: &PlacesClient,
    places: Vec<PlaceSummary>,
    concurrency: usize,
) -> (Vec<PlaceDetail>, u32) {
    let calls = places.len() as u32;

    let details: Vec<PlaceDetail> = stream::iter(places)
        .map(|summary| async move {
            match client.place_details(&summary.place_id).await {
                Ok(fetched) => merge_detail(summary, fetched),
                Err(err) => {
                    tracing::warn!(
                        place_id = %summary.place_id,
                        error = %err,
                        "detail lookup failed — using summary fields"
                    );
                    PlaceDetail::from_summary(summary)
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    (details, calls)
}

/// Merges a fetched detail into the summary we already hold, preferring
/// detail-provided fields where present — details may be more complete than
/// the search result that discovered the place.
fn merge_detail(summary: PlaceSummary, fetched: PlaceDetail) -> PlaceDetail {
    let d = fetched.summary;
    PlaceDetail {
        summary: PlaceSummary {
            place_id: summary.place_id,
            name: if d.name.is_empty() { summary.name } else { d.name },
            address: d.address.or(summary.address),
            location: summary.location,
            rating: d.rating.or(summary.rating),
            user_rating_count: d.user_rating_count.or(summary.user_rating_count),
            business_status: d.business_status.or(summary.business_status),
            website: d.website.or(summary.website),
            price_level: d.price_level.or(summary.price_level),
        },
        phone: fetched.phone,
        reviews: fetched.reviews,
    }
}
