//! Heuristic extraction of a search term and location phrase from a raw
//! query, and geocoding of that phrase into a search area.
//!
//! The split is best-effort by design: pattern matchers are tried in order
//! and an unparseable query degrades to treating the whole query as the
//! location. [`split_query`] is pure and never fails, which keeps the
//! heuristics testable away from any network code.

use placegrid_core::{BoundingBox, Coordinate};
use placegrid_places::PlacesClient;
use regex::Regex;

use crate::{GridSearchConfig, SearchError};

/// The two halves of a query: what to search for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParts {
    pub search_term: String,
    pub location_phrase: String,
}

/// A geocoded search area: the anchor coordinate and the box the grid
/// partitioner will tile.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedArea {
    pub center: Coordinate,
    pub bounds: BoundingBox,
}

/// Splits a query into search term and location phrase.
///
/// Patterns, in order:
/// 1. `"X in LOCATION[, REGION]"` — the location may carry one
///    comma-separated qualifier ("Paris, France").
/// 2. `"X, Y"` — comma-separated two-part phrase.
/// 3. Fallback — the last two whitespace tokens are the location.
///
/// Queries too short for any pattern use the whole query as the location;
/// a stripped-out search term shorter than two characters falls back to the
/// first comma-delimited, then first whitespace-delimited, token.
#[must_use]
pub fn split_query(query: &str) -> QueryParts {
    let trimmed = query.trim();

    let re_in = Regex::new(r"(?i)^(.+?)\s+in\s+([^,]+(?:,\s*[^,]+)?)\s*$").expect("valid regex");
    if let Some(caps) = re_in.captures(trimmed) {
        let location = caps[2].trim().to_owned();
        if !location.is_empty() {
            return QueryParts {
                search_term: ensure_term(&caps[1], trimmed),
                location_phrase: location,
            };
        }
    }

    if let Some((head, tail)) = trimmed.split_once(',') {
        let location = tail.trim().to_owned();
        if !head.trim().is_empty() && !location.is_empty() {
            return QueryParts {
                search_term: ensure_term(head, trimmed),
                location_phrase: location,
            };
        }
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() >= 3 {
        let location = tokens[tokens.len() - 2..].join(" ");
        let term = tokens[..tokens.len() - 2].join(" ");
        return QueryParts {
            search_term: ensure_term(&term, trimmed),
            location_phrase: location,
        };
    }

    // Too short to split: the whole query doubles as the location.
    QueryParts {
        search_term: ensure_term("", trimmed),
        location_phrase: trimmed.to_owned(),
    }
}

/// A candidate term shorter than two characters falls back to the first
/// comma token, then the first whitespace token, of the original query.
fn ensure_term(candidate: &str, original: &str) -> String {
    let candidate = candidate.trim();
    if candidate.chars().count() >= 2 {
        return candidate.to_owned();
    }
    let comma_first = original.split(',').next().unwrap_or(original).trim();
    if comma_first.chars().count() >= 2 {
        return comma_first.to_owned();
    }
    let ws_first = original.split_whitespace().next().unwrap_or(original);
    if ws_first.chars().count() >= 2 {
        return ws_first.to_owned();
    }
    original.to_owned()
}

/// Resolves a location phrase to a search area, trying phrasing variants in
/// order: the phrase as-is, then the phrase with the default country
/// qualifier appended. Each attempt consumes one call unit.
///
/// When the winning geocode result carries no viewport, a box of
/// `default_radius_deg` around the anchor coordinate is synthesized.
///
/// # Errors
///
/// Returns [`SearchError::LocationUnresolvable`] when every variant fails;
/// the coordinator treats that as the trigger to degrade to the standard
/// search, not as a fatal error.
pub async fn resolve_area(
    client: &PlacesClient,
    phrase: &str,
    config: &GridSearchConfig,
    calls: &mut u32,
) -> Result<ResolvedArea, SearchError> {
    let phrase = phrase.trim();
    let mut attempts = vec![phrase.to_owned()];
    if !config.default_country.is_empty()
        && !phrase
            .to_lowercase()
            .contains(&config.default_country.to_lowercase())
    {
        attempts.push(format!("{phrase}, {}", config.default_country));
    }

    for attempt in &attempts {
        *calls += 1;
        match client.geocode(attempt).await {
            Ok(Some(geocoded)) => {
                let bounds = geocoded.bounds.unwrap_or_else(|| {
                    BoundingBox::around(geocoded.location, config.default_radius_deg)
                });
                tracing::debug!(phrase = %attempt, "location resolved");
                return Ok(ResolvedArea {
                    center: geocoded.location,
                    bounds,
                });
            }
            Ok(None) => {
                tracing::debug!(phrase = %attempt, "geocoding returned no results");
            }
            Err(err) => {
                tracing::warn!(phrase = %attempt, error = %err, "geocoding attempt failed");
            }
        }
    }

    Err(SearchError::LocationUnresolvable {
        phrase: phrase.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_in_pattern() {
        let parts = split_query("cafes in Springfield");
        assert_eq!(parts.search_term, "cafes");
        assert_eq!(parts.location_phrase, "Springfield");
    }

    #[test]
    fn in_pattern_keeps_region_qualifier() {
        let parts = split_query("hotels in Paris, France");
        assert_eq!(parts.search_term, "hotels");
        assert_eq!(parts.location_phrase, "Paris, France");
    }

    #[test]
    fn in_match_is_case_insensitive() {
        let parts = split_query("Restaurants IN New York");
        assert_eq!(parts.search_term, "Restaurants");
        assert_eq!(parts.location_phrase, "New York");
    }

    #[test]
    fn splits_comma_pattern() {
        let parts = split_query("restaurants, New York");
        assert_eq!(parts.search_term, "restaurants");
        assert_eq!(parts.location_phrase, "New York");
    }

    #[test]
    fn falls_back_to_last_two_tokens() {
        let parts = split_query("best coffee downtown Seattle");
        assert_eq!(parts.search_term, "best coffee");
        assert_eq!(parts.location_phrase, "downtown Seattle");
    }

    #[test]
    fn single_token_query_is_both_term_and_location() {
        let parts = split_query("pizza");
        assert_eq!(parts.search_term, "pizza");
        assert_eq!(parts.location_phrase, "pizza");
    }

    #[test]
    fn two_token_query_uses_whole_query_as_location() {
        let parts = split_query("coffee Seattle");
        assert_eq!(parts.location_phrase, "coffee Seattle");
        assert_eq!(parts.search_term, "coffee");
    }

    #[test]
    fn short_term_falls_back_to_first_token() {
        // Stripping "in Boston" leaves "x" (< 2 chars); the fallback chain
        // lands on the first whitespace token of the original query.
        let parts = split_query("x in Boston");
        assert_eq!(parts.location_phrase, "Boston");
        assert_eq!(parts.search_term, "x in Boston");
    }

    #[test]
    fn never_panics_on_odd_input() {
        for query in ["", "   ", ",", "in", ", ,", "a b c d e f g"] {
            let parts = split_query(query);
            assert!(parts.location_phrase.len() <= query.len().max(1) + 1);
        }
    }
}
