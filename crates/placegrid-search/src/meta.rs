//! Call-accounting and diagnostic metadata carried through the pipeline.
//!
//! Everything here is informational: it is reported in the response but
//! never drives control flow.

use placegrid_core::{BoundingBox, PlaceDetail};
use serde::Serialize;

/// Per-tile diagnostic record emitted by the orchestrator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLog {
    pub tile_id: String,
    pub bounds: BoundingBox,
    /// Pages that returned results.
    pub pages: u32,
    /// Results before any deduplication.
    pub raw: usize,
    /// Results not present in the seen-set snapshot taken at batch start.
    /// Diagnostic only — the coordinator's merge owns authoritative dedup.
    pub new_unique: usize,
    /// Upstream calls consumed, including retries.
    pub calls: u32,
}

/// Accounting accumulated by the coordinator across the search phase.
#[derive(Debug, Clone, Default)]
pub struct SearchMeta {
    pub api_calls: u32,
    pub tiles_created: usize,
    pub tiles_processed: usize,
    pub raw_results: usize,
    pub unique_results: usize,
    pub tile_logs: Vec<TileLog>,
    /// Set when the grid pipeline degraded to a standard search.
    pub error: Option<String>,
}

/// The response envelope handed to the hosting wrapper and the CLI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<PlaceDetail>,
    pub api_calls_used: u32,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub tiles_created: usize,
    pub tiles_processed: usize,
    pub raw_results: usize,
    pub unique_results: usize,
    pub tile_logs: Vec<TileLog>,
    pub details_calls: u32,
    pub total_api_calls: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn assemble(results: Vec<PlaceDetail>, meta: SearchMeta, details_calls: u32) -> Self {
        Self {
            results,
            api_calls_used: meta.api_calls,
            meta: ResponseMeta {
                tiles_created: meta.tiles_created,
                tiles_processed: meta.tiles_processed,
                raw_results: meta.raw_results,
                unique_results: meta.unique_results,
                tile_logs: meta.tile_logs,
                details_calls,
                total_api_calls: meta.api_calls + details_calls,
                error: meta.error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_sums_total_calls() {
        let meta = SearchMeta {
            api_calls: 12,
            ..SearchMeta::default()
        };
        let response = SearchResponse::assemble(Vec::new(), meta, 5);
        assert_eq!(response.api_calls_used, 12);
        assert_eq!(response.meta.details_calls, 5);
        assert_eq!(response.meta.total_api_calls, 17);
    }

    #[test]
    fn response_serializes_camel_case_and_omits_absent_error() {
        let response = SearchResponse::assemble(Vec::new(), SearchMeta::default(), 0);
        let json = serde_json::to_value(&response).expect("serialize response");
        assert!(json["meta"]["tileLogs"].as_array().is_some());
        assert!(json["apiCallsUsed"].is_number());
        assert!(json["meta"].get("error").is_none());
    }
}
