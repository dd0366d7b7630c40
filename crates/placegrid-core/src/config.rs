use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any configured value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any configured value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// The upstream API key (`GOOGLE_PLACES_API_KEY`) is deliberately optional here:
/// its absence is reported per request as a credential error, not at startup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PLACEGRID_ENV", "development"));
    let bind_addr = parse_addr("PLACEGRID_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PLACEGRID_LOG_LEVEL", "info");

    let google_places_api_key = lookup("GOOGLE_PLACES_API_KEY").ok();
    let places_base_url = or_default(
        "PLACEGRID_PLACES_BASE_URL",
        "https://places.googleapis.com",
    );
    let geocode_base_url = or_default(
        "PLACEGRID_GEOCODE_BASE_URL",
        "https://maps.googleapis.com",
    );

    let request_timeout_secs = parse_u64("PLACEGRID_REQUEST_TIMEOUT_SECS", "30")?;
    let default_country = or_default("PLACEGRID_DEFAULT_COUNTRY", "USA");
    let default_radius_deg = parse_f64("PLACEGRID_DEFAULT_RADIUS_DEG", "0.25")?;
    let grid_span_scale_threshold_deg =
        parse_f64("PLACEGRID_GRID_SPAN_SCALE_THRESHOLD_DEG", "0.5")?;

    let page_depth = parse_u32("PLACEGRID_PAGE_DEPTH", "3")?;
    let max_retries = parse_u32("PLACEGRID_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PLACEGRID_RETRY_BACKOFF_BASE_MS", "1000")?;
    let tile_batch_size = parse_usize("PLACEGRID_TILE_BATCH_SIZE", "4")?;
    let inter_batch_delay_ms = parse_u64("PLACEGRID_INTER_BATCH_DELAY_MS", "300")?;
    let inter_page_delay_ms = parse_u64("PLACEGRID_INTER_PAGE_DELAY_MS", "2200")?;
    let detail_concurrency = parse_usize("PLACEGRID_DETAIL_CONCURRENCY", "4")?;
    let standard_search_max = parse_usize("PLACEGRID_STANDARD_SEARCH_MAX", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        google_places_api_key,
        places_base_url,
        geocode_base_url,
        request_timeout_secs,
        default_country,
        default_radius_deg,
        grid_span_scale_threshold_deg,
        page_depth,
        max_retries,
        retry_backoff_base_ms,
        tile_batch_size,
        inter_batch_delay_ms,
        inter_page_delay_ms,
        detail_concurrency,
        standard_search_max,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert!(cfg.google_places_api_key.is_none());
        assert_eq!(cfg.page_depth, 3);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_ms, 1_000);
        assert_eq!(cfg.tile_batch_size, 4);
        assert_eq!(cfg.inter_batch_delay_ms, 300);
        assert_eq!(cfg.inter_page_delay_ms, 2_200);
        assert_eq!(cfg.standard_search_max, 60);
        assert!((cfg.default_radius_deg - 0.25).abs() < f64::EPSILON);
        assert!((cfg.grid_span_scale_threshold_deg - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.default_country, "USA");
    }

    #[test]
    fn build_app_config_reads_api_key() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("GOOGLE_PLACES_API_KEY", "key-123");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
        assert_eq!(cfg.google_places_api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PLACEGRID_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_BIND_ADDR"),
            "expected InvalidEnvVar(PLACEGRID_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_threshold() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PLACEGRID_GRID_SPAN_SCALE_THRESHOLD_DEG", "wide");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "PLACEGRID_GRID_SPAN_SCALE_THRESHOLD_DEG"),
            "expected InvalidEnvVar(PLACEGRID_GRID_SPAN_SCALE_THRESHOLD_DEG), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_page_depth() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PLACEGRID_PAGE_DEPTH", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_PAGE_DEPTH"),
            "expected InvalidEnvVar(PLACEGRID_PAGE_DEPTH), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_delays() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PLACEGRID_INTER_PAGE_DELAY_MS", "0");
        map.insert("PLACEGRID_INTER_BATCH_DELAY_MS", "0");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
        assert_eq!(cfg.inter_page_delay_ms, 0);
        assert_eq!(cfg.inter_batch_delay_ms, 0);
    }
}
