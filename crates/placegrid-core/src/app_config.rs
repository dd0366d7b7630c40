use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub google_places_api_key: Option<String>,
    pub places_base_url: String,
    pub geocode_base_url: String,
    pub request_timeout_secs: u64,
    pub default_country: String,
    pub default_radius_deg: f64,
    pub grid_span_scale_threshold_deg: f64,
    pub page_depth: u32,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub tile_batch_size: usize,
    pub inter_batch_delay_ms: u64,
    pub inter_page_delay_ms: u64,
    pub detail_concurrency: usize,
    pub standard_search_max: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("default_country", &self.default_country)
            .field("default_radius_deg", &self.default_radius_deg)
            .field(
                "grid_span_scale_threshold_deg",
                &self.grid_span_scale_threshold_deg,
            )
            .field("page_depth", &self.page_depth)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("tile_batch_size", &self.tile_batch_size)
            .field("inter_batch_delay_ms", &self.inter_batch_delay_ms)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("detail_concurrency", &self.detail_concurrency)
            .field("standard_search_max", &self.standard_search_max)
            .finish()
    }
}
