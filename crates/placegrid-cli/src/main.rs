use clap::{Parser, Subcommand, ValueEnum};

use placegrid_core::SearchIntensity;
use placegrid_places::PlacesClient;
use placegrid_search::{run_search, GridSearchConfig, SearchRequest};

#[derive(Debug, Parser)]
#[command(name = "placegrid-cli")]
#[command(about = "Placegrid command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a place search and print the JSON response to stdout.
    Search {
        /// Free-text query, e.g. "restaurants in New York".
        #[arg(long)]
        query: String,
        /// Target result count; budgets above 60 enable the grid expansion.
        #[arg(long, default_value_t = 60)]
        max_results: usize,
        /// Grid density knob for wide-area searches.
        #[arg(long, value_enum, default_value = "low")]
        intensity: IntensityArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntensityArg {
    Low,
    Medium,
    High,
}

impl From<IntensityArg> for SearchIntensity {
    fn from(value: IntensityArg) -> Self {
        match value {
            IntensityArg::Low => Self::Low,
            IntensityArg::Medium => Self::Medium,
            IntensityArg::High => Self::High,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            query,
            max_results,
            intensity,
        } => run_search_command(query, max_results, intensity.into()).await,
    }
}

async fn run_search_command(
    query: String,
    max_results: usize,
    intensity: SearchIntensity,
) -> anyhow::Result<()> {
    let config = placegrid_core::load_app_config_from_env()?;
    let api_key = config
        .google_places_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("GOOGLE_PLACES_API_KEY is required for search"))?;

    let client = PlacesClient::with_base_urls(
        api_key,
        config.request_timeout_secs,
        &config.places_base_url,
        &config.geocode_base_url,
    )?;
    let search_config = GridSearchConfig::from_app_config(&config);

    let request = SearchRequest {
        query,
        max_results,
        intensity,
    };
    let response = run_search(&client, &request, &search_config).await;

    tracing::info!(
        results = response.results.len(),
        api_calls = response.meta.total_api_calls,
        degraded = response.meta.error.is_some(),
        "search finished"
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
