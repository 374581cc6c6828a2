//! Trendcache - today's trending movies, with an offline snapshot.
//!
//! Fetches the trending list once, prints it, and offers a retry when the
//! fetch fails. When there is no network the last fetched list is shown.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trendcache_core::utils::{format_release_date, truncate_string};
use trendcache_core::{
    ApiClient, CacheManager, Config, Connectivity, Movie, MoviesUiState, MoviesViewModel,
    RouteConnectivity, SnapshotStore, StaticConnectivity, TrendingRepository,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum overview length shown under each title
const OVERVIEW_WIDTH: usize = 100;

/// Poster size used for printed links
const POSTER_SIZE: &str = "w500";

/// Command-line switches
struct Options {
    offline: bool,
    clear_cache: bool,
    search: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options {
            offline: false,
            clear_cache: false,
            search: None,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--offline" => options.offline = true,
                "--clear-cache" => options.clear_cache = true,
                "--search" => {
                    let query = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--search needs a query"))?;
                    options.search = Some(query.clone());
                }
                other => anyhow::bail!("Unknown argument: {}", other),
            }
        }

        Ok(options)
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = Options::parse(&args)?;

    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env();

    let store = CacheManager::new(config.cache_dir()?).context("Failed to open cache directory")?;

    if options.clear_cache {
        store.clear().await.context("Failed to clear cache")?;
        println!("Cache cleared.");
        return Ok(());
    }

    let offline = options.offline || config.offline_mode;
    let connectivity: Arc<dyn Connectivity> = if offline {
        Arc::new(StaticConnectivity::offline())
    } else {
        Arc::new(RouteConnectivity::new())
    };

    // The key is only sent on the online path.
    let api_key = if offline {
        config.api_key.clone().unwrap_or_default()
    } else {
        config.api_key()?.to_string()
    };

    let client = ApiClient::with_options(config.base_url(), config.request_timeout())
        .context("Failed to create API client")?;

    info!(offline, cache_dir = %store.cache_dir().display(), "Trendcache starting");

    let repository = TrendingRepository::new(connectivity, client, store.clone(), api_key);
    let view_model = MoviesViewModel::new(Arc::new(repository));

    view_model.fetch_movies();
    loop {
        let state = view_model.wait_until_settled().await;
        let state = match &options.search {
            Some(query) => state.filtered(query),
            None => state,
        };

        match state {
            MoviesUiState::Success(movies) => print_movies(&movies),
            MoviesUiState::Empty => println!("Nothing found."),
            MoviesUiState::Error(message) => {
                eprintln!("Error: {}", message);
                if prompt_retry()? {
                    view_model.retry();
                    continue;
                }
            }
            MoviesUiState::Loading => continue,
        }
        break;
    }

    if let Some(age) = store.snapshot_age().await {
        println!("\nCached list updated {}", age);
    }

    info!("Trendcache shutting down");
    Ok(())
}

fn print_movies(movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        let released = movie
            .release_date
            .as_deref()
            .map(format_release_date)
            .unwrap_or_else(|| "unreleased".to_string());
        println!(
            "{:>3}. {}  [{}]  {}",
            i + 1,
            movie.title,
            released,
            movie.rating_display()
        );
        if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
            println!("     {}", truncate_string(overview, OVERVIEW_WIDTH));
        }
        if let Some(url) = movie.poster_url(POSTER_SIZE) {
            println!("     {}", url);
        }
    }
}

/// Ask whether to retry a failed fetch
fn prompt_retry() -> Result<bool> {
    print!("Retry? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
