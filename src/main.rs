mod app;
mod event;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use marquee::cache::SqliteStore;
use marquee::catalog::TmdbService;
use marquee::config::Config;
use marquee::connectivity::{Connectivity, NetworkMonitor, StaticConnectivity};
use marquee::logging;
use marquee::sync::{SyncHandle, Synchronizer};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// How often the catalog host is probed for the offline banner
const CONNECTIVITY_PROBE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "A terminal browser for popular movies, with an offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/marquee/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Catalog language, e.g. en-US
  #[arg(short, long)]
  language: Option<String>,

  /// Keep fetched movies in memory only
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = Config::load(args.config.as_deref())?;

  // Override from command line
  if let Some(language) = args.language {
    config.tmdb.language = language;
  }
  if args.no_cache {
    config.cache.enabled = false;
  }

  let _log_guard = logging::init(&Config::data_dir()?.join("logs"))?;

  let api_key = Config::get_api_key()?;
  let service = TmdbService::from_config(&config.tmdb, api_key)?;

  let store = if config.cache.enabled {
    let path = config.cache_path()?;
    info!(path = %path.display(), "opening movie cache");
    SqliteStore::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?
  } else {
    SqliteStore::open_in_memory().map_err(|e| eyre!("Failed to create in-memory cache: {}", e))?
  };

  let sync = SyncHandle::spawn(Synchronizer::new(service, store));

  let connectivity: Box<dyn Connectivity> =
    match NetworkMonitor::for_url(&config.tmdb.base_url, CONNECTIVITY_PROBE_INTERVAL) {
      Some(monitor) => Box::new(monitor),
      None => Box::new(StaticConnectivity(true)),
    };

  // Initialize and run the app
  let mut app = app::App::new(&config, sync, connectivity);
  app.run().await?;

  Ok(())
}
