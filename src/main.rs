use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use pricegrid::app::{App, AppEvent};
use pricegrid::config::Config;
use pricegrid::feed::{health, retriever_for, HealthMonitor, HealthReport};
use pricegrid::listing::{feed_groups, FeedCatalog, FetchOrchestrator};
use pricegrid::ui::{self, listing::ListingProps, listing::ListingView};

/// Get the default config file path (~/.config/pricegrid/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("pricegrid")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "pricegrid",
    about = "Browse decentralized price reference feeds grouped by pair"
)]
struct Args {
    /// Config file (default: ~/.config/pricegrid/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed list URL or local JSON file
    #[arg(long, value_name = "SOURCE")]
    feeds: Option<String>,

    /// Show per-feed health on grid items
    #[arg(long)]
    enable_health: bool,

    /// Show off-chain comparison links on grid items
    #[arg(long)]
    compare_offchain: bool,

    /// Color theme (dark or light)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the grouped listing once and exit
    #[arg(long)]
    list: bool,
}

fn resolve_config(args: &Args) -> Result<Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.apply_env();

    if let Some(feeds) = &args.feeds {
        config.feeds_source = feeds.clone();
    }
    if args.enable_health {
        config.enable_health = true;
    }
    if args.compare_offchain {
        config.compare_offchain = true;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }
    Ok(config)
}

/// Retrieve once, print the grouped listing to stdout.
async fn print_listing(config: &Config, orchestrator: FetchOrchestrator) -> Result<()> {
    let mut catalog = FeedCatalog::new();
    orchestrator
        .fetch_feeds(&mut catalog)
        .await
        .with_context(|| format!("Failed to load feeds from {}", orchestrator.source()))?;

    let report = if config.enable_health {
        health::monitor_for(config)
            .check(catalog.current_feeds())
            .await
    } else {
        HealthReport::new()
    };

    let props = ListingProps {
        loading_feeds: catalog.is_loading(),
        feed_groups: feed_groups(&catalog),
        enable_health: config.enable_health,
        compare_offchain: config.compare_offchain,
    };
    let tree = ListingView::new().compose(&props);
    print!("{}", ui::render_plain(&tree, &report));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the TUI or --list output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let retriever = retriever_for(&config.feeds_source, config.request_timeout())
        .context("Failed to create feed retriever")?;
    let orchestrator = FetchOrchestrator::new(retriever);
    tracing::info!(source = %orchestrator.source(), "Using feed source");

    if args.list {
        return print_listing(&config, orchestrator).await;
    }

    let mut app = App::new(&config, orchestrator, health::monitor_for(&config));

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}
