//! Pulse Extractor main entry point
//!
//! This is the command-line interface: crawl documentation sites and print
//! the inferred module hierarchy.

use anyhow::Context;
use clap::Parser;
use pulse_extractor::config::{load_config_with_hash, Config};
use pulse_extractor::output::{print_statistics, write_output, OutputFormat};
use pulse_extractor::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pulse Extractor: documentation module inference
///
/// Crawls help centers and documentation sites with per-domain fair-share
/// scheduling, then infers a module and submodule hierarchy from the page
/// headings.
#[derive(Parser, Debug)]
#[command(name = "pulse-extractor")]
#[command(version)]
#[command(about = "Infer documentation modules from help sites", long_about = None)]
struct Cli {
    /// Seed URLs to crawl
    #[arg(long, value_name = "URL", num_args = 1.., required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Global page cap (0 = unlimited)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Per-domain page cap (0 = unlimited)
    #[arg(long, value_name = "N")]
    per_domain_limit: Option<usize>,

    /// Pause between successful fetches, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Bypass the response cache
    #[arg(long)]
    no_cache: bool,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let pipeline = Pipeline::from_config(&config).context("Failed to set up the crawl pipeline")?;

    let cancel = pipeline.crawler().cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the pages fetched so far");
            cancel.cancel();
        }
    });

    let output = pipeline.run(&cli.urls).await;

    if cli.stats {
        print_statistics(&output.stats);
    }

    write_output(&output.records, cli.format, cli.output.as_deref())
        .context("Failed to write results")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only carries results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pulse_extractor=info,warn"),
            1 => EnvFilter::new("pulse_extractor=debug,info"),
            2 => EnvFilter::new("pulse_extractor=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file when given, then applies command-line overrides
///
/// Without a config file the page limits default to unlimited.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let mut config = Config::default();
            config.crawler.max_pages = 0;
            config.crawler.per_domain_limit = 0;
            config
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(per_domain_limit) = cli.per_domain_limit {
        config.crawler.per_domain_limit = per_domain_limit;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }

    pulse_extractor::config::validate(&config).context("Invalid settings")?;

    if let Some(deadline) = config.crawler.max_duration() {
        tracing::info!("Crawl deadline: {:?}", deadline);
    }
    tracing::debug!(
        "Fetch timeout {:?}, delay {:?}",
        config.crawler.request_timeout(),
        config.crawler.delay()
    );

    Ok(config)
}
