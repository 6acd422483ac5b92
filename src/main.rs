//! Sumi-Rank main entry point
//!
//! This is the command-line interface for the Sumi-Rank site ranker.

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;
use sumi_rank::config::{load_config_with_hash, validate, Config};
use sumi_rank::output::{print_report, OutputFormat};
use sumi_rank::{rank_site, Interrupts};
use tracing_subscriber::EnvFilter;

/// Sumi-Rank: crawl a site and rank its pages
///
/// Sumi-Rank crawls every HTML page reachable from the seed URL on the same
/// site, builds the link graph between them and prints their PageRank.
#[derive(Parser, Debug)]
#[command(name = "sumi-rank")]
#[command(version)]
#[command(about = "Crawl a site and rank its pages with PageRank", long_about = None)]
struct Cli {
    /// Seed URL; a bare host such as `example.com` is crawled over https
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Damping factor, in (0, 1)
    #[arg(long)]
    alpha: Option<f64>,

    /// Convergence threshold on the L1 distance between iterations
    #[arg(long)]
    epsilon: Option<f64>,

    /// Give up after this many iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Maximum number of requests the crawl may send
    #[arg(long)]
    max_pages: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(seed) = cli.seed.clone() else {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    let interrupts = Interrupts::new();
    spawn_interrupt_handler(interrupts.clone());

    let report = rank_site(&with_scheme(&seed), &config, &interrupts)
        .await
        .context("Ranking failed")?;
    print_report(&report, cli.format.into()).context("Failed to write report")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_rank=info,warn"),
            1 => EnvFilter::new("sumi_rank=debug,info"),
            2 => EnvFilter::new("sumi_rank=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(alpha) = cli.alpha {
        config.pagerank.alpha = alpha;
    }
    if let Some(epsilon) = cli.epsilon {
        config.pagerank.epsilon = epsilon;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.pagerank.max_iterations = max_iterations;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}

/// Prefixes `https://` when the seed has no scheme
fn with_scheme(seed: &str) -> String {
    if seed.contains("://") {
        seed.to_string()
    } else {
        format!("https://{}", seed)
    }
}

/// Forwards Ctrl-C to the run
///
/// The first Ctrl-C during the crawl stops it and the fetched pages are
/// still ranked; the next one cancels the ranking.
fn spawn_interrupt_handler(interrupts: Interrupts) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupts.interrupt() {
                tracing::warn!("Interrupted, cancelling PageRank");
                break;
            }
            tracing::warn!("Interrupted, finishing in-flight fetches (Ctrl-C again to abort)");
        }
    });
}
