//! Product-Trawler main entry point
//!
//! This is the command-line interface for the Product-Trawler URL discovery crawler.

use clap::Parser;
use product_trawler::config::{load_config, validate, Config};
use product_trawler::crawler::crawl;
use product_trawler::output::{log_statistics, render_report, CrawlStatistics, ReportFormat};
use product_trawler::TrawlerError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Product-Trawler: product-page URL discovery for e-commerce sites
///
/// Product-Trawler visits each seed site twice, once as static HTML and once
/// in a headless browser that scrolls until lazy content stops loading, and
/// reports the links that look like product detail pages.
#[derive(Parser, Debug)]
#[command(name = "product-trawler")]
#[command(version = "1.0.0")]
#[command(about = "Discovers product page URLs on e-commerce sites", long_about = None)]
struct Cli {
    /// Seed URLs to crawl (added to any seeds from the config file)
    #[arg(value_name = "SEEDS")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of sites crawled at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    format: ReportFormat,

    /// Skip the headless browser phase
    #[arg(long)]
    no_render: bool,

    /// Keep URLs that contain an exclusion keyword
    #[arg(long)]
    no_exclusions: bool,

    /// Use the HTTP client's and browser's own user agents
    #[arg(long)]
    default_user_agent: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate input and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.format).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_trawler=info,warn"),
            1 => EnvFilter::new("product_trawler=debug,info"),
            2 => EnvFilter::new("product_trawler=trace,debug"),
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

/// Loads the optional config file and layers command-line flags on top
fn build_config(cli: &Cli) -> Result<Config, TrawlerError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    config.seeds.extend(cli.seeds.iter().cloned());

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if cli.no_render {
        config.crawler.render = false;
    }
    if cli.no_exclusions {
        config.classifier.exclusions_enabled = false;
    }
    if cli.default_user_agent {
        config.user_agent.enabled = false;
    }

    validate(&config)?;

    if config.seeds.is_empty() {
        return Err(TrawlerError::NoSeeds);
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Product-Trawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    println!(
        "  Rendered phase: {}",
        if config.crawler.render { "enabled" } else { "disabled" }
    );

    if config.crawler.render {
        println!("\nRendering:");
        println!("  Headless: {}", config.render.headless);
        println!("  Navigation timeout: {}ms", config.render.navigation_timeout);
        println!(
            "  Ready when <= {} requests in flight for {}ms",
            config.render.max_inflight_requests, config.render.idle_window
        );
        println!("  Settle interval: {}ms", config.render.settle_interval);
        println!("  Max scroll iterations: {}", config.render.max_scroll_iterations);
    }

    println!("\nUser Agent:");
    match config.user_agent.custom() {
        Some(ua) => println!("  {}", ua),
        None => println!("  (client default)"),
    }

    println!("\nClassifier:");
    println!("  Patterns: {}", config.classifier.patterns.join(", "));
    if config.classifier.exclusions_enabled {
        println!("  Exclusions: {}", config.classifier.exclusions.join(", "));
    } else {
        println!("  Exclusions: disabled");
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    format: ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Total seed URLs: {}", config.seeds.len());

    let result = match crawl(config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    log_statistics(&CrawlStatistics::from_result(&result));
    println!("{}", render_report(&result, format)?);

    Ok(())
}
