//! Polite Crawler main entry point
//!
//! This is the command-line interface for the breadth-first site crawler.

use clap::Parser;
use polite_crawler::config::{load_config_with_hash, Config};
use polite_crawler::{Crawler, Page};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Polite Crawler: a breadth-first, robots-aware site crawler
///
/// Crawls a single site starting from its main domain, respecting
/// robots.txt and a fixed delay between requests, and prints one line per
/// fetched page.
#[derive(Parser, Debug)]
#[command(name = "polite-crawler")]
#[command(version)]
#[command(about = "A polite breadth-first site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Stop after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.max_pages);
        return Ok(());
    }

    handle_crawl(config, cli.max_pages).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("polite_crawler=info,warn"),
            1 => EnvFilter::new("polite_crawler=debug,info"),
            2 => EnvFilter::new("polite_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, max_pages: Option<usize>) {
    println!("=== Polite Crawler Dry Run ===\n");

    println!("Crawl:");
    println!("  Name: {}", config.crawl.name);
    println!("  Domain: {}", config.crawl.domain);
    println!(
        "  Delay: {:?}",
        polite_crawler::crawler::clamp_delay(config.crawl.delay_seconds)
    );
    println!("  Timeout: {}s", config.crawl.timeout_seconds);
    println!("  Follow external links: {}", config.crawl.follow_external);
    match max_pages {
        Some(n) => println!("  Page limit: {}", n),
        None => println!("  Page limit: none"),
    }

    println!("\nLink collector:");
    match &config.collector.selector {
        Some(selector) => println!("  Regions: {}", selector),
        None => println!("  Regions: whole page"),
    }
    println!("  Skip images: {}", config.collector.skip_images);
    println!("  Skip query links: {}", config.collector.skip_query_links);
    println!("  Skip wiki noise: {}", config.collector.skip_wiki_noise);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    max_pages: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut crawler = match Crawler::new(&config).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to start crawl: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Robots policy: {} disallowed prefixes",
        crawler.robots().len()
    );

    // Ctrl-C stops the crawl between (or during) fetches
    let cancel = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    let start_time = std::time::Instant::now();
    let mut print_page = |page: Page| {
        let title = page.title().unwrap_or_default();
        println!("{}\t{}", page.url(), title);
    };
    let delivered = crawler.run(&mut print_page, max_pages).await;

    tracing::info!(
        "Crawl {}: {} pages in {:?} ({} URLs scheduled, state {})",
        crawler.name(),
        delivered,
        start_time.elapsed(),
        crawler.visited_len(),
        crawler.state()
    );

    Ok(())
}
