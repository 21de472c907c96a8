//! Storescout main entry point
//!
//! Command-line interface for discovering product pages on storefront
//! sites: sitemap discovery first, dynamic rendered crawl as the fallback,
//! one output file per domain.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storescout::config::Config;
use storescout::crawler::crawl_site;
use storescout::output::write_product_urls;
use storescout::proxy::ProxyPool;
use storescout::render::ChromeEngine;
use storescout::sitemap;
use storescout::url::extract_domain;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Storescout: product-page discovery for e-commerce storefronts
///
/// Each given storefront URL is processed independently: the site's
/// sitemaps are tried first, and a rendered crawl takes over only when
/// they yield nothing.
#[derive(Parser, Debug)]
#[command(name = "storescout")]
#[command(version)]
#[command(about = "Discover product pages on e-commerce storefronts", long_about = None)]
struct Cli {
    /// Storefront root URLs to process
    #[arg(value_name = "URL", required = true)]
    seeds: Vec<String>,

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

    let config = Config::from_env();
    tracing::info!(
        "outer workers: {}, crawl workers: {}, target links: {}",
        config.outer_workers,
        config.crawl.workers,
        config.crawl.target_links
    );

    let start = Instant::now();
    process_seed_urls(cli.seeds, config).await?;
    tracing::info!("finished processing all links in {:?}", start.elapsed());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("storescout=info,warn"),
            1 => EnvFilter::new("storescout=debug,info"),
            2 => EnvFilter::new("storescout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Processes every seed URL through the outer worker pool
///
/// Seed jobs are fully independent of each other and of the inner crawl
/// concurrency; at most `outer_workers` run at once.
async fn process_seed_urls(seeds: Vec<String>, config: Config) -> anyhow::Result<()> {
    let client = sitemap::build_http_client(&config.user_agent)
        .context("could not build the HTTP client")?;
    let engine = Arc::new(ChromeEngine::new(Duration::from_secs(30)));
    let config = Arc::new(config);
    let permits = Arc::new(Semaphore::new(config.outer_workers));

    let mut jobs = JoinSet::new();
    for seed in seeds {
        let permit = permits.clone().acquire_owned().await?;
        let client = client.clone();
        let engine = engine.clone();
        let config = config.clone();

        jobs.spawn(async move {
            let _permit = permit;
            process_seed(&seed, &client, engine, &config).await;
        });
    }

    while let Some(joined) = jobs.join_next().await {
        if let Err(e) = joined {
            tracing::error!("seed task failed: {}", e);
        }
    }

    Ok(())
}

/// Processes one seed URL end to end
///
/// Failures never escalate past this seed; the only user-visible failure
/// mode is "no product links found", which is a normal outcome.
async fn process_seed(
    seed: &str,
    client: &reqwest::Client,
    engine: Arc<ChromeEngine>,
    config: &Config,
) {
    tracing::info!("processing link: {}", seed);

    let Some(domain) = extract_domain(seed) else {
        tracing::error!("skipping seed with no host: {}", seed);
        return;
    };

    // Cheap static path first
    let mut product_urls = match sitemap::discover_products(client, seed).await {
        Ok(urls) => urls,
        Err(e) => {
            tracing::info!("sitemap discovery unavailable for {}: {}", domain, e);
            Default::default()
        }
    };

    // Escalate to the dynamic crawl only when the sitemaps had nothing
    if product_urls.is_empty() {
        tracing::info!(
            "no product links found in sitemap for {}, attempting dynamic crawl",
            domain
        );

        let proxies = ProxyPool::fetch(client, config.proxy_source_url.as_deref()).await;
        match crawl_site(seed, engine, config.crawl.clone(), proxies).await {
            Ok(outcome) => product_urls = outcome.product_urls,
            Err(e) => {
                tracing::error!("dynamic crawl failed for {}: {}", domain, e);
                return;
            }
        }
    }

    if product_urls.is_empty() {
        tracing::info!("no product links found for {}", domain);
        return;
    }

    match write_product_urls(&config.output_dir, &domain, &product_urls) {
        Ok(path) => tracing::info!(
            "{} product links saved to {}",
            product_urls.len(),
            path.display()
        ),
        Err(e) => tracing::error!("error writing output for {}: {}", domain, e),
    }
}
