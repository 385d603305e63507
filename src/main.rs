//! # KBS Article Collector
//!
//! Collects the newest articles from the KBS news portal, cleans their text
//! and emits one structured record per article as JSON.
//!
//! ## Usage
//!
//! ```sh
//! kbs_article_collector --count 5 --output ./out/articles.json
//! kbs_article_collector --config collector.yaml --schedule
//! ```
//!
//! ## Architecture
//!
//! A run is four sequential stages:
//! 1. **Link discovery**: newest article link from the listing page
//! 2. **Id extraction**: numeric article id from that link
//! 3. **Batch scraping**: title, body and timestamp for `N` ids counting down
//! 4. **Normalization**: strip photo credits, control characters and punctuation
//!
//! In `--schedule` mode the same run fires once a day at the configured time.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod schedule;
mod scrapers;
mod utils;

use cli::Cli;
use config::CollectorConfig;
use outputs::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("kbs_article_collector starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = CollectorConfig::load(args.config.as_deref())
        .await?
        .merge_cli(&args)?;
    info!(
        listing_url = %config.listing_url,
        article_count = config.article_count,
        request_delay_ms = config.request_delay_ms,
        "Configuration ready"
    );

    let output = args.output.as_deref().map(Path::new);

    if args.schedule {
        schedule::run_daily(&config.schedule, || collect(&config, output)).await?;
    } else if let Err(e) = collect(&config, output).await {
        error!(error = %e, "Collection run failed");
        return Err(e.into());
    }

    Ok(())
}

/// One run plus emission of its records.
#[instrument(level = "info", skip_all)]
async fn collect(config: &CollectorConfig, output: Option<&Path>) -> error::Result<()> {
    let records = pipeline::run_once(config).await?;

    match output {
        Some(path) => json::write_records(&records, path).await?,
        None => json::print_records(&records)?,
    }

    info!(count = records.len(), "Records emitted");
    Ok(())
}
