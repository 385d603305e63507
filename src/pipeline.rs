//! The collection run.
//!
//! Stages run strictly in sequence and hand their output forward by value:
//!
//! ```text
//! resolve_latest_link → extract_article_id → scrape_batch → normalize_batch
//! ```
//!
//! Any stage error ends the run with no records.

use crate::config::CollectorConfig;
use crate::error::Result;
use crate::fetch::{FetchPage, HttpFetcher};
use crate::models::NormalizedRecord;
use crate::normalize::normalize_batch;
use crate::scrapers::kbs::{extract_article_id, resolve_latest_link, scrape_batch};
use std::time::Instant;
use tracing::{info, instrument};

/// Run all four stages once against `fetcher`.
#[instrument(level = "info", skip_all, fields(article_count = config.article_count))]
pub async fn run_pipeline<F: FetchPage>(fetcher: &F, config: &CollectorConfig) -> Result<Vec<NormalizedRecord>> {
    let t0 = Instant::now();

    let link = resolve_latest_link(fetcher, config).await?;
    let latest = extract_article_id(&link)?;
    info!(latest, "Latest article id");

    let batch = scrape_batch(fetcher, config, latest, config.article_count).await?;
    let records = normalize_batch(&batch)?;

    info!(
        count = records.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Collection run complete"
    );
    Ok(records)
}

/// Run once over HTTP.
pub async fn run_once(config: &CollectorConfig) -> Result<Vec<NormalizedRecord>> {
    let fetcher = HttpFetcher::new(config)?;
    run_pipeline(&fetcher, config).await
}
