//! KBS news scraper.
//!
//! Three stages of the collection run live here:
//!
//! 1. [`resolve_latest_link`]: read the newest article link off the listing page
//! 2. [`extract_article_id`]: pull the numeric article id out of that link
//! 3. [`scrape_batch`]: walk ids downward from the newest and scrape each page
//!
//! # Markup
//!
//! Field extraction depends on the portal's markup. Each selector is a named
//! constant below, so a layout change touches one line per field.

use crate::config::{CollectorConfig, parse_url};
use crate::error::{PipelineError, Result};
use crate::fetch::FetchPage;
use crate::models::{ArticleId, RawArticle, RawArticleBatch};
use futures::stream::{self, StreamExt, TryStreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Anchor of the first (newest) article on the listing page.
pub const LATEST_ARTICLE_ANCHOR: &str =
    "#container > div > section.comp_contents_1x > article:nth-child(1) > h2 > a";
/// Article headline.
pub const TITLE: &str = "h5.tit-s";
/// Article body.
pub const BODY: &str = "div.detail-body.font-size";
/// Publication timestamp, e.g. `입력 2023.06.01 (09:00)`.
pub const TIMESTAMP: &str = "em.date";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit pattern"));

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PipelineError::Config(format!("invalid selector `{css}`: {e}")))
}

/// Fetch the listing page and return the newest article's relative link.
///
/// The anchor's `href` carries a leading `.` marker (`./news_view.htm?...`);
/// the first character is stripped before returning.
///
/// # Errors
///
/// - [`PipelineError::Network`] if the listing request fails
/// - [`PipelineError::SelectorMiss`] if the anchor or its `href` is missing
#[instrument(level = "info", skip_all, fields(url = %config.listing_url))]
pub async fn resolve_latest_link<F: FetchPage>(fetcher: &F, config: &CollectorConfig) -> Result<String> {
    let html = fetcher.fetch(&config.listing_url).await?;
    let href = latest_anchor_href(&html, &config.listing_url)?;
    let link = strip_marker(&href);

    let absolute = parse_url(&config.listing_url)
        .ok()
        .and_then(|base| base.join(&href).ok())
        .map(|u| u.to_string())
        .unwrap_or_default();
    info!(%link, %absolute, "Resolved latest article link");

    Ok(link)
}

/// `href` of the first element matching [`LATEST_ARTICLE_ANCHOR`].
pub fn latest_anchor_href(html: &str, url: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let anchor = selector(LATEST_ARTICLE_ANCHOR)?;

    document
        .select(&anchor)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| PipelineError::SelectorMiss {
            selector: LATEST_ARTICLE_ANCHOR,
            url: url.to_string(),
        })
}

fn strip_marker(href: &str) -> String {
    let mut chars = href.chars();
    chars.next();
    chars.as_str().to_string()
}

/// First run of ASCII digits in `link`, as an article id.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_article_id("news/view.do?ncd=7701599")?, 7701599);
/// ```
pub fn extract_article_id(link: &str) -> Result<ArticleId> {
    let id = DIGIT_RUN
        .find(link)
        .and_then(|m| m.as_str().parse::<ArticleId>().ok())
        .ok_or_else(|| PipelineError::NoDigitsFound {
            link: link.to_string(),
        })?;
    debug!(%link, id, "Extracted article id");
    Ok(id)
}

/// Scrape `count` articles starting at `latest` and counting down.
///
/// Requests run one at a time with the configured pause after each. The
/// first failure abandons the batch; rows are never skipped, so row `i`
/// always holds article `latest - i`.
///
/// A `count` that would reach ids below 1 is rejected before any request.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn scrape_batch<F: FetchPage>(
    fetcher: &F,
    config: &CollectorConfig,
    latest: ArticleId,
    count: usize,
) -> Result<RawArticleBatch> {
    let delay = config.request_delay();
    if count as u64 > latest {
        return Err(PipelineError::InvalidArticleId { latest, offset: latest });
    }

    let batch: RawArticleBatch = stream::iter(0..count as u64)
        .then(|offset| async move {
            let id = latest - offset;
            let url = config.article_url_for(id);
            let html = fetcher.fetch(&url).await?;
            let article = parse_article(&html, &url, id)?;
            debug!(id, title = %article.title, "Scraped article");

            sleep(delay).await;
            Ok::<_, PipelineError>(article)
        })
        .try_collect()
        .await?;

    if batch.is_empty() {
        info!(latest, "Scraped empty article batch");
    } else {
        info!(
            count = batch.len(),
            newest = batch.article_nums().first().copied().unwrap_or(latest),
            oldest = batch.article_nums().last().copied().unwrap_or(latest),
            "Scraped article batch"
        );
    }
    Ok(batch)
}

/// Extract title, body and timestamp text from an article page.
pub fn parse_article(html: &str, url: &str, id: ArticleId) -> Result<RawArticle> {
    let document = Html::parse_document(html);
    Ok(RawArticle {
        title: first_text(&document, TITLE, url)?,
        content: first_text(&document, BODY, url)?,
        time: first_text(&document, TIMESTAMP, url)?,
        article_num: id,
    })
}

fn first_text(document: &Html, css: &'static str, url: &str) -> Result<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| PipelineError::SelectorMiss {
            selector: css,
            url: url.to_string(),
        })
}
