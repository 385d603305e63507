//! Text normalization for scraped articles.
//!
//! Article bodies go through three substitutions, in this order:
//!
//! 1. [`PHOTO_CREDIT`] lines are removed
//! 2. [`CONTROL_CHARS`] runs become one space
//! 3. every [`PUNCTUATION`] character becomes one space
//!
//! The photo-credit pattern is anchored on newlines, so it has to run before
//! control characters are collapsed.

use crate::error::{PipelineError, Result};
use crate::models::{NormalizedRecord, RawArticleBatch};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

/// Photo credit line, e.g. `\nPhoto : KBS News\n  `.
pub const PHOTO_CREDIT: &str = r"\n*\s*Photo.*\n\s*";
/// Carriage return, newline, no-break space, zero-width space, tab.
pub const CONTROL_CHARS: &str = r"[\r\n\u{a0}\u{200b}\t]+";
pub const PUNCTUATION: &str = r"[^\w\s]";
/// `YYYY.MM.DD`, with any single separator character.
pub const DATE_TOKEN: &str = r"\w{4}.\w{2}.\w{2}";

static PHOTO_CREDIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PHOTO_CREDIT).expect("photo credit pattern"));
static CONTROL_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(CONTROL_CHARS).expect("control char pattern"));
static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PUNCTUATION).expect("punctuation pattern"));
static DATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(DATE_TOKEN).expect("date token pattern"));

/// Apply the three content substitutions.
pub fn clean_content(content: &str) -> String {
    let content = PHOTO_CREDIT_RE.replace_all(content, "");
    let content = CONTROL_CHARS_RE.replace_all(&content, " ");
    PUNCTUATION_RE.replace_all(&content, " ").into_owned()
}

/// First date token in a raw timestamp.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_date("2023.06.01 09:00")?, "2023.06.01");
/// ```
pub fn extract_date(raw: &str) -> Result<String> {
    DATE_TOKEN_RE
        .find(raw)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PipelineError::TimestampFormatMismatch { raw: raw.to_string() })
}

/// Turn a scraped batch into records, one per row, preserving order.
///
/// Titles are carried over unchanged. A timestamp without a date token fails
/// the whole batch.
#[instrument(level = "info", skip_all, fields(count = batch.len()))]
pub fn normalize_batch(batch: &RawArticleBatch) -> Result<Vec<NormalizedRecord>> {
    let mut records = Vec::with_capacity(batch.len());

    for (title, content, time, article_num) in batch.rows() {
        let record = NormalizedRecord {
            article_index: article_num,
            write_time: extract_date(time)?,
            title: title.to_string(),
            content: clean_content(content),
        };
        info!(
            article_index = record.article_index,
            write_time = %record.write_time,
            title = %record.title,
            content = %truncate_for_log(&record.content, 200),
            "Normalized article"
        );
        records.push(record);
    }

    Ok(records)
}
