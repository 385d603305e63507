//! News portal scrapers.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | KBS News | [`kbs`] | Listing page link + sequential article ids |
//!
//! The scraper module exports:
//! - `resolve_latest_link()`: newest article link from the listing page
//! - `extract_article_id(link)`: numeric id from that link
//! - `scrape_batch(latest, n)`: `n` articles counting down from `latest`
//!
//! Requests are sequential with a fixed pause between them, and any failure
//! ends the run.

pub mod kbs;
