//! Command-line interface definitions for the KBS article collector.
//!
//! Flags override values loaded from the YAML configuration file.

use clap::Parser;

/// Command-line arguments for the collector.
///
/// # Examples
///
/// ```sh
/// # One run with defaults, records printed as JSON on stdout
/// kbs_article_collector
///
/// # Ten articles, written to a file
/// kbs_article_collector --count 10 --output ./out/articles.json
///
/// # Stay resident and collect once a day at the configured time
/// kbs_article_collector --config collector.yaml --schedule
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "KBS_COLLECTOR_CONFIG")]
    pub config: Option<String>,

    /// Number of articles to collect, counting down from the newest
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Pause after each article request, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write records to this JSON file instead of stdout
    #[arg(short, long, env = "KBS_COLLECTOR_OUTPUT")]
    pub output: Option<String>,

    /// Run on the configured daily schedule instead of once
    #[arg(long)]
    pub schedule: bool,
}
