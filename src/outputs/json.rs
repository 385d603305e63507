//! JSON emission of a run's records.
//!
//! Records are written as a pretty-printed JSON array, either to stdout or
//! to a file. This is the hand-off to whatever consumes the run; nothing is
//! read back.

use crate::error::Result;
use crate::models::NormalizedRecord;
use crate::utils::ensure_writable_dir;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub fn records_to_json(records: &[NormalizedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records to `path`, creating its parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_records(records: &[NormalizedRecord], path: &Path) -> Result<()> {
    let json = records_to_json(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_writable_dir(parent).await?;
    }

    fs::write(path, json).await?;
    info!(count = records.len(), "Wrote records JSON");
    Ok(())
}

/// Print records to stdout.
pub fn print_records(records: &[NormalizedRecord]) -> Result<()> {
    let json = records_to_json(records)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
