pub mod check;
pub mod config;
pub mod delete;
pub mod feed;
pub mod import;
pub mod list;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use feedcal_core::ics::{Decoded, SkippedBlock, decode};
use owo_colors::OwoColorize;

/// Read and decode an .ics file.
fn decode_file(path: &Path) -> Result<Decoded> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    decode(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_skipped(skipped: &[SkippedBlock]) {
    for block in skipped {
        println!("{} Skipped {}", "!".yellow(), block);
    }
}

/// Format a start/end pair of Unix seconds (e.g. "2024-01-15 09:00 → 10:30 UTC")
fn format_range(start: i64, end: i64) -> String {
    let (Some(start), Some(end)) = (DateTime::from_timestamp(start, 0), DateTime::from_timestamp(end, 0))
    else {
        return "invalid time".to_string();
    };

    if start.date_naive() == end.date_naive() {
        format!("{} → {} UTC", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} → {} UTC",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        )
    }
}
