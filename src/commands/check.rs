use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(file: &Path) -> Result<()> {
    let decoded = super::decode_file(file)?;

    for event in &decoded.events {
        println!(
            "  {} {} {}",
            super::format_range(event.dtstart, event.dtend),
            event.summary,
            format!("[{}]", event.uid).dimmed()
        );
    }
    super::print_skipped(&decoded.skipped);

    println!(
        "{} events, {} skipped",
        decoded.events.len().bold(),
        decoded.skipped.len()
    );

    Ok(())
}
