use std::path::Path;

use anyhow::Result;
use feedcal_core::import::import_events;
use feedcal_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &impl EventStore, file: &Path) -> Result<()> {
    let decoded = super::decode_file(file)?;
    super::print_skipped(&decoded.skipped);

    if decoded.events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let summary = import_events(store, &decoded.events)?;

    println!(
        "{} {} added, {} updated",
        "✓".green(),
        summary.added,
        summary.updated
    );

    Ok(())
}
