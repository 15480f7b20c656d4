use anyhow::Result;
use feedcal_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &impl EventStore) -> Result<()> {
    let mut records = store.list_active()?;

    if records.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    records.sort_by_key(|r| r.dtstart);

    for record in &records {
        let location = if record.location.is_empty() {
            String::new()
        } else {
            format!(" @ {}", record.location)
        };
        println!(
            "  {} {}{} {}",
            super::format_range(record.dtstart, record.dtend),
            record.summary,
            location,
            format!("[{}]", record.uid).dimmed()
        );
    }

    Ok(())
}
