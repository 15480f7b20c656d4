use anyhow::Result;
use feedcal_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &impl EventStore, uid: &str) -> Result<()> {
    if !store.mark_deleted(uid)? {
        anyhow::bail!("No event with UID '{}'", uid);
    }

    println!("{} Removed {} from the feed", "✓".green(), uid);
    Ok(())
}
