use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use feedcal_core::ics::encode;
use feedcal_core::store::EventStore;

pub fn run(store: &impl EventStore, output: Option<&Path>) -> Result<()> {
    let ics = encode(&store.list_active()?);

    match output {
        Some(path) => std::fs::write(path, ics)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(ics.as_bytes())?,
    }

    Ok(())
}
