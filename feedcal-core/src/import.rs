//! Upserting decoded events into a store.

use serde::Serialize;
use tracing::info;

use crate::error::FeedResult;
use crate::event::{DecodedEvent, EventSource};
use crate::store::{EventStore, UpsertOutcome};

/// Counts from one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
}

/// Upsert every event (in order) with source IMPORT.
///
/// Stops at the first store error; events before it stay applied.
pub fn import_events<S>(store: &S, events: &[DecodedEvent]) -> FeedResult<ImportSummary>
where
    S: EventStore + ?Sized,
{
    let mut summary = ImportSummary::default();

    for event in events {
        match store.upsert(event, EventSource::Import)? {
            UpsertOutcome::Inserted => summary.added += 1,
            UpsertOutcome::Updated => summary.updated += 1,
        }
    }

    info!(
        added = summary.added,
        updated = summary.updated,
        "Imported events"
    );
    Ok(summary)
}
