//! Record storage.
//!
//! Stores keep `EventRecord`s keyed by `uid`. An `upsert` is applied at most
//! once: each implementation holds its lock across the lookup and the write.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{FeedError, FeedResult};
use crate::event::{DecodedEvent, EventRecord, EventSource, EventStatus};

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

pub trait EventStore: Send + Sync {
    fn find_by_uid(&self, uid: &str) -> FeedResult<Option<EventRecord>>;

    /// Add a new record. Fails if its uid is already stored.
    fn insert(&self, record: EventRecord) -> FeedResult<()>;

    /// Overwrite the decoded fields of the record with this uid.
    /// Returns false when there is no such record.
    fn update(&self, uid: &str, event: &DecodedEvent) -> FeedResult<bool>;

    /// Every ACTIVE record, in insertion order.
    fn list_active(&self) -> FeedResult<Vec<EventRecord>>;

    /// Take a record out of the feed. Returns false when there is no such record.
    fn mark_deleted(&self, uid: &str) -> FeedResult<bool>;

    /// Update the record with `event.uid`, or insert a new one.
    fn upsert(&self, event: &DecodedEvent, source: EventSource) -> FeedResult<UpsertOutcome> {
        if self.update(&event.uid, event)? {
            return Ok(UpsertOutcome::Updated);
        }
        self.insert(EventRecord::new(event, source))?;
        Ok(UpsertOutcome::Inserted)
    }
}

// Shared record-list operations for the stores below.

fn find(records: &[EventRecord], uid: &str) -> Option<EventRecord> {
    records.iter().find(|r| r.uid == uid).cloned()
}

fn insert(records: &mut Vec<EventRecord>, record: EventRecord) -> FeedResult<()> {
    if records.iter().any(|r| r.uid == record.uid) {
        return Err(FeedError::Store(format!(
            "Event with uid '{}' already exists",
            record.uid
        )));
    }
    records.push(record);
    Ok(())
}

fn update(records: &mut [EventRecord], uid: &str, event: &DecodedEvent) -> bool {
    match records.iter_mut().find(|r| r.uid == uid) {
        Some(record) => {
            record.apply(event);
            true
        }
        None => false,
    }
}

fn upsert(records: &mut Vec<EventRecord>, event: &DecodedEvent, source: EventSource) -> UpsertOutcome {
    if update(records, &event.uid, event) {
        UpsertOutcome::Updated
    } else {
        records.push(EventRecord::new(event, source));
        UpsertOutcome::Inserted
    }
}

fn list_active(records: &[EventRecord]) -> Vec<EventRecord> {
    records.iter().filter(|r| r.is_active()).cloned().collect()
}

fn mark_deleted(records: &mut [EventRecord], uid: &str) -> bool {
    match records.iter_mut().find(|r| r.uid == uid) {
        Some(record) => {
            record.status = EventStatus::Deleted;
            true
        }
        None => false,
    }
}
