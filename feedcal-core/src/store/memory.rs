//! In-process store.

use std::sync::{Mutex, MutexGuard};

use super::{EventStore, UpsertOutcome};
use crate::error::{FeedError, FeedResult};
use crate::event::{DecodedEvent, EventRecord, EventSource};

/// Keeps records in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<EventRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> FeedResult<MutexGuard<'_, Vec<EventRecord>>> {
        self.records
            .lock()
            .map_err(|_| FeedError::Store("Memory store lock poisoned".into()))
    }
}

impl EventStore for MemoryStore {
    fn find_by_uid(&self, uid: &str) -> FeedResult<Option<EventRecord>> {
        Ok(super::find(&self.records()?, uid))
    }

    fn insert(&self, record: EventRecord) -> FeedResult<()> {
        let mut records = self.records()?;
        super::insert(&mut records, record)
    }

    fn update(&self, uid: &str, event: &DecodedEvent) -> FeedResult<bool> {
        Ok(super::update(&mut self.records()?, uid, event))
    }

    fn list_active(&self) -> FeedResult<Vec<EventRecord>> {
        Ok(super::list_active(&self.records()?))
    }

    fn mark_deleted(&self, uid: &str) -> FeedResult<bool> {
        Ok(super::mark_deleted(&mut self.records()?, uid))
    }

    fn upsert(&self, event: &DecodedEvent, source: EventSource) -> FeedResult<UpsertOutcome> {
        let mut records = self.records()?;
        Ok(super::upsert(&mut records, event, source))
    }
}
