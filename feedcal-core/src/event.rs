//! Event types.
//!
//! `DecodedEvent` is what the ICS decoder produces: only the fields that live
//! in the calendar text. `EventRecord` is what a store keeps: the decoded
//! fields plus a storage id, where the record came from, and whether it is
//! still published.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary used when an event block has no (or an empty) SUMMARY.
pub const DEFAULT_SUMMARY: &str = "No Title";

/// An event as read from calendar text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub uid: String,
    pub summary: String,
    /// Empty when the block had no LOCATION
    pub location: String,
    /// Empty when the block had no DESCRIPTION
    pub description: String,
    /// Unix seconds, UTC
    pub dtstart: i64,
    /// Unix seconds, UTC
    pub dtend: i64,
    /// Unix seconds, UTC
    pub dtstamp: i64,
}

/// How a record entered the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSource {
    Import,
    Manual,
}

/// Whether a record is still part of the published feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Active,
    Deleted,
}

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Storage identifier, assigned once on insert
    pub id: String,
    /// Identity across re-imports
    pub uid: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub dtstart: i64,
    pub dtend: i64,
    pub dtstamp: i64,
    pub source: EventSource,
    #[serde(default)]
    pub status: EventStatus,
}

impl EventRecord {
    /// Create a new active record from decoded fields, with a fresh storage id.
    pub fn new(event: &DecodedEvent, source: EventSource) -> Self {
        EventRecord {
            id: Uuid::new_v4().to_string(),
            uid: event.uid.clone(),
            summary: event.summary.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            dtstart: event.dtstart,
            dtend: event.dtend,
            dtstamp: event.dtstamp,
            source,
            status: EventStatus::Active,
        }
    }

    /// Overwrite the fields that a re-import is allowed to change.
    ///
    /// `id`, `uid`, `source` and `status` are left alone.
    pub fn apply(&mut self, event: &DecodedEvent) {
        self.summary = event.summary.clone();
        self.location = event.location.clone();
        self.description = event.description.clone();
        self.dtstart = event.dtstart;
        self.dtend = event.dtend;
        self.dtstamp = event.dtstamp;
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }
}

/// Current time as Unix seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(uid: &str) -> DecodedEvent {
        DecodedEvent {
            uid: uid.to_string(),
            summary: "Lecture".to_string(),
            location: "Room 101".to_string(),
            description: String::new(),
            dtstart: 1_705_280_400,
            dtend: 1_705_284_000,
            dtstamp: 1_705_000_000,
        }
    }

    #[test]
    fn test_apply_keeps_identity_and_status() {
        let mut record = EventRecord::new(&decoded("a@feedcal"), EventSource::Import);
        record.status = EventStatus::Deleted;
        let id = record.id.clone();

        let mut changed = decoded("a@feedcal");
        changed.summary = "Moved lecture".to_string();
        changed.dtstart += 3600;
        record.apply(&changed);

        assert_eq!(record.id, id);
        assert_eq!(record.summary, "Moved lecture");
        assert_eq!(record.dtstart, 1_705_284_000);
        assert_eq!(record.status, EventStatus::Deleted);
        assert_eq!(record.source, EventSource::Import);
    }

    #[test]
    fn test_record_serializes_enums_upper_case() {
        let record = EventRecord::new(&decoded("a@feedcal"), EventSource::Import);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["source"], "IMPORT");
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = EventRecord::new(&decoded("a@feedcal"), EventSource::Manual);
        let b = EventRecord::new(&decoded("a@feedcal"), EventSource::Manual);
        assert_ne!(a.id, b.id);
        assert!(a.is_active());
    }
}
