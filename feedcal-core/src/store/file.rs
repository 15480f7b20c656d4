//! JSON file store.
//!
//! All records live in `<dir>/events.json`. Every operation takes a lock on
//! `<dir>/.lock` (shared for reads, exclusive for writes), so separate
//! processes and threads sharing a directory see whole upserts only.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use super::{EventStore, UpsertOutcome};
use crate::error::FeedResult;
use crate::event::{DecodedEvent, EventRecord, EventSource};

const EVENTS_FILE: &str = "events.json";
const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> FeedResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn events_path(&self) -> PathBuf {
        self.dir.join(EVENTS_FILE)
    }

    /// The returned file holds the lock until dropped.
    fn lock(&self, exclusive: bool) -> FeedResult<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;

        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(file)
    }

    fn read(&self) -> FeedResult<Vec<EventRecord>> {
        match fs::read_to_string(self.events_path()) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file so readers never see a half-written list.
    fn write(&self, records: &[EventRecord]) -> FeedResult<()> {
        let tmp = self.dir.join(format!("{}.tmp", EVENTS_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&tmp, self.events_path())?;
        debug!(records = records.len(), path = %self.events_path().display(), "Wrote event store");
        Ok(())
    }

    fn with_records<T>(&self, f: impl FnOnce(&[EventRecord]) -> T) -> FeedResult<T> {
        let _lock = self.lock(false)?;
        Ok(f(&self.read()?))
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Vec<EventRecord>) -> FeedResult<T>) -> FeedResult<T> {
        let _lock = self.lock(true)?;
        let mut records = self.read()?;
        let out = f(&mut records)?;
        self.write(&records)?;
        Ok(out)
    }
}

impl EventStore for FileStore {
    fn find_by_uid(&self, uid: &str) -> FeedResult<Option<EventRecord>> {
        self.with_records(|records| super::find(records, uid))
    }

    fn insert(&self, record: EventRecord) -> FeedResult<()> {
        self.modify(|records| super::insert(records, record))
    }

    fn update(&self, uid: &str, event: &DecodedEvent) -> FeedResult<bool> {
        self.modify(|records| Ok(super::update(records, uid, event)))
    }

    fn list_active(&self) -> FeedResult<Vec<EventRecord>> {
        self.with_records(super::list_active)
    }

    fn mark_deleted(&self, uid: &str) -> FeedResult<bool> {
        self.modify(|records| Ok(super::mark_deleted(records, uid)))
    }

    fn upsert(&self, event: &DecodedEvent, source: EventSource) -> FeedResult<UpsertOutcome> {
        self.modify(|records| Ok(super::upsert(records, event, source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::event::EventStatus;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn decoded(uid: &str, summary: &str) -> DecodedEvent {
        DecodedEvent {
            uid: uid.to_string(),
            summary: summary.to_string(),
            location: "Room 1".to_string(),
            description: String::new(),
            dtstart: 1_705_309_200,
            dtend: 1_705_312_800,
            dtstamp: 1_705_000_000,
        }
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested/data")).unwrap();

        assert!(store.list_active().unwrap().is_empty());
        assert!(store.find_by_uid("a").unwrap().is_none());
        assert!(store.dir().exists());
    }

    #[test]
    fn test_records_persist_across_instances() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.upsert(&decoded("a", "Lecture"), EventSource::Import).unwrap();
            store.upsert(&decoded("b", "Lab"), EventSource::Manual).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let records = store.list_active().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].uid, "a");
        assert_eq!(records[1].source, EventSource::Manual);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.upsert(&decoded("a", "Lecture"), EventSource::Import).unwrap();
        let id = store.find_by_uid("a").unwrap().unwrap().id;

        let outcome = store.upsert(&decoded("a", "Lecture v2"), EventSource::Import).unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated);
        let record = store.find_by_uid("a").unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.summary, "Lecture v2");
        assert_eq!(store.list_active().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_duplicate_fails_and_leaves_file_intact() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let record = EventRecord::new(&decoded("a", "Lecture"), EventSource::Import);

        store.insert(record.clone()).unwrap();
        assert!(matches!(store.insert(record), Err(FeedError::Store(_))));
        assert_eq!(store.list_active().unwrap().len(), 1);
    }

    #[test]
    fn test_mark_deleted_persists() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.upsert(&decoded("a", "Lecture"), EventSource::Import).unwrap();

        assert!(store.mark_deleted("a").unwrap());

        let reopened = FileStore::open(dir.path()).unwrap();
        assert!(reopened.list_active().unwrap().is_empty());
        assert_eq!(
            reopened.find_by_uid("a").unwrap().map(|r| r.status),
            Some(EventStatus::Deleted)
        );
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(EVENTS_FILE), "not json").unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(store.list_active(), Err(FeedError::Serialization(_))));
    }

    #[test]
    fn test_concurrent_upserts_from_threads() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..5 {
                        store
                            .upsert(&decoded(&format!("t{}-{}", i, n), "x"), EventSource::Import)
                            .unwrap();
                        store.upsert(&decoded("shared", "y"), EventSource::Import).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list_active().unwrap().len(), 21);
    }
}
