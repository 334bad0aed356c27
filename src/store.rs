use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::{error::StoreError, storage::StorageBackend};

/// A record owned by one collection. Ids are assigned by the store,
/// sequentially and collection-relative, and never change afterwards.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const STORE: &'static str;
    const ENTITY: &'static str;

    fn id(&self) -> u32;
    fn assign_id(&mut self, id: u32);
    fn stamp(&mut self, at: DateTime<Utc>);
    fn touch(&mut self, at: DateTime<Utc>);
    fn occurred_at(&self) -> DateTime<Utc>;

    fn kind_label(&self) -> Option<&'static str> {
        None
    }
    fn status_label(&self) -> Option<&'static str> {
        None
    }
    fn department(&self) -> Option<&str> {
        None
    }
    fn location(&self) -> Option<&str> {
        None
    }
    fn unit(&self) -> Option<&str> {
        None
    }
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// In-memory collection plus its persistence side effect. Every mutation
/// rebuilds the collection as a whole (mapped or filtered copy) and then
/// writes the full array to the backend under `R::STORE`. A failed write is
/// logged and the in-memory state stands; there is no rollback.
pub struct Store<R: Record> {
    backend: Arc<dyn StorageBackend>,
    records: Vec<R>,
    next_id: u32,
}

impl<R: Record> Store<R> {
    pub fn open(backend: Arc<dyn StorageBackend>) -> Result<Store<R>, StoreError> {
        let records: Vec<R> = match backend.load(R::STORE)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let next_id = records.iter().map(Record::id).max().map_or(1, |max| max + 1);

        Ok(Store {
            backend,
            records,
            next_id,
        })
    }

    pub fn add(&mut self, mut record: R) -> R {
        record.assign_id(self.next_id);
        self.next_id += 1;
        record.stamp(Utc::now());

        self.records.push(record.clone());
        self.persist();
        record
    }

    pub fn update(&mut self, mut record: R) -> Result<R, StoreError> {
        if !self.records.iter().any(|existing| existing.id() == record.id()) {
            return Err(StoreError::not_found(R::ENTITY, record.id()));
        }
        record.touch(Utc::now());

        self.records = self
            .records
            .iter()
            .map(|existing| {
                if existing.id() == record.id() {
                    record.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        self.persist();
        Ok(record)
    }

    pub fn delete(&mut self, id: u32) -> Result<(), StoreError> {
        let remaining: Vec<R> = self
            .records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        if remaining.len() == self.records.len() {
            return Err(StoreError::not_found(R::ENTITY, id));
        }

        self.records = remaining;
        self.persist();
        Ok(())
    }

    pub fn get(&self, id: u32) -> Result<&R, StoreError> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or(StoreError::NotFound { entity: R::ENTITY, id })
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_kind(&self, kind: &str) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| record.kind_label() == Some(kind))
            .collect()
    }

    pub fn by_department(&self, department: &str) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| {
                record
                    .department()
                    .is_some_and(|name| name.eq_ignore_ascii_case(department))
            })
            .collect()
    }

    /// Inclusive on both bounds.
    pub fn by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| record.occurred_at() >= start && record.occurred_at() <= end)
            .collect()
    }

    /// Applies `apply` to a copy of every record; records for which it returns
    /// true are touched and the collection is persisted once. Returns the
    /// number of changed records.
    pub fn modify_all(&mut self, mut apply: impl FnMut(&mut R) -> bool) -> usize {
        let now = Utc::now();
        let mut changed = 0;

        let records: Vec<R> = self
            .records
            .iter()
            .map(|existing| {
                let mut record = existing.clone();
                if apply(&mut record) {
                    record.touch(now);
                    changed += 1;
                    record
                } else {
                    existing.clone()
                }
            })
            .collect();

        if changed > 0 {
            self.records = records;
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.records) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(store = R::STORE, %error, "failed to serialize collection");
                return;
            }
        };
        if let Err(error) = self.backend.persist(R::STORE, &payload) {
            warn!(store = R::STORE, %error, "failed to persist collection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use serde::Deserialize;

    #[derive(Clone, Debug, Deserialize, Serialize)]
    struct Note {
        id: u32,
        body: String,
        department: String,
        written_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl Record for Note {
        const STORE: &'static str = "notes-storage";
        const ENTITY: &'static str = "NOTE";

        fn id(&self) -> u32 {
            self.id
        }
        fn assign_id(&mut self, id: u32) {
            self.id = id;
        }
        fn stamp(&mut self, at: DateTime<Utc>) {
            self.created_at = at;
            self.updated_at = at;
        }
        fn touch(&mut self, at: DateTime<Utc>) {
            self.updated_at = at;
        }
        fn occurred_at(&self) -> DateTime<Utc> {
            self.written_at
        }
        fn department(&self) -> Option<&str> {
            Some(&self.department)
        }
        fn search_fields(&self) -> Vec<&str> {
            vec![&self.body]
        }
    }

    fn note(body: &str, department: &str, written_at: &str) -> Note {
        let written_at = written_at.parse().unwrap();
        Note {
            id: 0,
            body: body.to_string(),
            department: department.to_string(),
            written_at,
            created_at: written_at,
            updated_at: written_at,
        }
    }

    fn store() -> Store<Note> {
        Store::open(Arc::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut notes = store();
        let first = notes.add(note("باب المستودع مفتوح", "security", "2026-08-01T06:00:00Z"));
        let second = notes.add(note("fence check", "security", "2026-08-01T07:00:00Z"));
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn get_round_trips_added_record() {
        let mut notes = store();
        let added = notes.add(note("patrol done", "operations", "2026-08-02T10:00:00Z"));
        let fetched = notes.get(added.id).unwrap();
        assert_eq!(fetched.body, "patrol done");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn update_replaces_by_id_and_refreshes_timestamp() {
        let mut notes = store();
        let mut added = notes.add(note("draft", "operations", "2026-08-02T10:00:00Z"));
        added.body = "final".to_string();

        let updated = notes.update(added.clone()).unwrap();
        assert_eq!(updated.body, "final");
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(notes.len(), 1);

        // Second application of the same payload changes nothing but the
        // timestamp.
        let again = notes.update(added).unwrap();
        assert_eq!(again.body, "final");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut notes = store();
        let mut ghost = note("nobody", "security", "2026-08-02T10:00:00Z");
        ghost.id = 99;
        let error = notes.update(ghost).unwrap_err();
        assert_eq!(error.to_string(), "NOTE_NOT_FOUND");
    }

    #[test]
    fn delete_removes_exactly_one_and_repeat_errors() {
        let mut notes = store();
        let first = notes.add(note("a", "security", "2026-08-01T06:00:00Z"));
        notes.add(note("b", "security", "2026-08-01T07:00:00Z"));

        notes.delete(first.id).unwrap();
        assert_eq!(notes.len(), 1);

        let error = notes.delete(first.id).unwrap_err();
        assert_eq!(error.to_string(), "NOTE_NOT_FOUND");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn reopen_restores_collection_and_id_sequence() {
        let backend = Arc::new(MemoryBackend::new());
        let mut notes: Store<Note> = Store::open(backend.clone()).unwrap();
        notes.add(note("a", "security", "2026-08-01T06:00:00Z"));
        notes.add(note("b", "security", "2026-08-01T07:00:00Z"));
        notes.delete(1).unwrap();

        let mut reopened: Store<Note> = Store::open(backend).unwrap();
        assert_eq!(reopened.len(), 1);
        let next = reopened.add(note("c", "security", "2026-08-01T08:00:00Z"));
        assert_eq!(next.id, 3);
    }

    #[test]
    fn persist_failure_keeps_memory_state() {
        struct BrokenBackend;
        impl StorageBackend for BrokenBackend {
            fn load(&self, _store: &str) -> Result<Option<String>, StoreError> {
                Ok(None)
            }
            fn persist(&self, _store: &str, _payload: &str) -> Result<(), StoreError> {
                Err(StoreError::Internal("QUOTA_EXCEEDED"))
            }
        }

        let mut notes: Store<Note> = Store::open(Arc::new(BrokenBackend)).unwrap();
        let added = notes.add(note("kept", "security", "2026-08-01T06:00:00Z"));
        assert_eq!(notes.get(added.id).unwrap().body, "kept");
    }

    #[test]
    fn by_department_and_kind_selectors() {
        let mut notes = store();
        notes.add(note("a", "security", "2026-08-01T06:00:00Z"));
        notes.add(note("b", "Operations", "2026-08-01T07:00:00Z"));

        assert_eq!(notes.by_department("operations").len(), 1);
        assert_eq!(notes.by_department("finance").len(), 0);
        // Notes carry no kind; the kind selector matches nothing.
        assert!(notes.by_kind("anything").is_empty());
    }

    #[test]
    fn by_date_range_is_inclusive() {
        let mut notes = store();
        notes.add(note("early", "security", "2026-08-01T00:00:00Z"));
        notes.add(note("edge", "security", "2026-08-02T00:00:00Z"));
        notes.add(note("late", "security", "2026-08-03T00:00:00Z"));

        let start = "2026-08-01T00:00:00Z".parse().unwrap();
        let end = "2026-08-02T00:00:00Z".parse().unwrap();
        let matched = notes.by_date_range(start, end);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn modify_all_touches_only_changed_records() {
        let mut notes = store();
        notes.add(note("open", "security", "2026-08-01T06:00:00Z"));
        notes.add(note("closed", "security", "2026-08-01T07:00:00Z"));

        let changed = notes.modify_all(|record| {
            if record.body == "open" {
                record.body = "closed".to_string();
                true
            } else {
                false
            }
        });
        assert_eq!(changed, 1);
        assert!(notes.all().iter().all(|record| record.body == "closed"));

        let changed = notes.modify_all(|record| {
            if record.body == "open" {
                record.body = "closed".to_string();
                true
            } else {
                false
            }
        });
        assert_eq!(changed, 0);
    }
}
