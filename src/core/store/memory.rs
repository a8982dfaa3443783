//! In-memory store backend.
//!
//! Mirrors the remote stores' semantics (atomic create-if-absent,
//! last-writer-wins updates, per-kind namespaces) without leaving the
//! process. The protocol tests run against it, and it doubles as the
//! reference implementation for new backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::trace;

use crate::core::record::{RecordKind, RecordMeta, RecordRef, TagMap};
use crate::core::store::{Acked, CreateOutcome, RecordIter, StoreClient, TagFilter};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
struct StoredRecord {
    value: String,
    tags: TagMap,
}

/// In-process record store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(RecordKind, String), StoredRecord>>,
    // Countdown of tag merges to fail, for exercising the partial-update path.
    failing_merges: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` tag merges fail with a transient error.
    ///
    /// Lets tests drive the non-atomic fallback into its known gap:
    /// value updated, tags stale.
    pub fn fail_tag_merges(&self, n: usize) {
        self.failing_merges.store(n, Ordering::SeqCst);
    }

    /// Number of live records across both kinds.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a record's value directly, bypassing the trait surface.
    ///
    /// Describe deliberately never returns values, so convergence
    /// assertions need this side door.
    pub fn value_of(&self, name: &str, kind: RecordKind) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&(kind, name.to_string()))
            .map(|r| r.value.clone())
    }
}

impl StoreClient for MemoryStore {
    fn create_record(
        &self,
        name: &str,
        value: &str,
        kind: RecordKind,
        tags: &TagMap,
    ) -> Result<CreateOutcome> {
        let mut records = self.records.lock().unwrap();
        let key = (kind, name.to_string());
        if records.contains_key(&key) {
            trace!(name, %kind, "create conflict");
            return Ok(CreateOutcome::Conflict);
        }
        records.insert(
            key,
            StoredRecord {
                value: value.to_string(),
                tags: tags.clone(),
            },
        );
        trace!(name, %kind, "record created");
        Ok(CreateOutcome::Created(RecordRef::new(name, kind)))
    }

    fn update_value(&self, name: &str, value: &str, kind: RecordKind) -> Result<Acked> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&(kind, name.to_string())) {
            Some(record) => {
                record.value = value.to_string();
                Ok(Acked::Ack)
            }
            None => Ok(Acked::NotFound),
        }
    }

    fn merge_tags(&self, name: &str, tags: &TagMap, kind: RecordKind) -> Result<Acked> {
        if self
            .failing_merges
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::TransientUnavailable(
                "injected tag merge failure".to_string(),
            )
            .into());
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(&(kind, name.to_string())) {
            Some(record) => {
                for (k, v) in tags {
                    record.tags.insert(k.clone(), v.clone());
                }
                Ok(Acked::Ack)
            }
            None => Ok(Acked::NotFound),
        }
    }

    fn describe_record(&self, name: &str, kind: RecordKind) -> Result<Option<RecordMeta>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&(kind, name.to_string())).map(|r| RecordMeta {
            reference: RecordRef::new(name, kind),
            tags: r.tags.clone(),
        }))
    }

    fn delete_record(&self, name: &str, kind: RecordKind, _force: bool) -> Result<Acked> {
        let mut records = self.records.lock().unwrap();
        match records.remove(&(kind, name.to_string())) {
            Some(_) => {
                trace!(name, %kind, "record deleted");
                Ok(Acked::Ack)
            }
            None => Ok(Acked::NotFound),
        }
    }

    fn list_records(&self, kind: RecordKind, filter: &TagFilter) -> RecordIter<'_> {
        let records = self.records.lock().unwrap();
        let matches: Vec<_> = records
            .iter()
            .filter(|((k, _), record)| {
                *k == kind && record.tags.get(&filter.key) == Some(&filter.value)
            })
            .map(|((k, name), _)| Ok(RecordRef::new(name.clone(), *k)))
            .collect();
        Box::new(matches.into_iter())
    }
}
