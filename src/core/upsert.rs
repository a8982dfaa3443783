//! Upsert coordinator.
//!
//! Ensures exactly one record exists under a name with the given value,
//! and with its tags merged to include the supplied tags, whether or not
//! the record pre-existed.
//!
//! The protocol is create-first: a create with tags attached atomically
//! is one round trip in the common doesn't-exist-yet case. On conflict it
//! falls back to a two-step update (value, then tags). The fallback is
//! not atomic; a tag failure after the value lands is reported as a
//! distinct degraded outcome so callers can retry just the tag step.
//!
//! Repeating the whole operation is always safe: a repeated create on an
//! existing record deterministically routes to the update path.

use tracing::{debug, warn};

use crate::core::record::{RecordKind, RecordRef, TagMap};
use crate::core::store::{Acked, CreateOutcome, StoreClient};
use crate::core::validation;
use crate::error::{Result, StoreError};

/// Terminal outcome of an upsert.
#[derive(Debug)]
pub enum Upserted {
    /// The record did not exist; created with value and tags in one step.
    Created(RecordRef),
    /// The record existed; value set and tags merged.
    Updated(RecordRef),
    /// Degraded success: value set, but the tag merge failed. The record
    /// is live with the new value and stale tags; retrying the upsert
    /// with the same tags repairs the tag state.
    Partial {
        record: RecordRef,
        tag_error: StoreError,
    },
}

impl Upserted {
    /// The record the operation affected.
    pub fn record(&self) -> &RecordRef {
        match self {
            Upserted::Created(r) | Upserted::Updated(r) => r,
            Upserted::Partial { record, .. } => record,
        }
    }
}

/// Create-or-update a record, keeping provenance tags consistent.
///
/// Tags are supplied complete by the caller, provenance pairs included;
/// nothing here reads ambient identity or the clock.
pub fn upsert(
    store: &dyn StoreClient,
    name: &str,
    value: &str,
    kind: RecordKind,
    tags: &TagMap,
) -> Result<Upserted> {
    validation::validate_name(name)?;
    validation::validate_value(name, value, kind)?;

    match store.create_record(name, value, kind, tags)? {
        CreateOutcome::Created(record) => {
            debug!(%record, "record created");
            Ok(Upserted::Created(record))
        }
        CreateOutcome::Conflict => {
            debug!(name, %kind, "record exists, falling back to update");
            update_existing(store, name, value, kind, tags)
        }
    }
}

/// Two-step fallback for a record that already exists.
fn update_existing(
    store: &dyn StoreClient,
    name: &str,
    value: &str,
    kind: RecordKind,
    tags: &TagMap,
) -> Result<Upserted> {
    let record = RecordRef::new(name, kind);

    match store.update_value(name, value, kind)? {
        Acked::Ack => {}
        // Deleted out from under us between the create conflict and the
        // update. The whole operation is idempotent; let the caller
        // retry it rather than looping here.
        Acked::NotFound => {
            return Err(StoreError::TransientUnavailable(format!(
                "{} disappeared during update; retry the operation",
                record
            ))
            .into());
        }
    }

    match store.merge_tags(name, tags, kind) {
        Ok(Acked::Ack) => Ok(Upserted::Updated(record)),
        Ok(Acked::NotFound) => Err(StoreError::TransientUnavailable(format!(
            "{} disappeared after value update; retry the operation",
            record
        ))
        .into()),
        Err(crate::error::Error::Store(tag_error)) => {
            warn!(%record, %tag_error, "value updated but tag merge failed");
            Ok(Upserted::Partial { record, tag_error })
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provenance;
    use crate::core::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn provenance_tags(actor: &str) -> TagMap {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        provenance::creation_tags(actor, now)
    }

    #[test]
    fn test_create_then_update_outcomes() {
        let store = MemoryStore::new();
        let tags = provenance_tags("alice");

        let first = upsert(&store, "prod/db", "v1", RecordKind::Secret, &tags).unwrap();
        assert!(matches!(first, Upserted::Created(_)));

        let second = upsert(&store, "prod/db", "v2", RecordKind::Secret, &tags).unwrap();
        assert!(matches!(second, Upserted::Updated(_)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.value_of("prod/db", RecordKind::Secret).unwrap(), "v2");
    }

    #[test]
    fn test_idempotent_with_identical_arguments() {
        let store = MemoryStore::new();
        let tags = provenance_tags("alice");

        upsert(&store, "svc/key", "abc", RecordKind::Parameter, &tags).unwrap();
        upsert(&store, "svc/key", "abc", RecordKind::Parameter, &tags).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.value_of("svc/key", RecordKind::Parameter).unwrap(),
            "abc"
        );
        let meta = store
            .describe_record("svc/key", RecordKind::Parameter)
            .unwrap()
            .unwrap();
        for (k, v) in &tags {
            assert_eq!(meta.tags.get(k), Some(v));
        }
    }

    #[test]
    fn test_provenance_survives_update_without_reserved_keys() {
        let store = MemoryStore::new();

        upsert(
            &store,
            "prod/token",
            "v1",
            RecordKind::Secret,
            &provenance_tags("alice"),
        )
        .unwrap();

        // Second caller supplies only extra tags; creation provenance
        // stays from the first call.
        let mut extra = TagMap::new();
        extra.insert("Rotation".to_string(), "manual".to_string());
        upsert(&store, "prod/token", "v2", RecordKind::Secret, &extra).unwrap();

        let meta = store
            .describe_record("prod/token", RecordKind::Secret)
            .unwrap()
            .unwrap();
        assert_eq!(meta.tags.get(provenance::CREATED_BY).unwrap(), "alice");
        assert_eq!(
            meta.tags.get(provenance::CREATED_AT).unwrap(),
            "2024-01-01T00:00:00Z"
        );
        assert_eq!(meta.tags.get("Rotation").unwrap(), "manual");
        assert_eq!(
            store.value_of("prod/token", RecordKind::Secret).unwrap(),
            "v2"
        );
    }

    #[test]
    fn test_partial_tag_update_is_distinct_and_repairable() {
        let store = MemoryStore::new();
        let tags = provenance_tags("alice");

        upsert(&store, "a/b", "v1", RecordKind::Secret, &tags).unwrap();

        store.fail_tag_merges(1);
        let outcome = upsert(&store, "a/b", "v2", RecordKind::Secret, &tags).unwrap();
        match &outcome {
            Upserted::Partial { record, tag_error } => {
                assert_eq!(record.name, "a/b");
                assert!(tag_error.is_retryable());
            }
            other => panic!("expected partial outcome, got {other:?}"),
        }
        // Value landed despite the tag failure
        assert_eq!(store.value_of("a/b", RecordKind::Secret).unwrap(), "v2");

        // Repeating the upsert repairs the tags
        let repaired = upsert(&store, "a/b", "v2", RecordKind::Secret, &tags).unwrap();
        assert!(matches!(repaired, Upserted::Updated(_)));
        let meta = store
            .describe_record("a/b", RecordKind::Secret)
            .unwrap()
            .unwrap();
        assert_eq!(meta.tags.get(provenance::CREATED_BY).unwrap(), "alice");
    }

    #[test]
    fn test_empty_secret_value_rejected() {
        let store = MemoryStore::new();
        let err = upsert(&store, "a", "", RecordKind::Secret, &TagMap::new()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_parameter_value_allowed() {
        let store = MemoryStore::new();
        let outcome = upsert(&store, "a", "", RecordKind::Parameter, &TagMap::new()).unwrap();
        assert!(matches!(outcome, Upserted::Created(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let store = MemoryStore::new();
        let err = upsert(&store, "", "v", RecordKind::Secret, &TagMap::new()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Validation(_)));
    }

    #[test]
    fn test_second_call_converges_value_and_keeps_tags() {
        // upsert("prod/aws/secret-key", "abc123") creates one record with
        // the provenance pair; a second call with "xyz789" and the same
        // tags converges on the new value with unchanged tags.
        let store = MemoryStore::new();
        let tags = provenance_tags("alice");

        upsert(&store, "prod/aws/secret-key", "abc123", RecordKind::Secret, &tags).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store
                .value_of("prod/aws/secret-key", RecordKind::Secret)
                .unwrap(),
            "abc123"
        );

        upsert(&store, "prod/aws/secret-key", "xyz789", RecordKind::Secret, &tags).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store
                .value_of("prod/aws/secret-key", RecordKind::Secret)
                .unwrap(),
            "xyz789"
        );
        let meta = store
            .describe_record("prod/aws/secret-key", RecordKind::Secret)
            .unwrap()
            .unwrap();
        assert_eq!(meta.tags.get(provenance::CREATED_BY).unwrap(), "alice");
        assert_eq!(
            meta.tags.get(provenance::CREATED_AT).unwrap(),
            "2024-01-01T00:00:00Z"
        );
    }
}
