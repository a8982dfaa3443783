//! Listing across both stores.
//!
//! Produces the records an actor created, secrets first then parameters,
//! in whatever order the underlying store returns them. The sequence is
//! lazy and restartable; concurrent mutation by other actors can add or
//! remove entries between or during traversals.

use crate::core::provenance;
use crate::core::record::RecordKind;
use crate::core::store::{RecordIter, StoreClient, TagFilter};

/// Records whose `CreatedBy` tag equals `actor`, across both kinds.
pub fn list_by_actor<'a>(store: &'a dyn StoreClient, actor: &str) -> RecordIter<'a> {
    let filter = TagFilter::new(provenance::CREATED_BY, actor);
    Box::new(
        store
            .list_records(RecordKind::Secret, &filter)
            .chain(store.list_records(RecordKind::Parameter, &filter)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::RecordKind;
    use crate::core::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn seed(store: &MemoryStore, name: &str, kind: RecordKind, actor: &str) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let tags = provenance::creation_tags(actor, now);
        store.create_record(name, "v", kind, &tags).unwrap();
    }

    #[test]
    fn test_lists_both_kinds_for_actor() {
        let store = MemoryStore::new();
        seed(&store, "s1", RecordKind::Secret, "alice");
        seed(&store, "p1", RecordKind::Parameter, "alice");
        seed(&store, "s2", RecordKind::Secret, "bob");

        let mut names: Vec<_> = list_by_actor(&store, "alice")
            .map(|r| r.unwrap().name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["p1", "s1"]);
    }

    #[test]
    fn test_restartable() {
        let store = MemoryStore::new();
        seed(&store, "s1", RecordKind::Secret, "alice");

        assert_eq!(list_by_actor(&store, "alice").count(), 1);
        assert_eq!(list_by_actor(&store, "alice").count(), 1);
    }

    #[test]
    fn test_empty_for_unknown_actor() {
        let store = MemoryStore::new();
        seed(&store, "s1", RecordKind::Secret, "alice");
        assert_eq!(list_by_actor(&store, "nobody").count(), 0);
    }
}
