//! Provenance tags.
//!
//! Reserved tag pairs recording who created or deleted a record and when.
//! The actor identity and clock reading are always injected by the caller
//! at the boundary; nothing in the core reads ambient identity or the
//! wall clock.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::record::TagMap;
use crate::error::{Result, ValidationError};

/// Tag key recording the creating actor.
pub const CREATED_BY: &str = "CreatedBy";
/// Tag key recording the creation time (ISO-8601 UTC).
pub const CREATED_AT: &str = "CreatedAt";
/// Tag key recording the deleting actor, attached best-effort before delete.
pub const DELETED_BY: &str = "DeletedBy";
/// Tag key recording the deletion time (ISO-8601 UTC).
pub const DELETED_AT: &str = "DeletedAt";

const RESERVED: [&str; 4] = [CREATED_BY, CREATED_AT, DELETED_BY, DELETED_AT];

/// Format a timestamp the way provenance tags carry it.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the creation provenance pair for an actor at a point in time.
pub fn creation_tags(actor: &str, now: DateTime<Utc>) -> TagMap {
    let mut tags = TagMap::new();
    tags.insert(CREATED_BY.to_string(), actor.to_string());
    tags.insert(CREATED_AT.to_string(), timestamp(now));
    tags
}

/// Build the deletion audit pair for an actor at a point in time.
pub fn deletion_tags(actor: &str, now: DateTime<Utc>) -> TagMap {
    let mut tags = TagMap::new();
    tags.insert(DELETED_BY.to_string(), actor.to_string());
    tags.insert(DELETED_AT.to_string(), timestamp(now));
    tags
}

/// Reject caller-supplied extra tags that redefine a reserved key.
pub fn check_no_reserved(extra: &TagMap) -> Result<()> {
    for key in extra.keys() {
        if RESERVED.contains(&key.as_str()) {
            return Err(ValidationError::ReservedTag(key.clone()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_creation_tags() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let tags = creation_tags("alice", now);
        assert_eq!(tags.get(CREATED_BY).unwrap(), "alice");
        assert_eq!(tags.get(CREATED_AT).unwrap(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_deletion_tags() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        let tags = deletion_tags("bob", now);
        assert_eq!(tags.get(DELETED_BY).unwrap(), "bob");
        assert_eq!(tags.get(DELETED_AT).unwrap(), "2024-06-15T12:30:00Z");
    }

    #[test]
    fn test_reserved_key_rejected() {
        let mut extra = TagMap::new();
        extra.insert("Team".to_string(), "infra".to_string());
        assert!(check_no_reserved(&extra).is_ok());

        extra.insert(CREATED_BY.to_string(), "mallory".to_string());
        assert!(check_no_reserved(&extra).is_err());
    }
}
