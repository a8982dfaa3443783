//! Delete protocol.
//!
//! Probe-first: delete has no natural idempotent fallback, so existence
//! is checked explicitly instead of create-then-catch. Nothing to delete
//! is an outcome, not an error. Audit tags are attached best-effort
//! before the irreversible delete; their failure never blocks it.

use tracing::{debug, warn};

use crate::core::record::{RecordKind, RecordRef, TagMap};
use crate::core::store::{Acked, StoreClient};
use crate::core::validation;
use crate::error::Result;

/// Terminal outcome of a delete.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The record existed and was deleted. If attaching the audit tags
    /// failed, the downgraded diagnostic rides along as a warning.
    Deleted {
        record: RecordRef,
        audit_warning: Option<String>,
    },
    /// No record under that name; nothing to delete.
    NotFound,
}

/// Delete a record, attaching audit tags best-effort first.
///
/// `audit` carries the `DeletedBy`/`DeletedAt` pair built by the caller;
/// the audit trail survives only in the provider's own change history
/// once the record is gone. `force` skips any provider recovery window.
pub fn delete(
    store: &dyn StoreClient,
    name: &str,
    kind: RecordKind,
    audit: Option<&TagMap>,
    force: bool,
) -> Result<DeleteOutcome> {
    validation::validate_name(name)?;

    if store.describe_record(name, kind)?.is_none() {
        debug!(name, %kind, "nothing to delete");
        return Ok(DeleteOutcome::NotFound);
    }

    let record = RecordRef::new(name, kind);

    let audit_warning = match audit {
        Some(tags) => match store.merge_tags(name, tags, kind) {
            Ok(Acked::Ack) => None,
            Ok(Acked::NotFound) => Some(format!("{} vanished before audit tagging", record)),
            Err(e) => {
                warn!(%record, error = %e, "audit tagging failed, deleting anyway");
                Some(format!("audit tags not attached: {}", e))
            }
        },
        None => None,
    };

    match store.delete_record(name, kind, force)? {
        Acked::Ack => {
            debug!(%record, "record deleted");
            Ok(DeleteOutcome::Deleted {
                record,
                audit_warning,
            })
        }
        // Raced with another deleter between the probe and the delete
        Acked::NotFound => Ok(DeleteOutcome::NotFound),
    }
}
