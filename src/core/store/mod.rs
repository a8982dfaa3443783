//! Record store backends.
//!
//! Abstracts the remote secret/parameter stores behind the minimal
//! operation set the protocols need. Any provider SDK exposing these
//! primitives suffices.
//!
//! ## Backends
//!
//! - **AWS**: Feature-gated (`aws`, on by default). Secrets Manager for
//!   secrets, SSM Parameter Store for parameters.
//! - **Memory**: Always available. In-process store with the same
//!   semantics, used by tests and as a reference implementation.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `StoreClient` trait
//! 2. Add the implementation in a new file (e.g., `gcp.rs`, `vault.rs`)
//! 3. Feature-gate if appropriate
//! 4. Re-export from this module

use crate::core::record::{RecordKind, RecordMeta, RecordRef, TagMap};
use crate::error::Result;

pub mod memory;

#[cfg(feature = "aws")]
pub mod aws;

pub use memory::MemoryStore;

#[cfg(feature = "aws")]
pub use aws::AwsStore;

/// Outcome of a create attempt.
///
/// Conflict is a named variant, not an error: it drives the upsert
/// fallback path and is never surfaced to callers as a failure.
#[derive(Debug)]
pub enum CreateOutcome {
    /// The record did not exist and was created, tags attached atomically.
    Created(RecordRef),
    /// The name already holds a live record.
    Conflict,
}

/// Outcome of a mutation against a record that may no longer exist.
///
/// "Nothing there" is an outcome, not an error; delete-on-absent and
/// update races need to observe it without unwinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acked {
    Ack,
    NotFound,
}

/// A single tag equality constraint for listing.
#[derive(Debug, Clone)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Lazy sequence of record references from a listing call.
///
/// Finite and restartable: a fresh call to `list_records` starts a fresh
/// traversal. No ordering or cross-call stability is guaranteed; other
/// actors may mutate the store mid-listing.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<RecordRef>> + 'a>;

/// Store backend trait.
///
/// One synchronous, blocking round trip per call. The store's own
/// concurrency control (atomic create-if-absent, last-writer-wins on
/// updates) is the only consistency mechanism the protocols rely on.
pub trait StoreClient {
    /// Create a record with tags attached atomically at creation.
    fn create_record(
        &self,
        name: &str,
        value: &str,
        kind: RecordKind,
        tags: &TagMap,
    ) -> Result<CreateOutcome>;

    /// Set the value of an existing record.
    fn update_value(&self, name: &str, value: &str, kind: RecordKind) -> Result<Acked>;

    /// Merge tags into an existing record, overwriting keys that collide.
    fn merge_tags(&self, name: &str, tags: &TagMap, kind: RecordKind) -> Result<Acked>;

    /// Fetch metadata (never the value) for a record, if it exists.
    fn describe_record(&self, name: &str, kind: RecordKind) -> Result<Option<RecordMeta>>;

    /// Delete a record. `force` skips any provider recovery window.
    fn delete_record(&self, name: &str, kind: RecordKind, force: bool) -> Result<Acked>;

    /// List records of one kind matching a tag constraint.
    fn list_records(&self, kind: RecordKind, filter: &TagFilter) -> RecordIter<'_>;
}
