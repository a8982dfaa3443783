//! Core library components.
//!
//! The store-agnostic protocols (upsert, delete, listing) and the store
//! backend seam they run against.

pub mod delete;
pub mod listing;
pub mod provenance;
pub mod record;
pub mod store;
pub mod upsert;
pub mod validation;

pub use delete::{delete, DeleteOutcome};
pub use listing::list_by_actor;
pub use record::{RecordKind, RecordMeta, RecordRef, TagMap};
pub use store::StoreClient;
pub use upsert::{upsert, Upserted};
