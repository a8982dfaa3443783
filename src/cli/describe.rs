//! Describe command.
//!
//! Shows a record's kind and tags. Values never leave the store through
//! this path.

use crate::cli::{output, Completion};
use crate::core::record::RecordKind;
use crate::core::store::StoreClient;
use crate::core::validation;
use crate::error::Result;

/// Describe a record.
pub fn execute(
    store: &dyn StoreClient,
    name: &str,
    kind: RecordKind,
    json: bool,
) -> Result<Completion> {
    validation::validate_name(name)?;

    match store.describe_record(name, kind)? {
        Some(meta) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&meta)?);
            } else {
                output::kv("name", &meta.reference.name);
                output::kv("kind", meta.reference.kind);
                if meta.tags.is_empty() {
                    output::dimmed("no tags");
                } else {
                    for (key, value) in &meta.tags {
                        output::kv(key, value);
                    }
                }
            }
            Ok(Completion::Done)
        }
        None => {
            if json {
                println!("null");
            } else {
                output::dimmed(&format!("not found: {} ({})", name, kind));
            }
            Ok(Completion::Done)
        }
    }
}
