//! Record types.
//!
//! Domain types for entries in the remote stores. A record is identified
//! by a namespaced path-like name, unique within its store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tags attached to a record, keyed uniquely.
///
/// A `BTreeMap` so iteration order is deterministic in output and tests.
pub type TagMap = BTreeMap<String, String>;

/// Which of the two stores a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Sensitive opaque blob (credentials, key material).
    Secret,
    /// Configuration-like string value, lower ceremony than a secret.
    Parameter,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Secret => write!(f, "secret"),
            RecordKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// A reference to a record: name plus the store it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub name: String,
    pub kind: RecordKind,
}

impl RecordRef {
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Metadata for a live record, as reported by a describe probe.
///
/// Never carries the value; values only travel store-ward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    pub reference: RecordRef,
    pub tags: TagMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(RecordKind::Secret.to_string(), "secret");
        assert_eq!(RecordKind::Parameter.to_string(), "parameter");
    }

    #[test]
    fn test_record_ref_display() {
        let r = RecordRef::new("prod/db/password", RecordKind::Secret);
        assert_eq!(r.to_string(), "prod/db/password (secret)");
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&RecordKind::Parameter).unwrap();
        assert_eq!(json, "\"parameter\"");
    }
}
