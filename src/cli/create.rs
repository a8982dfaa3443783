//! Create command.
//!
//! Create-or-update a record with provenance tags. The value comes from
//! `--value`, `--value-file`, piped stdin, or an interactive hidden
//! prompt, in that order of preference.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use chrono::Utc;
use dialoguer::Password;
use tracing::info;

use crate::cli::{output, resolve_actor, Completion};
use crate::core::provenance;
use crate::core::record::{RecordKind, TagMap};
use crate::core::store::StoreClient;
use crate::core::upsert::{upsert, Upserted};
use crate::core::validation;
use crate::error::Result;

/// Create or update a record.
pub fn execute(
    store: &dyn StoreClient,
    name: &str,
    value: Option<String>,
    value_file: Option<PathBuf>,
    kind: RecordKind,
    actor: Option<String>,
    extra_tags: &[String],
) -> Result<Completion> {
    let actor = resolve_actor(actor);
    info!(name, %kind, actor, "creating record");

    let value = resolve_value(name, value, value_file)?;

    let mut tags = TagMap::new();
    for raw in extra_tags {
        let (key, val) = validation::parse_tag(raw)?;
        tags.insert(key, val);
    }
    provenance::check_no_reserved(&tags)?;
    tags.extend(provenance::creation_tags(&actor, Utc::now()));

    match upsert(store, name, &value, kind, &tags)? {
        Upserted::Created(record) => {
            output::success(&format!("created {}", output::name(&record.to_string())));
            Ok(Completion::Done)
        }
        Upserted::Updated(record) => {
            output::success(&format!("updated {}", output::name(&record.to_string())));
            Ok(Completion::Done)
        }
        Upserted::Partial { record, tag_error } => {
            output::warn(&format!(
                "value of {} updated, but tags are stale: {}",
                output::name(&record.to_string()),
                tag_error
            ));
            output::hint("retry with the same arguments to repair the tags");
            Ok(Completion::Degraded)
        }
    }
}

/// Resolve the record value from flag, file, pipe, or prompt.
fn resolve_value(name: &str, value: Option<String>, value_file: Option<PathBuf>) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if let Some(path) = value_file {
        let contents = fs::read_to_string(&path)?;
        // A single trailing newline is the file format, not the value
        return Ok(contents
            .strip_suffix('\n')
            .unwrap_or(&contents)
            .to_string());
    }
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        return Ok(input.strip_suffix('\n').unwrap_or(&input).to_string());
    }
    Ok(Password::new()
        .with_prompt(format!("Value for {}", output::name(name)))
        .allow_empty_password(true)
        .interact()?)
}
