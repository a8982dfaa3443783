//! Delete command.
//!
//! Confirms interactively unless `--yes`, attaches audit tags
//! best-effort, then issues the irreversible delete.

use std::io::{self, IsTerminal};

use chrono::Utc;
use dialoguer::Confirm;
use tracing::info;

use crate::cli::{output, resolve_actor, Completion};
use crate::core::delete::{delete, DeleteOutcome};
use crate::core::provenance;
use crate::core::record::RecordKind;
use crate::core::store::StoreClient;
use crate::error::Result;

/// Delete a record.
pub fn execute(
    store: &dyn StoreClient,
    name: &str,
    kind: RecordKind,
    actor: Option<String>,
    yes: bool,
    force: bool,
) -> Result<Completion> {
    let actor = resolve_actor(actor);

    if !yes && !confirm(name, kind)? {
        output::dimmed("aborted");
        return Ok(Completion::Cancelled);
    }

    info!(name, %kind, actor, "deleting record");
    let audit = provenance::deletion_tags(&actor, Utc::now());

    match delete(store, name, kind, Some(&audit), force)? {
        DeleteOutcome::Deleted {
            record,
            audit_warning,
        } => {
            if let Some(warning) = audit_warning {
                output::warn(&warning);
            }
            output::success(&format!("deleted {}", output::name(&record.to_string())));
            Ok(Completion::Done)
        }
        DeleteOutcome::NotFound => {
            output::dimmed(&format!("nothing to delete: {} ({})", name, kind));
            Ok(Completion::Done)
        }
    }
}

/// Ask before an irreversible delete.
///
/// A non-terminal stdin without `--yes` cancels rather than blocking on
/// a prompt nobody will answer.
fn confirm(name: &str, kind: RecordKind) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(format!("Delete {} ({})? This cannot be undone", name, kind))
        .default(false)
        .interact()
        .map_err(Into::into)
}
