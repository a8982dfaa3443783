//! List command.
//!
//! Lists the records an actor created, across both stores.

use tracing::info;

use crate::cli::{output, resolve_actor, Completion};
use crate::core::listing::list_by_actor;
use crate::core::record::RecordRef;
use crate::core::store::StoreClient;
use crate::error::Result;

/// List records created by an actor.
pub fn execute(store: &dyn StoreClient, actor: Option<String>, json: bool) -> Result<Completion> {
    let actor = resolve_actor(actor);
    info!(actor, "listing records");

    let records: Vec<RecordRef> = list_by_actor(store, &actor).collect::<Result<_>>()?;

    if json {
        let out = serde_json::json!({
            "actor": actor,
            "records": records,
            "count": records.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if records.is_empty() {
        output::dimmed(&format!("no records created by {}", actor));
    } else {
        println!("{} records created by {}:", records.len(), actor);
        for record in &records {
            output::list_item(&record.to_string());
        }
    }

    Ok(Completion::Done)
}
