//! Command-line interface.

pub mod completions;
pub mod create;
pub mod delete;
pub mod describe;
pub mod list;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::record::RecordKind;
use crate::core::store::StoreClient;
use crate::error::Result;

/// Silo - tag-aware secret and parameter store CLI.
#[derive(Parser)]
#[command(
    name = "silo",
    about = "Create, update, list, and delete tagged secrets and parameters",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store call timeout in seconds
    #[arg(long, global = true, env = "SILO_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a record, or update it in place if it already exists
    Create {
        /// Record name (namespaced path, e.g. prod/db/password)
        #[arg(long)]
        name: String,

        /// Record value
        #[arg(long, group = "value_input")]
        value: Option<String>,

        /// Read the record value from a file
        #[arg(long, value_name = "PATH", group = "value_input")]
        value_file: Option<PathBuf>,

        /// Which store the record lives in
        #[arg(long, value_enum)]
        kind: RecordKind,

        /// Actor identity recorded in the CreatedBy tag
        #[arg(long, env = "SILO_ACTOR")]
        actor: Option<String>,

        /// Extra tag to attach (repeatable)
        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
    },

    /// Delete a record, attaching audit tags best-effort first
    Delete {
        /// Record name
        #[arg(long)]
        name: String,

        /// Which store the record lives in
        #[arg(long, value_enum)]
        kind: RecordKind,

        /// Actor identity recorded in the DeletedBy audit tag
        #[arg(long, env = "SILO_ACTOR")]
        actor: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Skip the provider's recovery window where one exists
        #[arg(long)]
        force: bool,
    },

    /// Show a record's tags and kind (never its value)
    Describe {
        /// Record name
        #[arg(long)]
        name: String,

        /// Which store the record lives in
        #[arg(long, value_enum)]
        kind: RecordKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List records created by an actor, across both stores
    List {
        /// Actor whose records to list
        #[arg(long, env = "SILO_ACTOR")]
        actor: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// How a command finished, for exit-code mapping.
///
/// Every terminal outcome maps to one code: success 0, degraded success
/// 2, user-cancelled 3. Errors exit 1 from `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    Degraded,
    Cancelled,
}

impl Completion {
    pub fn exit_code(self) -> i32 {
        match self {
            Completion::Done => 0,
            Completion::Degraded => 2,
            Completion::Cancelled => 3,
        }
    }
}

/// Execute a command.
pub fn execute(command: Command, timeout: u64) -> Result<Completion> {
    match command {
        Command::Create {
            name,
            value,
            value_file,
            kind,
            actor,
            tags,
        } => {
            let store = connect_store(timeout)?;
            create::execute(store.as_ref(), &name, value, value_file, kind, actor, &tags)
        }
        Command::Delete {
            name,
            kind,
            actor,
            yes,
            force,
        } => {
            let store = connect_store(timeout)?;
            delete::execute(store.as_ref(), &name, kind, actor, yes, force)
        }
        Command::Describe { name, kind, json } => {
            let store = connect_store(timeout)?;
            describe::execute(store.as_ref(), &name, kind, json)
        }
        Command::List { actor, json } => {
            let store = connect_store(timeout)?;
            list::execute(store.as_ref(), actor, json)
        }
        Command::Completions { shell } => completions::execute(shell),
    }
}

/// Resolve the actor identity at the boundary.
///
/// The core protocols never read ambient identity; this is the only
/// place the local username is consulted.
pub(crate) fn resolve_actor(actor: Option<String>) -> String {
    actor.unwrap_or_else(whoami::username)
}

#[cfg(feature = "aws")]
fn connect_store(timeout: u64) -> Result<Box<dyn StoreClient>> {
    Ok(Box::new(crate::core::store::AwsStore::connect(
        std::time::Duration::from_secs(timeout),
    )?))
}

#[cfg(not(feature = "aws"))]
fn connect_store(_timeout: u64) -> Result<Box<dyn StoreClient>> {
    use crate::error::StoreError;
    Err(StoreError::TransientUnavailable(
        "this build has no store backend (rebuild with --features aws)".to_string(),
    )
    .into())
}
