//! Silo - tag-aware secret and parameter store CLI.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── create        # Create-or-update a record with provenance tags
//! │   ├── delete        # Probe-first delete with audit tagging
//! │   ├── describe      # Show a record's tags (never its value)
//! │   ├── list          # Records created by an actor, both stores
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── record        # Record, RecordRef, RecordKind, TagMap
//!     ├── provenance    # Reserved CreatedBy/CreatedAt tag pairs
//!     ├── validation    # Local pre-flight input rules
//!     ├── upsert        # Idempotent upsert-with-tagging protocol
//!     ├── delete        # Delete protocol
//!     ├── listing       # Cross-store listing by actor
//!     └── store/        # Store backends
//!         ├── mod       # StoreClient trait
//!         ├── aws       # Secrets Manager + SSM Parameter Store
//!         └── memory    # In-process reference implementation
//! ```
//!
//! # Features
//!
//! - Idempotent create-or-update with provenance tags attached
//!   atomically at creation
//! - Explicit two-step fallback when a record already exists, with
//!   partial failures surfaced distinctly
//! - Probe-first deletion with best-effort audit tagging
//! - Pluggable store backends behind a six-primitive trait

pub mod cli;
pub mod core;
pub mod error;
