//! Test support utilities for silo integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working directory and home dir. No
/// process-global state is mutated; child processes use
/// `.current_dir()` so tests can safely run in parallel. Dummy AWS
/// environment variables keep the SDK's config resolution local and
/// deterministic; offline tests never reach the point of a real call.
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }
}
