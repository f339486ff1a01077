//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::Invocation;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, invocation: &Invocation) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, invocation: &Invocation, timeout: Duration)
    -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// No timeout: Terraform runs to completion or until interrupted.
    async fn run_status(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Confirmation Port ─────────────────────────────────────────────────────────

/// Yes/no prompt before state-mutating actions.
pub trait Confirmer {
    /// Ask `prompt`; non-interactive implementations return `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Read-mostly view of the infrastructure tree.
pub trait RepoFs {
    fn dir_exists(&self, path: &Path) -> bool;
    fn file_exists(&self, path: &Path) -> bool;
    /// Immediate subdirectories of `path`, sorted by name. A missing `path`
    /// yields an empty list.
    fn subdirs(&self, path: &Path) -> Result<Vec<PathBuf>>;
    /// Delete `.terraform/` directories and plan files below `path`, returning
    /// what was removed.
    fn remove_terraform_artifacts(&self, path: &Path) -> Result<Vec<PathBuf>>;
}
