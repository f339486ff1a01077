//! Application service: repository-wide tasks (`fmt`, `validate-all`,
//! `docs`, `clean`, `roots`).
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tfctl_common::{Environment, RootId};

use crate::application::ports::{CommandRunner, ProgressReporter, RepoFs};
use crate::application::services::dispatch::status_code;
use crate::domain::{Invocation, Repository};

/// Upper bound for one `init -backend=false` + `validate` pair. Provider
/// downloads dominate; a hung registry should not stall CI forever.
pub const VALIDATE_TIMEOUT: Duration = Duration::from_secs(600);

// ── fmt ───────────────────────────────────────────────────────────────────────

/// `terraform fmt -recursive` over the whole repository.
///
/// # Errors
///
/// Returns an error if Terraform cannot be spawned.
pub async fn fmt_all(runner: &impl CommandRunner, repo: &Repository, check: bool) -> Result<u8> {
    let mut args = vec!["fmt", "-recursive"];
    if check {
        args.extend(["-check", "-diff"]);
    }
    let binary = repo.config.terraform.binary.clone();
    let inv = Invocation::new(binary, repo.root.clone()).args(args);
    tracing::info!(directory = %repo.root.display(), check, "invoking terraform fmt");
    let status = runner.run_status(&inv).await?;
    Ok(status_code(status))
}

// ── validate-all ──────────────────────────────────────────────────────────────

/// Result of validating one directory.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResult {
    /// Directory relative to the repository root.
    pub directory: String,
    pub exit_code: u8,
    /// Captured stderr (or stdout when stderr is empty) of the failing step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// Every directory `validate-all` covers: modules first, then existing roots.
///
/// # Errors
///
/// Returns an error if the modules directory cannot be listed.
pub fn validation_targets(fs: &impl RepoFs, repo: &Repository) -> Result<Vec<PathBuf>> {
    let mut dirs = fs.subdirs(&repo.modules_dir())?;
    dirs.extend(
        RootId::all()
            .map(|root| repo.root_dir(root))
            .filter(|dir| fs.dir_exists(dir)),
    );
    Ok(dirs)
}

/// Run `init -backend=false` then `validate` in every module and root.
///
/// Continues past failures so one run reports every broken directory.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed or Terraform cannot be
/// spawned.
pub async fn validate_all(
    runner: &impl CommandRunner,
    fs: &impl RepoFs,
    repo: &Repository,
    reporter: &impl ProgressReporter,
) -> Result<Vec<ValidateResult>> {
    let binary = &repo.config.terraform.binary;
    let mut results = Vec::new();

    for dir in validation_targets(fs, repo)? {
        let display = repo.display_path(&dir);
        reporter.step(&format!("validating {display}"));

        let init = Invocation::new(binary.clone(), dir.clone())
            .args(["init", "-backend=false", "-input=false"])
            .envs(vec![("TF_IN_AUTOMATION".to_string(), "1".to_string())]);
        let output = runner.run_with_timeout(&init, VALIDATE_TIMEOUT).await?;

        let output = if output.status.success() {
            let validate = Invocation::new(binary.clone(), dir.clone()).args(["validate"]);
            runner.run_with_timeout(&validate, VALIDATE_TIMEOUT).await?
        } else {
            output
        };

        let exit_code = status_code(output.status);
        if exit_code == 0 {
            reporter.success(&display);
            results.push(ValidateResult {
                directory: display,
                exit_code,
                diagnostics: None,
            });
        } else {
            reporter.warn(&format!("{display} failed (exit {exit_code})"));
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostics = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            results.push(ValidateResult {
                directory: display,
                exit_code,
                diagnostics: Some(diagnostics),
            });
        }
    }
    Ok(results)
}

/// First non-zero exit code among `results`, or 0.
#[must_use]
pub fn first_failure(results: &[ValidateResult]) -> u8 {
    results
        .iter()
        .map(|r| r.exit_code)
        .find(|&code| code != 0)
        .unwrap_or(0)
}

// ── docs ──────────────────────────────────────────────────────────────────────

/// Regenerate `README.md` inputs/outputs tables in every module.
///
/// # Errors
///
/// Returns an error if the modules directory cannot be listed or the docs
/// generator cannot be spawned.
pub async fn generate_docs(
    runner: &impl CommandRunner,
    fs: &impl RepoFs,
    repo: &Repository,
    reporter: &impl ProgressReporter,
) -> Result<u8> {
    let mut failure = 0;
    for dir in fs.subdirs(&repo.modules_dir())? {
        let display = repo.display_path(&dir);
        let inv = Invocation::new(repo.config.terraform.docs_binary.clone(), dir).args([
            "markdown",
            "table",
            "--output-file",
            "README.md",
            "--output-mode",
            "inject",
            ".",
        ]);
        let code = status_code(runner.run_status(&inv).await?);
        if code == 0 {
            reporter.success(&display);
        } else {
            reporter.warn(&format!("{display} failed (exit {code})"));
            if failure == 0 {
                failure = code;
            }
        }
    }
    Ok(failure)
}

// ── clean ─────────────────────────────────────────────────────────────────────

/// Remove Terraform working data from `live/` and `modules/`.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or removed.
pub fn clean(fs: &impl RepoFs, repo: &Repository) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for base in [repo.live_dir(), repo.modules_dir()] {
        if !fs.dir_exists(&base) {
            continue;
        }
        removed.extend(
            fs.remove_terraform_artifacts(&base)?
                .iter()
                .map(|p| repo.display_path(p)),
        );
    }
    Ok(removed)
}

// ── roots ─────────────────────────────────────────────────────────────────────

/// One row of `tfctl roots`.
#[derive(Debug, Clone, Serialize)]
pub struct RootStatus {
    #[serde(flatten)]
    pub root: RootId,
    pub directory: PathBuf,
    pub state_key: String,
    pub exists: bool,
}

/// Every root in dependency order, optionally limited to one environment.
#[must_use]
pub fn list_roots(
    fs: &impl RepoFs,
    repo: &Repository,
    only: Option<Environment>,
) -> Vec<RootStatus> {
    RootId::all()
        .filter(|root| only.is_none_or(|env| root.environment == env))
        .map(|root| {
            let directory = repo.root_dir(root);
            RootStatus {
                root,
                exists: fs.dir_exists(&directory),
                directory,
                state_key: root.state_key(),
            }
        })
        .collect()
}
