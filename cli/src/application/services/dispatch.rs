//! Application service: the (environment, layer, action) dispatcher.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tfctl_common::{Action, Environment, Layer, RootId};

use crate::application::ports::{CommandRunner, Confirmer, RepoFs};
use crate::domain::invocation::{self, ActionOptions, Invocation, Outcome};
use crate::domain::{DispatchError, Repository, UsageError};

/// A validated request against one root.
#[derive(Debug, Clone, Copy)]
pub struct Request {
    pub root: RootId,
    pub action: Action,
    /// `init -reconfigure`.
    pub reconfigure: bool,
    /// `format` in check mode.
    pub check: bool,
}

/// Caller-level behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchFlags {
    /// `--yes`: skip confirmation and pass `-auto-approve`.
    pub assume_yes: bool,
    /// No TTY interaction expected (CI, `--yes`).
    pub non_interactive: bool,
}

/// Result of one dispatched action.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub environment: Environment,
    pub layer: Layer,
    pub action: Action,
    pub directory: PathBuf,
    pub exit_code: u8,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Parse the three positional arguments.
///
/// # Errors
///
/// Returns a [`UsageError`] naming the first invalid argument.
pub fn parse_request(
    environment: &str,
    layer: &str,
    action: &str,
) -> Result<(RootId, Action), UsageError> {
    let environment: Environment = environment.parse()?;
    let layer: Layer = layer.parse()?;
    let action: Action = action.parse()?;
    Ok((RootId::new(environment, layer), action))
}

/// Whether `action` on `root` needs an explicit yes before Terraform runs.
#[must_use]
pub fn needs_confirmation(root: RootId, action: Action) -> bool {
    action.mutates_state() && (action == Action::Destroy || root.environment.is_protected())
}

/// Build the Terraform invocation for `request` without running it.
///
/// # Errors
///
/// Returns [`DispatchError::MissingRoot`] when the root directory is absent.
pub fn build_invocation(
    fs: &impl RepoFs,
    repo: &Repository,
    request: &Request,
    flags: &DispatchFlags,
) -> Result<Invocation> {
    let dir = repo.root_dir(request.root);
    if !fs.dir_exists(&dir) {
        return Err(DispatchError::MissingRoot {
            root: request.root,
            path: dir.display().to_string(),
        }
        .into());
    }

    let cfg = &repo.config;
    let env_settings = cfg.environment(request.root.environment);
    let var_file = Some(cfg.terraform.var_file.clone())
        .filter(|name| !name.is_empty() && fs.file_exists(&dir.join(name)));

    let opts = ActionOptions {
        auto_approve: flags.assume_yes,
        reconfigure: request.reconfigure,
        check: request.check,
        var_file,
        non_interactive: flags.non_interactive,
    };

    let args = invocation::terraform_args(
        request.action,
        request.root,
        &cfg.backend,
        &env_settings,
        &opts,
    );
    let env = invocation::credential_env(
        request.action,
        request.root,
        &env_settings,
        flags.non_interactive,
    );

    Ok(Invocation::new(cfg.terraform.binary.clone(), dir)
        .args(args)
        .envs(env))
}

/// Run `request` once and report Terraform's exit status unchanged.
///
/// No retries: a failed plan or apply is returned to the caller as-is.
///
/// # Errors
///
/// Returns an error if the root is missing, confirmation is refused, or the
/// Terraform process cannot be spawned. A non-zero Terraform exit is not an
/// error; it is carried in [`Report::exit_code`].
pub async fn dispatch(
    runner: &impl CommandRunner,
    fs: &impl RepoFs,
    confirmer: &impl Confirmer,
    repo: &Repository,
    request: &Request,
    flags: &DispatchFlags,
) -> Result<Report> {
    let invocation = build_invocation(fs, repo, request, flags)?;

    if needs_confirmation(request.root, request.action) && !flags.assume_yes {
        let prompt = format!("Run {} against {}?", request.action, request.root);
        if !confirmer.confirm(&prompt, false)? {
            return Err(DispatchError::NotConfirmed {
                root: request.root,
                action: request.action,
            }
            .into());
        }
    }

    tracing::info!(
        environment = %request.root.environment,
        layer = %request.root.layer,
        action = %request.action,
        directory = %invocation.cwd.display(),
        "invoking terraform"
    );
    tracing::debug!(command = %invocation.command_line(), "terraform command line");

    let started_at = Utc::now();
    let clock = Instant::now();
    let status = runner.run_status(&invocation).await?;
    let exit_code = status_code(status);
    let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::debug!(exit_code, duration_ms, "terraform finished");

    Ok(Report {
        environment: request.root.environment,
        layer: request.root.layer,
        action: request.action,
        directory: invocation.cwd,
        exit_code,
        outcome: invocation::classify(request.action, exit_code),
        started_at,
        duration_ms,
    })
}

/// Map a child's exit status to the wrapper's exit code.
#[must_use]
pub fn status_code(status: ExitStatus) -> u8 {
    #[cfg(unix)]
    let signal = std::os::unix::process::ExitStatusExt::signal(&status);
    #[cfg(not(unix))]
    let signal = None;
    invocation::exit_code(status.code(), signal)
}
