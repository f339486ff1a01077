//! `tfctl validate-all`: offline validation of every module and root.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::repo_tasks;

/// Run `tfctl validate-all`, exiting with the first failing code.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or Terraform cannot
/// be spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let repo = app.repository()?;
    let results = {
        let reporter = app.terminal_reporter();
        repo_tasks::validate_all(&app.runner, &app.fs, &repo, &reporter).await?
    };
    app.renderer().render_validation(&results)?;
    Ok(ExitCode::from(repo_tasks::first_failure(&results)))
}
