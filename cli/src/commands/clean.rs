//! `tfctl clean`: remove local Terraform working data.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::repo_tasks;

/// Run `tfctl clean`.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or a path cannot be
/// removed.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let repo = app.repository()?;
    let removed = repo_tasks::clean(&app.fs, &repo)?;
    app.renderer().render_clean(&removed)?;
    Ok(ExitCode::SUCCESS)
}
