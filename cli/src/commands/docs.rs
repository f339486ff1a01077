//! `tfctl docs`: regenerate module documentation.

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::repo_tasks;

/// Run `tfctl docs`.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or terraform-docs
/// cannot be spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let repo = app.repository()?;
    let docs_binary = repo.config.terraform.docs_binary.clone();
    let code = {
        let reporter = app.terminal_reporter();
        repo_tasks::generate_docs(&app.runner, &app.fs, &repo, &reporter)
            .await
            .with_context(|| format!("running {docs_binary}"))?
    };

    app.renderer().render_docs(code)?;
    Ok(ExitCode::from(code))
}
