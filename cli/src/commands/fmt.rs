//! `tfctl fmt`: canonical formatting across the repository.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::repo_tasks;

#[derive(Args, Debug, Default)]
pub struct FmtArgs {
    /// Report unformatted files and exit non-zero instead of rewriting
    #[arg(long)]
    pub check: bool,
}

/// Run `tfctl fmt`.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or Terraform cannot
/// be spawned.
pub async fn run(app: &AppContext, args: &FmtArgs) -> Result<ExitCode> {
    let repo = app.repository()?;
    let code = repo_tasks::fmt_all(&app.runner, &repo, args.check).await?;

    app.renderer().render_fmt(args.check, code)?;

    Ok(ExitCode::from(code))
}
