//! `tfctl roots`: list every (environment, layer) root.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tfctl_common::Environment;

use crate::app::AppContext;
use crate::application::services::repo_tasks;

#[derive(Args, Debug, Default)]
pub struct RootsArgs {
    /// Only list roots of this environment
    #[arg(long, value_enum)]
    pub environment: Option<Environment>,
}

/// Run `tfctl roots`.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened.
pub fn run(app: &AppContext, args: &RootsArgs) -> Result<ExitCode> {
    let repo = app.repository()?;
    let roots = repo_tasks::list_roots(&app.fs, &repo, args.environment);
    app.renderer().render_roots(&roots)?;
    Ok(ExitCode::SUCCESS)
}
