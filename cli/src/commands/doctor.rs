//! `tfctl doctor`: local setup diagnostics.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::doctor;
use crate::output::progress;

/// Run `tfctl doctor`. Exits 1 when any issue is found.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let repo = app.repository()?;

    let pb = app.spinner("Running health checks...");
    let report = doctor::run_checks(&app.runner, &app.fs, &repo).await;
    if let Some(pb) = pb {
        progress::finish_ok(&pb, "Health checks complete");
    }

    app.renderer().render_doctor(&report)?;

    if report.issues().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
