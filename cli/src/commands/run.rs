//! `tfctl <environment> <layer> <action>`: run one action against one root.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::dispatch::{self, DispatchFlags, Request};
use crate::domain::UsageError;

// Positional arguments of the default command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Target environment: dev, stage or prod
    pub environment: Option<String>,

    /// Infrastructure layer: platform, data or app
    pub layer: Option<String>,

    /// init, plan, apply, destroy, drift-check, format or validate
    pub action: Option<String>,

    /// Pass -reconfigure to init
    #[arg(long)]
    pub reconfigure: bool,

    /// Check formatting without rewriting files (format action)
    #[arg(long)]
    pub check: bool,
}

/// Run the dispatched action and exit with Terraform's exit code.
///
/// # Errors
///
/// Returns a [`UsageError`] for missing or unknown names (before any
/// subprocess), or an error if the repository or root cannot be opened,
/// confirmation is refused, or Terraform cannot be spawned.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let (Some(environment), Some(layer), Some(action)) =
        (&args.environment, &args.layer, &args.action)
    else {
        let given = [&args.environment, &args.layer, &args.action]
            .iter()
            .filter(|a| a.is_some())
            .count();
        return Err(UsageError::MissingArguments(given).into());
    };

    let (root, action) = dispatch::parse_request(environment, layer, action)?;

    let repo = app.repository()?;
    repo.config.validate()?;

    let request = Request {
        root,
        action,
        reconfigure: args.reconfigure,
        check: args.check,
    };
    let flags = DispatchFlags {
        assume_yes: app.assume_yes,
        non_interactive: app.non_interactive,
    };

    let report = dispatch::dispatch(&app.runner, &app.fs, app, &repo, &request, &flags).await?;
    app.renderer().render_report(&report)?;

    Ok(ExitCode::from(report.exit_code))
}
