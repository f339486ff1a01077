//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::{DispatchError, UsageError};
use crate::infra::config::EnvOverrides;

/// Environment and layer aware Terraform wrapper
///
/// Runs `terraform <action>` inside `live/<environment>/<layer>` with the
/// backend and credential context of that environment.
#[derive(Parser)]
#[command(
    name = "tfctl",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    arg_required_else_help = true,
    after_help = "Examples:\n  tfctl dev data plan\n  tfctl --yes prod app apply\n  tfctl stage platform drift-check\n  tfctl validate-all"
)]
pub struct Cli {
    /// Repository root (defaults to the nearest directory holding tfctl.yaml)
    #[arg(long, global = true, env = "TFCTL_ROOT", value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also set by any non-empty NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts and pass -auto-approve
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Debug logging on stderr (overridden by TFCTL_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub run: commands::run::RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Format every .tf file in the repository
    Fmt(commands::fmt::FmtArgs),

    /// Validate every module and root without touching remote state
    #[command(name = "validate-all")]
    ValidateAll,

    /// Regenerate module README tables with terraform-docs
    Docs,

    /// Remove .terraform directories and saved plans
    Clean,

    /// List every root with its directory and state key
    Roots(commands::roots::RootsArgs),

    /// Diagnose the local setup
    Doctor,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if arguments are invalid, the repository cannot be
    /// opened, or a subprocess cannot be spawned. Terraform's own non-zero
    /// exits are returned as the exit code, not as errors.
    pub async fn run(self, env: EnvOverrides) -> Result<ExitCode> {
        let Cli {
            root,
            json,
            quiet,
            no_color,
            yes,
            verbose: _,
            run,
            command,
        } = self;

        let app = AppContext::new(
            AppFlags {
                output: OutputFlags {
                    no_color,
                    quiet,
                    json,
                },
                behaviour: BehaviourFlags { yes, root },
            },
            env,
        );

        match command {
            None => commands::run::run(&app, &run).await,
            Some(Command::Fmt(args)) => commands::fmt::run(&app, &args).await,
            Some(Command::ValidateAll) => commands::validate_all::run(&app).await,
            Some(Command::Docs) => commands::docs::run(&app).await,
            Some(Command::Clean) => commands::clean::run(&app),
            Some(Command::Roots(args)) => commands::roots::run(&app, &args),
            Some(Command::Doctor) => commands::doctor::run(&app).await,
            Some(Command::Version) => commands::version::run(&app),
        }
    }
}

/// Exit code and JSON error code for an error that escaped a command.
///
/// Usage errors exit 2, like clap's own parse errors; everything else exits 1.
#[must_use]
pub fn error_disposition(err: &anyhow::Error) -> (u8, &'static str) {
    if err.downcast_ref::<UsageError>().is_some() {
        return (2, "usage");
    }
    match err.downcast_ref::<DispatchError>() {
        Some(DispatchError::NotConfirmed { .. }) => (1, "cancelled"),
        Some(DispatchError::MissingRoot { .. }) => (1, "missing_root"),
        None => (1, "error"),
    }
}
