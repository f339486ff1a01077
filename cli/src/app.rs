//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once from the top-level flags. Adding a
//! cross-cutting concern means one field change here and no command
//! signature changes.

use std::path::PathBuf;

use anyhow::Result;
use indicatif::ProgressBar;

use crate::application::ports::Confirmer;
use crate::domain::Repository;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{self, EnvOverrides};
use crate::infra::fs::LocalFs;
use crate::output::{
    HumanRenderer, OutputContext, Renderer, Reporter, SilentReporter, SpinnerReporter,
    TerminalReporter, progress,
};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip confirmation prompts and pass `-auto-approve`.
    pub yes: bool,
    /// Explicit repository root (`--root` / `TFCTL_ROOT`).
    pub root: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Process runner for Terraform and terraform-docs.
    pub runner: TokioCommandRunner,
    /// Filesystem view of the repository.
    pub fs: LocalFs,
    /// `TFCTL_*` overrides read at startup.
    pub env: EnvOverrides,
    /// Explicit repository root, if one was given.
    pub root: Option<PathBuf>,
    /// `--yes` was passed.
    pub assume_yes: bool,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` environment
    /// variable is present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags, env: EnvOverrides) -> Self {
        let ci_env = std::env::var_os("CI").is_some();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            runner: TokioCommandRunner::default(),
            fs: LocalFs,
            env,
            root: flags.behaviour.root,
            assume_yes: flags.behaviour.yes,
            non_interactive,
        }
    }

    /// Resolve the repository root and load its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no root can be resolved or a config file is invalid.
    pub fn repository(&self) -> Result<Repository> {
        config::open_repository(self.root.as_deref(), &self.env)
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json,
        }
    }

    /// Spinner for a single long step; `None` in JSON mode or off a TTY.
    #[must_use]
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        (self.mode == OutputMode::Human && self.output.show_progress())
            .then(|| progress::spinner(message))
    }

    /// Progress reporter for multi-directory tasks: a spinner on a TTY,
    /// plain lines otherwise, nothing in JSON mode.
    #[must_use]
    pub fn terminal_reporter(&self) -> Reporter<'_> {
        match self.mode {
            OutputMode::Json => Reporter::Silent(SilentReporter),
            OutputMode::Human if self.output.show_progress() => {
                Reporter::Spinner(SpinnerReporter::new(&self.output))
            }
            OutputMode::Human => Reporter::Terminal(TerminalReporter::new(&self.output)),
        }
    }
}

impl Confirmer for AppContext {
    /// When `non_interactive` is `true` (CI or `--yes`), returns `default`
    /// immediately without prompting.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
