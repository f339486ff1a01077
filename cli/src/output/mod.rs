//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::ffi::OsStr;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use reporter::{Reporter, SilentReporter, SpinnerReporter, TerminalReporter};
pub use styles::Styles;

use crate::application::services::dispatch::Report;
use crate::application::services::doctor::DoctorReport;
use crate::application::services::repo_tasks::{RootStatus, ValidateResult};

/// Whether a `NO_COLOR` value asks for plain output: any non-empty value does.
#[must_use]
pub fn no_color_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let no_color = no_color || no_color_requested(std::env::var_os("NO_COLOR").as_deref());
        let use_colors = !no_color && is_tty;

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Dispatches each result type to the human or JSON form.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json,
}

impl Renderer<'_> {
    /// Render the outcome of one dispatched action.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_report(&self, report: &Report) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_report(report);
                Ok(())
            }
            Renderer::Json => json::print(report),
        }
    }

    /// Render the `roots` table.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_roots(&self, roots: &[RootStatus]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_roots(roots);
                Ok(())
            }
            Renderer::Json => json::print(roots),
        }
    }

    /// Render `validate-all` results.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_validation(&self, results: &[ValidateResult]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_validation(results);
                Ok(())
            }
            Renderer::Json => json::print(results),
        }
    }

    /// Render the list of removed paths from `clean`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_clean(&self, removed: &[String]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_clean(removed);
                Ok(())
            }
            Renderer::Json => json::print(&serde_json::json!({ "removed": removed })),
        }
    }

    /// Render doctor results.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_doctor(&self, report: &DoctorReport) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_doctor(report);
                Ok(())
            }
            Renderer::Json => json::print(&serde_json::json!({
                "checks": report,
                "issues": report.issues(),
            })),
        }
    }

    /// Render the result of `tfctl fmt`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_fmt(&self, check: bool, exit_code: u8) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_fmt(check, exit_code);
                Ok(())
            }
            Renderer::Json => json::print(&serde_json::json!({
                "check": check,
                "exit_code": exit_code,
            })),
        }
    }

    /// Render the result of `tfctl docs`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_docs(&self, exit_code: u8) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_docs(exit_code);
                Ok(())
            }
            Renderer::Json => json::print(&serde_json::json!({ "exit_code": exit_code })),
        }
    }

    /// Render the wrapper version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Renderer::Json => json::print(&serde_json::json!({ "version": version })),
        }
    }
}
