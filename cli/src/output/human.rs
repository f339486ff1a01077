//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;
use tfctl_common::RootId;

use crate::application::services::dispatch::Report;
use crate::application::services::doctor::DoctorReport;
use crate::application::services::repo_tasks::{RootStatus, ValidateResult};
use crate::domain::Outcome;
use crate::output::OutputContext;

/// Renders service results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the wrapper version. Printed even in quiet mode.
    pub fn render_version(&self, version: &str) {
        println!("tfctl {version}");
    }

    /// Render the outcome of one dispatched action.
    ///
    /// Failures go to stderr and are shown even in quiet mode.
    pub fn render_report(&self, report: &Report) {
        let root = RootId::new(report.environment, report.layer);
        match report.outcome {
            Outcome::Succeeded => self.ctx.success(&format!(
                "terraform {} succeeded for {root} ({})",
                report.action,
                format_duration(report.duration_ms)
            )),
            Outcome::DriftDetected => self.ctx.warn(&format!(
                "drift detected in {root}: live infrastructure differs from code"
            )),
            Outcome::Failed => self.ctx.error(&failure_line(report)),
        }
    }

    /// Render every root with its state key, marking missing directories.
    pub fn render_roots(&self, roots: &[RootStatus]) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header("Roots (apply order):");
        println!();
        for status in roots {
            let name = status.root.to_string();
            let name = if status.root.environment.is_protected() {
                format!("{name:<14}").style(self.ctx.styles.protected).to_string()
            } else {
                format!("{name:<14}")
            };
            let marker = if status.exists {
                String::new()
            } else {
                format!("  {}", "(missing)".style(self.ctx.styles.error))
            };
            println!(
                "  {name} {}{marker}",
                status.state_key.style(self.ctx.styles.dim)
            );
        }
    }

    /// Render `validate-all` results: one line per failure plus a summary.
    pub fn render_validation(&self, results: &[ValidateResult]) {
        let failed: Vec<_> = results.iter().filter(|r| r.exit_code != 0).collect();
        for result in &failed {
            self.ctx.error(&format!(
                "{} failed validation (exit {})",
                result.directory, result.exit_code
            ));
            if let Some(diag) = &result.diagnostics {
                for line in diag.lines() {
                    eprintln!("      {line}");
                }
            }
        }
        if failed.is_empty() {
            self.ctx
                .success(&format!("{} directories valid", results.len()));
        } else {
            self.ctx.warn(&format!(
                "{} of {} directories failed validation",
                failed.len(),
                results.len()
            ));
        }
    }

    /// Render the paths removed by `clean`.
    pub fn render_clean(&self, removed: &[String]) {
        if removed.is_empty() {
            self.ctx.info("Nothing to clean");
            return;
        }
        for path in removed {
            self.ctx.kv("removed", path);
        }
        self.ctx.success(&format!("Removed {} paths", removed.len()));
    }

    /// Render the result of `tfctl fmt`.
    pub fn render_fmt(&self, check: bool, exit_code: u8) {
        match (exit_code, check) {
            (0, _) => self.ctx.success("Formatting clean"),
            (_, true) => self.ctx.error("Files need formatting. Run: tfctl fmt"),
            (code, false) => self.ctx.error(&format!("terraform fmt failed (exit {code})")),
        }
    }

    /// Render the result of `tfctl docs`.
    pub fn render_docs(&self, exit_code: u8) {
        if exit_code == 0 {
            self.ctx.success("Module documentation up to date");
        } else {
            self.ctx
                .error(&format!("Documentation generation failed (exit {exit_code})"));
        }
    }

    /// Render doctor health check results.
    pub fn render_doctor(&self, report: &DoctorReport) {
        let tf = &report.terraform;

        println!();
        println!("  {}", "tfctl Health Check".style(self.ctx.styles.header));
        println!();

        println!("  Terraform:");
        if tf.found {
            let version = tf.version.as_deref().unwrap_or("unknown");
            match tf.min_version.as_deref() {
                Some(min) => self.print_check(
                    tf.version_ok != Some(false),
                    &format!("{} {version} (need \u{2265} {min})", tf.binary),
                ),
                None => self.print_check(true, &format!("{} {version}", tf.binary)),
            }
        } else {
            self.print_check(false, &format!("{} not found", tf.binary));
            println!("      Install: https://developer.hashicorp.com/terraform/install");
        }
        println!();

        println!("  Configuration:");
        match &report.config_error {
            None => self.print_check(true, "tfctl.yaml valid"),
            Some(err) => self.print_check(false, err),
        }
        println!();

        println!("  Roots:");
        if report.missing_roots.is_empty() {
            self.print_check(true, "all 9 root directories present");
        } else {
            for dir in &report.missing_roots {
                self.print_check(false, &format!("{dir} missing"));
            }
        }

        println!();
        let issues = report.issues();
        if issues.is_empty() {
            println!(
                "  {} Everything looks good!",
                "\u{2713}".style(self.ctx.styles.success)
            );
        } else {
            println!(
                "  {} Found {} issues.",
                "\u{2717}".style(self.ctx.styles.error),
                issues.len(),
            );
        }
        println!();
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }
}

/// Diagnostic line printed when Terraform exits non-zero.
#[must_use]
pub fn failure_line(report: &Report) -> String {
    format!(
        "terraform {} failed for {}/{} (exit {})",
        report.action, report.environment, report.layer, report.exit_code
    )
}

/// `1m 05s` style duration; sub-minute runs show seconds with one decimal.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{secs}.{}s", (ms % 1000) / 100)
    }
}
