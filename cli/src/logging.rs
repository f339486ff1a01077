//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for `--json` output and for
//! Terraform's own plan output.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `TFCTL_LOG` nor `-v` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used with `-v/--verbose`.
pub const VERBOSE_FILTER: &str = "debug";

/// Pick the filter directive: `TFCTL_LOG` wins, then `--verbose`.
#[must_use]
pub fn filter_directive(env_filter: Option<&str>, verbose: bool) -> String {
    match env_filter {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(env_filter: Option<&str>, verbose: bool, ansi: bool) {
    let directive = filter_directive(env_filter, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .try_init();
}
