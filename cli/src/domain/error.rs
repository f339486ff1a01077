//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;
use tfctl_common::{Action, ParseError, RootId};

// ── Usage errors ──────────────────────────────────────────────────────────────

/// Invalid invocation, detected before any subprocess is spawned.
///
/// `main` maps this to exit code 2.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error(transparent)]
    InvalidName(#[from] ParseError),

    #[error("expected <environment> <layer> <action>, got {0} argument(s)")]
    MissingArguments(usize),

    #[error(
        "no tfctl.yaml found in {0} or any parent directory. Pass --root or set TFCTL_ROOT."
    )]
    RootNotFound(String),

    #[error("repository root {0} does not exist")]
    RootMissing(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors in `tfctl.yaml` content.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("terraform.binary and terraform.docs_binary must not be empty")]
    EmptyBinary,

    #[error("Invalid terraform.min_version '{0}': expected a semantic version such as 1.5.0")]
    InvalidMinVersion(String),

    #[error("Invalid account_id for {environment}: '{value}' (expected 12 digits)")]
    InvalidAccountId { environment: String, value: String },

    #[error("Invalid region for {field}: '{value}' (expected e.g. us-east-1)")]
    InvalidRegion { field: String, value: String },

    #[error("Invalid role_arn for {environment}: '{value}'")]
    InvalidRoleArn { environment: String, value: String },
}

// ── Dispatch errors ───────────────────────────────────────────────────────────

/// Errors raised by the wrapper itself rather than by Terraform.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Root directory for {root} not found: {path}")]
    MissingRoot { root: RootId, path: String },

    #[error("{action} on {root} cancelled.")]
    NotConfirmed { root: RootId, action: Action },
}
