//! Repository and remote-state layout shared by the wrapper and its tests.

use crate::types::{Environment, Layer};

/// Directory holding one root configuration per (environment, layer).
/// Layout: live/{environment}/{layer}
pub const LIVE_DIR: &str = "live";

/// Directory holding the reusable module library.
/// Layout: modules/{name}
pub const MODULES_DIR: &str = "modules";

/// Repository configuration file, also the marker used to find the repository root.
pub const CONFIG_FILE: &str = "tfctl.yaml";

/// Plan file written by `plan` and removed by `clean`.
pub const PLAN_FILE: &str = "tfplan";

/// Terraform's per-directory working data.
pub const TF_DATA_DIR: &str = ".terraform";

/// Placeholder substituted in `backend.bucket`.
pub const ENVIRONMENT_PLACEHOLDER: &str = "{environment}";

/// Remote state object key.
/// Format: {environment}/{layer}/terraform.tfstate
#[must_use]
pub fn state_key(environment: Environment, layer: Layer) -> String {
    format!("{environment}/{layer}/terraform.tfstate")
}

/// Expand the `{environment}` placeholder in a bucket template.
#[must_use]
pub fn bucket_for(template: &str, environment: Environment) -> String {
    template.replace(ENVIRONMENT_PLACEHOLDER, environment.as_str())
}
