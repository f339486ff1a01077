//! Domain types and validators for `tfctl.yaml`.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tfctl_common::Environment;

use crate::domain::error::ConfigError;

#[allow(clippy::expect_used)] // compile-time constant pattern
static REGION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-gov)?-[a-z]+-\d$").expect("valid regex"));

#[allow(clippy::expect_used)] // compile-time constant pattern
static ACCOUNT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").expect("valid regex"));

#[allow(clippy::expect_used)] // compile-time constant pattern
static ROLE_ARN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws[a-z-]*:iam::\d{12}:role/[\w+=,.@/-]+$").expect("valid regex")
});

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `<repo>/tfctl.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TfctlConfig {
    pub terraform: TerraformSettings,
    pub backend: BackendSettings,
    /// Credential context per environment. A missing entry means the
    /// ambient AWS environment of the caller is used unchanged.
    pub environments: BTreeMap<Environment, EnvironmentSettings>,
}

/// How Terraform itself is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformSettings {
    /// Program name or path.
    pub binary: String,
    /// Oldest Terraform accepted by `tfctl doctor`.
    pub min_version: Option<String>,
    /// Variables file passed with `-var-file` when present in the root.
    pub var_file: String,
    /// Generator used by `tfctl docs`.
    pub docs_binary: String,
}

impl Default for TerraformSettings {
    fn default() -> Self {
        Self {
            binary: "terraform".to_string(),
            min_version: None,
            var_file: "terraform.tfvars".to_string(),
            docs_binary: "terraform-docs".to_string(),
        }
    }
}

/// Remote-state backend settings passed to `terraform init`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackendSettings {
    /// Bucket name; `{environment}` is substituted per invocation.
    pub bucket: Option<String>,
    /// Lock table used by Terraform for state locking.
    pub lock_table: Option<String>,
    pub region: Option<String>,
}

/// Account and credential context of one environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub aws_profile: Option<String>,
    pub aws_region: Option<String>,
    pub account_id: Option<String>,
    /// Role assumed by the provider configuration, exported as
    /// `TF_VAR_assume_role_arn`.
    pub role_arn: Option<String>,
}

impl TfctlConfig {
    /// Settings for `env`, or empty settings when the file has none.
    #[must_use]
    pub fn environment(&self, env: Environment) -> EnvironmentSettings {
        self.environments.get(&env).cloned().unwrap_or_default()
    }

    /// Checks every field whose shape can be verified offline.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tf = &self.terraform;
        if tf.binary.trim().is_empty() || tf.docs_binary.trim().is_empty() {
            return Err(ConfigError::EmptyBinary);
        }
        if let Some(v) = &tf.min_version {
            semver::Version::parse(v).map_err(|_| ConfigError::InvalidMinVersion(v.clone()))?;
        }
        if let Some(region) = &self.backend.region {
            check_region("backend.region", region)?;
        }
        for (env, settings) in &self.environments {
            if let Some(id) = &settings.account_id
                && !ACCOUNT_ID_RE.is_match(id)
            {
                return Err(ConfigError::InvalidAccountId {
                    environment: env.to_string(),
                    value: id.clone(),
                });
            }
            if let Some(region) = &settings.aws_region {
                check_region(&format!("environments.{env}.aws_region"), region)?;
            }
            if let Some(arn) = &settings.role_arn
                && !ROLE_ARN_RE.is_match(arn)
            {
                return Err(ConfigError::InvalidRoleArn {
                    environment: env.to_string(),
                    value: arn.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_region(field: &str, value: &str) -> Result<(), ConfigError> {
    if REGION_RE.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRegion {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
