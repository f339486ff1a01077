//! Application service: `tfctl doctor` health checks.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use serde::{Deserialize, Serialize};
use tfctl_common::RootId;

use crate::application::ports::{CommandRunner, RepoFs};
use crate::domain::{Invocation, Repository};

/// Aggregated results of all checks.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub terraform: TerraformCheck,
    /// `None` when `tfctl.yaml` is valid, else the validation error.
    pub config_error: Option<String>,
    pub missing_roots: Vec<String>,
}

/// Terraform binary availability and version.
#[derive(Debug, Clone, Serialize)]
pub struct TerraformCheck {
    pub binary: String,
    pub found: bool,
    pub version: Option<String>,
    pub min_version: Option<String>,
    /// `None` when either version is unknown.
    pub version_ok: Option<bool>,
}

/// `terraform version -json` payload (only the field we read).
#[derive(Debug, Deserialize)]
struct VersionJson {
    terraform_version: String,
}

impl DoctorReport {
    /// Human-readable list of problems; empty when healthy.
    #[must_use]
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let tf = &self.terraform;
        if !tf.found {
            issues.push(format!("{} not found on PATH", tf.binary));
        }
        if tf.version_ok == Some(false) {
            issues.push(format!(
                "terraform {} is older than required {}",
                tf.version.as_deref().unwrap_or("?"),
                tf.min_version.as_deref().unwrap_or("?"),
            ));
        }
        if let Some(err) = &self.config_error {
            issues.push(format!("tfctl.yaml: {err}"));
        }
        issues.extend(
            self.missing_roots
                .iter()
                .map(|dir| format!("missing root directory {dir}")),
        );
        issues
    }
}

/// Run every check. Never fails: each problem is recorded in the report.
pub async fn run_checks(
    runner: &impl CommandRunner,
    fs: &impl RepoFs,
    repo: &Repository,
) -> DoctorReport {
    let terraform = check_terraform(runner, repo).await;
    let config_error = repo.config.validate().err().map(|e| e.to_string());
    let missing_roots = RootId::all()
        .map(|root| repo.root_dir(root))
        .filter(|dir| !fs.dir_exists(dir))
        .map(|dir| repo.display_path(&dir))
        .collect();

    DoctorReport {
        terraform,
        config_error,
        missing_roots,
    }
}

async fn check_terraform(runner: &impl CommandRunner, repo: &Repository) -> TerraformCheck {
    let settings = &repo.config.terraform;
    let inv =
        Invocation::new(settings.binary.clone(), repo.root.clone()).args(["version", "-json"]);

    let version = match runner.run(&inv).await {
        Ok(output) if output.status.success() => parse_version(&output.stdout),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "terraform version probe failed");
            return TerraformCheck {
                binary: settings.binary.clone(),
                found: false,
                version: None,
                min_version: settings.min_version.clone(),
                version_ok: None,
            };
        }
    };

    let version_ok = version
        .as_deref()
        .zip(settings.min_version.as_deref())
        .and_then(|(have, need)| meets_minimum(have, need));

    TerraformCheck {
        binary: settings.binary.clone(),
        found: true,
        version,
        min_version: settings.min_version.clone(),
        version_ok,
    }
}

fn parse_version(stdout: &[u8]) -> Option<String> {
    serde_json::from_slice::<VersionJson>(stdout)
        .ok()
        .map(|v| v.terraform_version)
}

/// `have >= need`, or `None` if either side is not semver.
#[must_use]
pub fn meets_minimum(have: &str, need: &str) -> Option<bool> {
    let have = semver::Version::parse(have.trim_start_matches('v')).ok()?;
    let need = semver::Version::parse(need.trim_start_matches('v')).ok()?;
    Some(have >= need)
}
