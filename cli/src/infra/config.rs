//! Configuration loading: repository root discovery, `tfctl.yaml`, the
//! per-user overrides file, and `TFCTL_*` environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tfctl_common::state_layout::CONFIG_FILE;

use crate::domain::{Repository, TfctlConfig, UsageError};

/// Overrides read from `TFCTL_*` environment variables via `envy`.
///
/// `TFCTL_ROOT` is handled by clap (`--root`), not here.
#[derive(Debug, Default, Deserialize)]
pub struct EnvOverrides {
    /// `TFCTL_TERRAFORM`: Terraform program to run.
    pub terraform: Option<String>,
    /// `TFCTL_LOG`: tracing filter directive.
    pub log: Option<String>,
    /// `TFCTL_AMBIENT_CREDENTIALS=true`: drop configured AWS profiles and use
    /// whatever credentials the caller's environment already holds (CI OIDC).
    /// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`.
    #[serde(default, deserialize_with = "switch")]
    pub ambient_credentials: Option<bool>,
}

fn switch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "" | "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(D::Error::custom(format!(
            "expected true/false or 1/0, got '{other}'"
        ))),
    }
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `TFCTL_*` variable cannot be deserialized.
    pub fn from_env() -> Result<Self> {
        envy::prefixed("TFCTL_")
            .from_env()
            .context("failed to read TFCTL_* environment variables")
    }
}

/// Machine-local settings in `~/.tfctl/config.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub terraform: UserTerraform,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserTerraform {
    pub binary: Option<String>,
}

/// Path of the per-user config file.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".tfctl").join("config.yaml"))
}

/// Nearest ancestor of `start` (inclusive) holding `tfctl.yaml`.
#[must_use]
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the repository root to an absolute, canonical path.
///
/// `explicit` (from `--root` / `TFCTL_ROOT`) wins; otherwise the search
/// starts at `cwd`.
///
/// # Errors
///
/// Returns [`UsageError::RootMissing`] if `explicit` does not exist and
/// [`UsageError::RootNotFound`] if no `tfctl.yaml` is found above `cwd`.
pub fn resolve_root(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            if !path.is_dir() {
                return Err(UsageError::RootMissing(path.display().to_string()).into());
            }
            path
        }
        None => find_repo_root(cwd)
            .ok_or_else(|| UsageError::RootNotFound(cwd.display().to_string()))?,
    };
    root.canonicalize()
        .with_context(|| format!("cannot resolve {}", root.display()))
}

/// Load `<root>/tfctl.yaml`, or defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_repo_config(root: &Path) -> Result<TfctlConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(TfctlConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

/// Load the per-user file at `path`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

/// Layer the Terraform binary: `TFCTL_TERRAFORM`, then the user file, then
/// the repository file. Ambient credentials clear every configured profile.
pub fn apply_overrides(config: &mut TfctlConfig, user: &UserConfig, env: &EnvOverrides) {
    if let Some(bin) = env.terraform.as_ref().or(user.terraform.binary.as_ref()) {
        config.terraform.binary.clone_from(bin);
    }
    if env.ambient_credentials == Some(true) {
        for settings in config.environments.values_mut() {
            settings.aws_profile = None;
        }
    }
}

/// Resolve the root and load every configuration layer.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or a config file is invalid.
pub fn open_repository(explicit_root: Option<&Path>, env: &EnvOverrides) -> Result<Repository> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let root = resolve_root(explicit_root, &cwd)?;
    let mut config = load_repo_config(&root)?;
    let user = match user_config_path() {
        Ok(path) => load_user_config(&path)?,
        Err(_) => UserConfig::default(),
    };
    apply_overrides(&mut config, &user, env);
    tracing::debug!(
        root = %root.display(),
        terraform = %config.terraform.binary,
        "repository opened"
    );
    Ok(Repository::new(root, config))
}
