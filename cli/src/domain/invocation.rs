//! Translation of an (environment, layer, action) request into a Terraform
//! command line.
//!
//! Pure functions only: callers decide which directory exists and whether a
//! variables file is present, this module only shapes arguments.

use std::path::PathBuf;

use serde::Serialize;
use tfctl_common::state_layout::PLAN_FILE;
use tfctl_common::{Action, RootId, bucket_for};

use crate::domain::config::{BackendSettings, EnvironmentSettings};

/// One fully-resolved subprocess call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory of the child. The wrapper's own directory is never changed.
    pub cwd: PathBuf,
    /// Variables added to the inherited environment of the child.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn envs(mut self, env: Vec<(String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    /// `program arg1 arg2 …` for logs and diagnostics.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Per-invocation switches that shape the argument vector.
#[derive(Debug, Clone, Default)]
pub struct ActionOptions {
    /// Pass `-auto-approve` to apply/destroy.
    pub auto_approve: bool,
    /// Pass `-reconfigure` to init.
    pub reconfigure: bool,
    /// Run `fmt` in check mode instead of rewriting files.
    pub check: bool,
    /// Variables file name, set only when the file exists in the root.
    pub var_file: Option<String>,
    /// CI or `--yes`: export `TF_IN_AUTOMATION` and `TF_INPUT=0`.
    pub non_interactive: bool,
}

/// Terraform arguments for `action` against `root`.
#[must_use]
pub fn terraform_args(
    action: Action,
    root: RootId,
    backend: &BackendSettings,
    env: &EnvironmentSettings,
    opts: &ActionOptions,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let var_file = opts.var_file.as_ref().map(|f| format!("-var-file={f}"));

    match action {
        Action::Init => {
            args.extend(["init".into(), "-input=false".into()]);
            args.extend(backend_config_args(root, backend, env));
            if opts.reconfigure {
                args.push("-reconfigure".into());
            }
        }
        Action::Plan => {
            args.extend(["plan".into(), "-input=false".into()]);
            args.extend(var_file);
            args.push(format!("-out={PLAN_FILE}"));
        }
        Action::Apply | Action::Destroy => {
            args.extend([action_verb(action).into(), "-input=false".into()]);
            args.extend(var_file);
            if opts.auto_approve {
                args.push("-auto-approve".into());
            }
        }
        Action::DriftCheck => {
            args.extend([
                "plan".into(),
                "-input=false".into(),
                "-lock=false".into(),
                "-detailed-exitcode".into(),
            ]);
            args.extend(var_file);
        }
        Action::Format => {
            args.extend(["fmt".into(), "-recursive".into()]);
            if opts.check {
                args.extend(["-check".into(), "-diff".into()]);
            }
        }
        Action::Validate => args.push("validate".into()),
    }
    args
}

fn action_verb(action: Action) -> &'static str {
    match action {
        Action::Destroy => "destroy",
        _ => "apply",
    }
}

/// `-backend-config` pairs for the S3 backend of `root`. Keys without a
/// configured value are left to the root's own backend block.
#[must_use]
pub fn backend_config_args(
    root: RootId,
    backend: &BackendSettings,
    env: &EnvironmentSettings,
) -> Vec<String> {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if let Some(bucket) = &backend.bucket {
        pairs.push(("bucket", bucket_for(bucket, root.environment)));
    }
    pairs.push(("key", root.state_key()));
    if let Some(region) = backend.region.as_ref().or(env.aws_region.as_ref()) {
        pairs.push(("region", region.clone()));
    }
    if let Some(table) = &backend.lock_table {
        pairs.push(("dynamodb_table", table.clone()));
    }
    if let Some(profile) = &env.aws_profile {
        pairs.push(("profile", profile.clone()));
    }
    pairs
        .into_iter()
        .map(|(k, v)| format!("-backend-config={k}={v}"))
        .collect()
}

/// Environment variables that scope the child to the root's account.
///
/// The AWS context is exported only for actions that reach the backend;
/// `format` and `validate` run offline. Credentials themselves are never read
/// here; a missing profile surfaces as Terraform's own authentication error.
#[must_use]
pub fn credential_env(
    action: Action,
    root: RootId,
    env: &EnvironmentSettings,
    non_interactive: bool,
) -> Vec<(String, String)> {
    let mut vars = vec![
        ("TF_VAR_environment".to_string(), root.environment.to_string()),
        ("TF_VAR_layer".to_string(), root.layer.to_string()),
    ];
    if action.needs_backend() {
        if let Some(profile) = &env.aws_profile {
            vars.push(("AWS_PROFILE".to_string(), profile.clone()));
        }
        if let Some(region) = &env.aws_region {
            vars.push(("AWS_REGION".to_string(), region.clone()));
            vars.push(("AWS_DEFAULT_REGION".to_string(), region.clone()));
        }
        if let Some(account) = &env.account_id {
            vars.push(("TF_VAR_account_id".to_string(), account.clone()));
        }
        if let Some(arn) = &env.role_arn {
            vars.push(("TF_VAR_assume_role_arn".to_string(), arn.clone()));
        }
    }
    if non_interactive {
        vars.push(("TF_IN_AUTOMATION".to_string(), "1".to_string()));
        vars.push(("TF_INPUT".to_string(), "0".to_string()));
    }
    vars
}

// ── Exit status ───────────────────────────────────────────────────────────────

/// Wrapper exit code for a finished child: the child's own code, or
/// `128 + signal` when it was killed by a signal.
#[must_use]
pub fn exit_code(code: Option<i32>, signal: Option<i32>) -> u8 {
    match (code, signal) {
        (Some(c), _) => u8::try_from(c).unwrap_or(1),
        (None, Some(sig)) => u8::try_from(128 + sig).unwrap_or(255),
        (None, None) => 1,
    }
}

/// How a finished action is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    /// `plan -detailed-exitcode` exited 2: the live infrastructure differs.
    DriftDetected,
    Failed,
}

#[must_use]
pub fn classify(action: Action, code: u8) -> Outcome {
    match (action, code) {
        (_, 0) => Outcome::Succeeded,
        (Action::DriftCheck, 2) => Outcome::DriftDetected,
        _ => Outcome::Failed,
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
