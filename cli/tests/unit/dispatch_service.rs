//! Tests for the (environment, layer, action) dispatcher.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use tfctl_cli::application::services::dispatch::{
    self, DispatchFlags, Request, build_invocation, needs_confirmation,
};
use tfctl_cli::domain::{DispatchError, Outcome};
use tfctl_common::{Action, Environment, Layer, RootId};

use crate::helpers::{repo_with, sample_repo};
use crate::mocks::{FakeFs, MissingBinaryRunner, RecordingRunner, ScriptedConfirmer};

fn request(env: Environment, layer: Layer, action: Action) -> Request {
    Request {
        root: RootId::new(env, layer),
        action,
        reconfigure: false,
        check: false,
    }
}

fn fs_with_all_roots() -> FakeFs {
    let repo = sample_repo();
    RootId::all().fold(FakeFs::new(), |fs, root| fs.with_dir(repo.root_dir(root)))
}

fn interactive() -> DispatchFlags {
    DispatchFlags::default()
}

fn assume_yes() -> DispatchFlags {
    DispatchFlags {
        assume_yes: true,
        non_interactive: true,
    }
}

// ── Working directory and arguments ──────────────────────────────────────────

#[tokio::test]
async fn test_dev_data_plan_runs_in_its_root() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(false);
    let req = request(Environment::Dev, Layer::Data, Action::Plan);

    let report = dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    assert_eq!(runner.call_count(), 1);
    let call = runner.call(0);
    assert_eq!(call.program, "terraform");
    assert_eq!(call.cwd, repo.root.join("live/dev/data"));
    assert_eq!(call.args, vec!["plan", "-input=false", "-out=tfplan"]);
    assert_eq!(report.exit_code, 0);
    assert_eq!(report.outcome, Outcome::Succeeded);
    assert_eq!(report.directory, repo.root.join("live/dev/data"));
    assert_eq!(confirmer.asked(), 0);
}

#[tokio::test]
async fn test_init_carries_backend_config_for_the_root() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(false);
    let mut req = request(Environment::Stage, Layer::App, Action::Init);
    req.reconfigure = true;

    dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    let args = runner.call(0).args;
    assert_eq!(args[0], "init");
    assert!(args.contains(&"-backend-config=bucket=acme-tfstate-stage".to_string()));
    assert!(args.contains(&"-backend-config=key=stage/app/terraform.tfstate".to_string()));
    assert!(args.contains(&"-backend-config=dynamodb_table=acme-tf-locks".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("-reconfigure"));
}

#[tokio::test]
async fn test_credential_context_follows_environment() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Prod, Layer::Platform, Action::Plan);

    dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    let env = runner.call(0).env;
    let get = |k: &str| env.iter().find(|(name, _)| name == k).map(|(_, v)| v.as_str());
    assert_eq!(get("AWS_PROFILE"), Some("acme-prod"));
    assert_eq!(get("AWS_REGION"), Some("eu-west-1"));
    assert_eq!(get("TF_VAR_environment"), Some("prod"));
    assert_eq!(get("TF_VAR_layer"), Some("platform"));
    assert_eq!(get("TF_IN_AUTOMATION"), None);
}

#[test]
fn test_validate_runs_without_account_context() {
    let repo = sample_repo();
    let req = request(Environment::Prod, Layer::Platform, Action::Validate);
    let fs = FakeFs::new().with_dir(repo.root_dir(req.root));

    let inv = build_invocation(&fs, &repo, &req, &interactive()).expect("invocation");
    assert!(!inv.env.iter().any(|(k, _)| k.starts_with("AWS_")));
    assert!(inv.env.iter().any(|(k, v)| k == "TF_VAR_environment" && v == "prod"));
}

#[test]
fn test_var_file_passed_only_when_present() {
    let repo = sample_repo();
    let req = request(Environment::Dev, Layer::App, Action::Apply);
    let root_dir = repo.root_dir(req.root);

    let without = build_invocation(&FakeFs::new().with_dir(&root_dir), &repo, &req, &interactive())
        .expect("invocation");
    assert!(!without.args.iter().any(|a| a.starts_with("-var-file")));

    let fs = FakeFs::new().with_file(root_dir.join("terraform.tfvars"));
    let with = build_invocation(&fs, &repo, &req, &interactive()).expect("invocation");
    assert!(with.args.contains(&"-var-file=terraform.tfvars".to_string()));
}

#[test]
fn test_yes_adds_auto_approve_and_automation_env() {
    let repo = sample_repo();
    let req = request(Environment::Dev, Layer::App, Action::Apply);
    let fs = FakeFs::new().with_dir(repo.root_dir(req.root));

    let inv = build_invocation(&fs, &repo, &req, &assume_yes()).expect("invocation");
    assert!(inv.args.contains(&"-auto-approve".to_string()));
    assert!(inv.env.contains(&("TF_INPUT".to_string(), "0".to_string())));
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_root_runs_nothing() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Dev, Layer::Data, Action::Plan);

    let err = dispatch::dispatch(&runner, &FakeFs::new(), &confirmer, &repo, &req, &interactive())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DispatchError>(),
        Some(DispatchError::MissingRoot { .. })
    ));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_exit_code_is_passed_through_unchanged() {
    let repo = sample_repo();
    let confirmer = ScriptedConfirmer::answering(true);
    for code in [0, 1, 3, 127] {
        let runner = RecordingRunner::with_statuses(&[code]);
        let req = request(Environment::Dev, Layer::Platform, Action::Validate);
        let report = dispatch::dispatch(
            &runner,
            &fs_with_all_roots(),
            &confirmer,
            &repo,
            &req,
            &interactive(),
        )
        .await
        .expect("dispatch");
        assert_eq!(i32::from(report.exit_code), code);
    }
}

#[tokio::test]
async fn test_failed_plan_is_reported_not_retried() {
    let repo = sample_repo();
    let runner = RecordingRunner::with_statuses(&[1, 0]);
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Stage, Layer::Data, Action::Plan);

    let report = dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    assert_eq!(runner.call_count(), 1);
    assert_eq!(report.exit_code, 1);
    assert_eq!(report.outcome, Outcome::Failed);
}

#[tokio::test]
async fn test_drift_check_exit_two_is_drift() {
    let repo = sample_repo();
    let runner = RecordingRunner::with_statuses(&[2]);
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Prod, Layer::Data, Action::DriftCheck);

    let report = dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    assert_eq!(report.exit_code, 2);
    assert_eq!(report.outcome, Outcome::DriftDetected);
    assert!(runner.call(0).args.contains(&"-detailed-exitcode".to_string()));
}

#[tokio::test]
async fn test_spawn_failure_is_an_error() {
    let repo = sample_repo();
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Dev, Layer::Data, Action::Plan);

    let err = dispatch::dispatch(
        &MissingBinaryRunner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("failed to spawn terraform"));
}

// ── Confirmation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_prod_apply_declined_runs_nothing() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(false);
    let req = request(Environment::Prod, Layer::App, Action::Apply);

    let err = dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DispatchError>(),
        Some(DispatchError::NotConfirmed { .. })
    ));
    assert_eq!(confirmer.asked(), 1);
    assert!(confirmer.prompts.borrow()[0].contains("prod/app"));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_prod_apply_confirmed_runs_once() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(true);
    let req = request(Environment::Prod, Layer::App, Action::Apply);

    dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    assert_eq!(runner.call_count(), 1);
    // Terraform still asks its own question when not auto-approved.
    assert!(!runner.call(0).args.contains(&"-auto-approve".to_string()));
}

#[tokio::test]
async fn test_yes_skips_the_prompt() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(false);
    let req = request(Environment::Stage, Layer::Platform, Action::Destroy);

    dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &assume_yes(),
    )
    .await
    .expect("dispatch");

    assert_eq!(confirmer.asked(), 0);
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_dev_apply_needs_no_prompt() {
    let repo = sample_repo();
    let runner = RecordingRunner::new();
    let confirmer = ScriptedConfirmer::answering(false);
    let req = request(Environment::Dev, Layer::App, Action::Apply);

    dispatch::dispatch(
        &runner,
        &fs_with_all_roots(),
        &confirmer,
        &repo,
        &req,
        &interactive(),
    )
    .await
    .expect("dispatch");

    assert_eq!(confirmer.asked(), 0);
}

#[test]
fn test_every_destroy_needs_confirmation() {
    for env in Environment::ALL {
        for layer in Layer::ALL {
            assert!(needs_confirmation(RootId::new(env, layer), Action::Destroy));
        }
    }
}

// ── Configuration edge cases ─────────────────────────────────────────────────

#[test]
fn test_binary_override_is_used() {
    let repo = repo_with("terraform:\n  binary: /opt/tf/bin/terraform\n");
    let req = request(Environment::Dev, Layer::Data, Action::Validate);
    let fs = FakeFs::new().with_dir(repo.root_dir(req.root));

    let inv = build_invocation(&fs, &repo, &req, &interactive()).expect("invocation");
    assert_eq!(inv.program, "/opt/tf/bin/terraform");
    assert_eq!(inv.args, vec!["validate"]);
}

#[test]
fn test_environment_without_settings_uses_ambient_credentials() {
    let repo = repo_with("{}");
    let req = request(Environment::Stage, Layer::Data, Action::Plan);
    let fs = FakeFs::new().with_dir(repo.root_dir(req.root));

    let inv = build_invocation(&fs, &repo, &req, &interactive()).expect("invocation");
    assert!(!inv.env.iter().any(|(k, _)| k == "AWS_PROFILE"));
    assert!(inv.env.iter().any(|(k, v)| k == "TF_VAR_environment" && v == "stage"));
}
