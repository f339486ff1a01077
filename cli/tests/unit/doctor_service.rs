//! Tests for the doctor health checks.

use tfctl_cli::application::services::doctor::run_checks;
use tfctl_common::RootId;

use crate::helpers::{err_output, ok_output, repo_with, sample_repo};
use crate::mocks::{FakeFs, MissingBinaryRunner, RecordingRunner};

const VERSION_JSON: &[u8] = br#"{"terraform_version":"1.7.5","platform":"linux_amd64","provider_selections":{},"terraform_outdated":false}"#;

fn fs_with_all_roots() -> FakeFs {
    let repo = sample_repo();
    RootId::all().fold(FakeFs::new(), |fs, root| fs.with_dir(repo.root_dir(root)))
}

#[tokio::test]
async fn test_healthy_setup_has_no_issues() {
    let repo = sample_repo();
    let runner = RecordingRunner::with_outputs(vec![Ok(ok_output(VERSION_JSON))]);

    let report = run_checks(&runner, &fs_with_all_roots(), &repo).await;

    assert!(report.terraform.found);
    assert_eq!(report.terraform.version.as_deref(), Some("1.7.5"));
    assert_eq!(report.terraform.version_ok, Some(true));
    assert!(report.issues().is_empty(), "{:?}", report.issues());
    assert_eq!(runner.call(0).args, vec!["version", "-json"]);
}

#[tokio::test]
async fn test_missing_binary_is_an_issue_not_an_error() {
    let repo = sample_repo();

    let report = run_checks(&MissingBinaryRunner, &fs_with_all_roots(), &repo).await;

    assert!(!report.terraform.found);
    assert!(report.issues()[0].contains("terraform not found"));
}

#[tokio::test]
async fn test_old_terraform_is_flagged() {
    let repo = repo_with("terraform:\n  min_version: \"1.8.0\"\n");
    let runner = RecordingRunner::with_outputs(vec![Ok(ok_output(VERSION_JSON))]);

    let report = run_checks(&runner, &fs_with_all_roots(), &repo).await;

    assert_eq!(report.terraform.version_ok, Some(false));
    assert!(report.issues().iter().any(|i| i.contains("older than required 1.8.0")));
}

#[tokio::test]
async fn test_failing_version_probe_leaves_version_unknown() {
    let repo = sample_repo();
    let runner = RecordingRunner::with_outputs(vec![Ok(err_output(1, b"boom"))]);

    let report = run_checks(&runner, &fs_with_all_roots(), &repo).await;

    assert!(report.terraform.found);
    assert_eq!(report.terraform.version, None);
    assert_eq!(report.terraform.version_ok, None);
}

#[tokio::test]
async fn test_invalid_config_and_missing_roots_are_reported() {
    let repo = repo_with("environments:\n  dev:\n    account_id: \"12345\"\n");
    let runner = RecordingRunner::with_outputs(vec![Ok(ok_output(VERSION_JSON))]);

    let report = run_checks(&runner, &FakeFs::new(), &repo).await;

    assert!(report.config_error.is_some());
    assert_eq!(report.missing_roots.len(), 9);
    assert_eq!(report.issues().len(), 10);
}
