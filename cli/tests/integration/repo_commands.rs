//! End-to-end tests for the repository-wide subcommands.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::fixture::Fixture;

#[test]
fn test_fmt_runs_at_repository_root() {
    let fx = Fixture::new();
    fx.tfctl_in(&fx.root.join("live").join("dev"))
        .args(["fmt", "--check"])
        .assert()
        .success();
    let calls = fx.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].cwd, fx.root);
    assert_eq!(calls[0].args, "fmt -recursive -check -diff");
}

#[test]
fn test_fmt_check_failure_propagates() {
    let fx = Fixture::new();
    fx.tfctl()
        .args(["fmt", "--check"])
        .env("FAKE_TF_EXIT", "3")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Files need formatting"));
}

#[test]
fn test_validate_all_covers_modules_and_roots() {
    let fx = Fixture::new();
    fx.tfctl()
        .arg("validate-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("11 directories valid"));

    let calls = fx.calls();
    // 2 modules + 9 roots, init then validate each.
    assert_eq!(calls.len(), 22);
    assert_eq!(calls[0].cwd, fx.root.join("modules").join("eks"));
    assert_eq!(calls[0].args, "init -backend=false -input=false");
    assert_eq!(calls[1].args, "validate");
}

#[test]
fn test_validate_all_exits_with_first_failure() {
    let fx = Fixture::new();
    fx.tfctl()
        .arg("validate-all")
        .env("FAKE_TF_EXIT", "1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("11 of 11 directories failed validation"));
    // init fails everywhere, so validate never runs.
    assert_eq!(fx.calls().len(), 11);
}

#[test]
fn test_clean_removes_working_data_only() {
    let fx = Fixture::new();
    let root = fx.root_dir("dev", "data");
    std::fs::create_dir_all(root.join(".terraform").join("providers")).expect("mkdir");
    std::fs::write(root.join("tfplan"), "plan").expect("write plan");

    fx.tfctl()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("live/dev/data/.terraform"));

    assert!(!root.join(".terraform").exists());
    assert!(!root.join("tfplan").exists());
    assert!(root.join("main.tf").exists());
    assert!(fx.calls().is_empty());
}

#[test]
fn test_roots_json_lists_nine_roots() {
    let fx = Fixture::new();
    let output = fx
        .tfctl()
        .args(["roots", "--json"])
        .output()
        .expect("run tfctl");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let roots = value.as_array().expect("array");
    assert_eq!(roots.len(), 9);
    assert_eq!(roots[0]["environment"], "dev");
    assert_eq!(roots[0]["layer"], "platform");
    assert_eq!(roots[0]["state_key"], "dev/platform/terraform.tfstate");
    assert!(roots.iter().all(|r| r["exists"] == true));
}

#[test]
fn test_roots_filtered_by_environment() {
    let fx = Fixture::new();
    fx.tfctl()
        .args(["roots", "--environment", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod/app"))
        .stdout(predicate::str::contains("dev/app").not());
}

#[test]
fn test_doctor_healthy_fixture() {
    let fx = Fixture::new();
    fx.tfctl()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.7.5"))
        .stdout(predicate::str::contains("Everything looks good"));
}

#[test]
fn test_doctor_reports_missing_root() {
    let fx = Fixture::new();
    std::fs::remove_dir_all(fx.root_dir("prod", "app")).expect("remove root");
    fx.tfctl()
        .arg("doctor")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("live/prod/app missing"));
}
