use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{FileAssert, TestProject};

const VALID_APPS: &str = r#"
defaultNamespace: jx
apps:
- name: stable/velero
  namespace: velero
  phase: system
- name: jenkins-x/lighthouse
"#;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("helmplan")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_validate_valid_apps() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();

    let output = project.run_helmplan(&["validate"]).unwrap();
    output.assert_success().assert_stdout_contains("✓").assert_stdout_contains("Valid jx-apps.yml");
    output.assert_stdout_contains("system: 1 application(s)").assert_stdout_contains("apps: 1 application(s)");
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();

    let output = project.run_helmplan(&["validate", "--format", "json"]).unwrap();
    output.assert_success();

    let json: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["phases"]["system"], 1);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_invalid_phase_names_app() {
    let project = TestProject::new().unwrap();
    project.write_apps("apps:\n- name: stable/velero\n  phase: bootstrap\n").unwrap();

    let output = project.run_helmplan(&["validate"]).unwrap();
    output
        .assert_failure()
        .assert_stdout_contains("✗")
        .assert_stderr_contains("Invalid phase 'bootstrap' for application 'stable/velero'");
    assert_eq!(output.code, Some(1));
}

#[test]
fn test_validate_duplicate_release() {
    let project = TestProject::new().unwrap();
    project
        .write_apps("defaultNamespace: jx\napps:\n- name: stable/velero\n- name: mirror/velero\n")
        .unwrap();

    project
        .run_helmplan(&["validate"])
        .unwrap()
        .assert_failure()
        .assert_stdout_contains("Duplicate release 'velero' in phase 'apps'");
}

#[test]
fn test_validate_missing_apps_file() {
    let project = TestProject::new().unwrap();

    project
        .run_helmplan(&["validate"])
        .unwrap()
        .assert_failure()
        .assert_stdout_contains("No jx-apps.yml found")
        .assert_stderr_contains("suggestion:");
}

#[test]
fn test_validate_with_dir_flag() {
    let project = TestProject::new().unwrap();
    project.write_file("nested/jx-apps.yml", VALID_APPS).unwrap();

    let nested = project.env_path().join("nested");
    project
        .run_helmplan(&["validate", "--dir", nested.to_str().unwrap()])
        .unwrap()
        .assert_success();
}

#[test]
fn test_generate_missing_apps_file() {
    let project = TestProject::new().unwrap();

    project
        .run_helmplan(&["generate"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("No jx-apps.yml found");
}

#[test]
fn test_generate_without_helm_fails_cleanly() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();

    project
        .run_helmplan_with_env(&["generate"], &[("PATH", "")])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("helm is not installed");

    FileAssert::not_exists(project.env_path().join("apps/helmfile.yaml"));
    FileAssert::not_exists(project.env_path().join("system/helmfile.yaml"));
}

#[test]
fn test_generate_rejects_invalid_settings() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();
    project.write_file("settings.toml", "default_chart_repository = \"not a url\"\n").unwrap();

    project
        .run_helmplan(&["--config", "settings.toml", "generate"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("default_chart_repository");
}

#[test]
fn test_generate_rejects_path_like_default_namespace() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();
    project.write_file("settings.toml", "default_namespace = \"../escaped\"\n").unwrap();

    project
        .run_helmplan(&["--config", "settings.toml", "generate"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Invalid namespace '../escaped'");
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let project = TestProject::new().unwrap();
    project.write_apps(VALID_APPS).unwrap();

    let output = project.run_helmplan(&["--verbose", "--quiet", "validate"]).unwrap();
    output.assert_failure();
    assert_eq!(output.code, Some(2));
}
