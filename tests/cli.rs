// ABOUTME: End-to-end CLI tests using the compiled binary.
// ABOUTME: Covers help output, init scaffolding, and config discovery failures.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_all_subcommands() {
    Command::cargo_bin("convoy")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn init_creates_a_parseable_config() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("convoy")
        .unwrap()
        .current_dir(dir.path())
        .args(["init", "--environment", "staging"])
        .assert()
        .success();

    let config = convoy::config::Config::load(&dir.path().join("convoy.yml")).unwrap();
    assert!(config.environment("staging").is_some());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("convoy")
        .unwrap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    Command::cargo_bin("convoy")
        .unwrap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn push_without_config_exits_with_config_hint() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("convoy")
        .unwrap()
        .current_dir(dir.path())
        .args([
            "push",
            "--app",
            "shop",
            "--org",
            "retail",
            "--space",
            "production",
            "--environment",
            "prod",
            "--path",
            ".",
        ])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("convoy init"));
}

#[test]
fn push_against_unknown_environment_exits_with_environment_hint() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("convoy.yml"),
        r#"
environments:
  - name: sandbox
    foundations:
      - https://api.sandbox.example.com
"#,
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("artifact")).unwrap();

    Command::cargo_bin("convoy")
        .unwrap()
        .current_dir(dir.path())
        .args([
            "push",
            "--app",
            "shop",
            "--org",
            "retail",
            "--space",
            "production",
            "--environment",
            "prod",
            "--path",
            "artifact",
        ])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("environment"));
}
