//! Tests for error handling and CLI flags.

use crate::skip_without_git;
use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    skip_without_git!();
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    for command in ["init", "add", "remove", "hide", "reveal", "clean", "status", "keys"] {
        assert!(out.contains(command), "help should mention {}", command);
    }
}

#[test]
fn test_unknown_command_fails() {
    skip_without_git!();
    let t = Test::new();

    t.cmd()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_add_requires_files() {
    skip_without_git!();
    let t = Test::init();

    let output = t.run(&["add"]);
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    skip_without_git!();
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("git-private "));
}

#[test]
fn test_completions_bash_outputs_script() {
    skip_without_git!();
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_git-private") || out.contains("complete"));
}

#[test]
fn test_completions_zsh() {
    skip_without_git!();
    let t = Test::new();

    let output = t.cmd().args(["completions", "zsh"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "#compdef");
}

#[test]
fn test_error_shows_hint() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    t.write("secrets.env", "A=2\n");

    let output = t.clean();
    assert_failure(&output);
    assert_stderr_contains(&output, "git-private status");
}

#[test]
fn test_errors_exit_with_status_one() {
    skip_without_git!();
    let t = Test::init();

    let output = t.run(&["reveal", "nope.env"]);
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "not tracked");
}

#[test]
fn test_multiple_private_keys_in_key_file() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    let path = t.key_path("two");
    let contents = format!(
        "{}\n{}\n",
        KeyPair::generate().secret,
        KeyPair::generate().secret
    );
    std::fs::write(&path, contents).unwrap();

    let output = t.run_as(&path, &["hide"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "multiple keys");
}
