//! Tests for `git-private clean`.

use crate::skip_without_git;
use crate::support::*;

#[test]
fn test_clean_removes_hidden_plaintexts() {
    skip_without_git!();
    let t = Test::with_files(&[("a.env", "A=1\n"), ("b.env", "B=2\n")]);
    assert_success(&t.hide());

    let output = t.clean();
    assert_success(&output);
    assert_stdout_contains(&output, "2 files cleaned");
    assert!(!t.exists("a.env"));
    assert!(!t.exists("b.env"));
    assert!(t.exists("a.env.private"));
}

#[test]
fn test_clean_refuses_modified_file() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    t.write("secrets.env", "A=2\n");

    let output = t.clean();
    assert_failure(&output);
    assert_stderr_contains(&output, "local modifications");
    assert_eq!(t.read("secrets.env"), "A=2\n");
}

#[test]
fn test_clean_refuses_never_hidden_file() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);

    let output = t.clean();
    assert_failure(&output);
    assert!(t.exists("secrets.env"));
}

#[test]
fn test_clean_force_removes_anything() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);

    let output = t.run(&["clean", "--force"]);
    assert_success(&output);
    assert!(!t.exists("secrets.env"));
    assert_status(&t, "secrets.env", "not-hidden");
}

#[test]
fn test_clean_already_clean() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide_clean());

    let output = t.clean();
    assert_success(&output);
    assert_stdout_contains(&output, "already clean");
}
