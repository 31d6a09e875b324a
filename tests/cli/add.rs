//! Tests for `git-private add` and `git-private remove`.

use crate::skip_without_git;
use crate::support::*;

#[test]
fn test_add_tracks_and_ignores_file() {
    skip_without_git!();
    let t = Test::init();
    t.write("secrets.env", "API_KEY=1\n");

    let output = t.add(&["secrets.env"]);
    assert_success(&output);
    assert_stdout_contains(&output, "tracking secrets.env");

    assert!(t.gitignore().lines().any(|l| l == "/secrets.env"));
    assert!(t.git_ignores("secrets.env"));
    assert_status(&t, "secrets.env", "not-hidden");
}

#[test]
fn test_add_nested_path_from_subdirectory() {
    skip_without_git!();
    let t = Test::init();
    t.write("config/credentials.json", "{}\n");

    let output = t
        .cmd()
        .current_dir(t.path("config"))
        .args(["add", "credentials.json"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_status(&t, "config/credentials.json", "not-hidden");
    assert!(t.gitignore().contains("/config/credentials.json"));
}

#[test]
fn test_add_file_with_glob_characters_is_ignored() {
    skip_without_git!();
    let t = Test::init();
    t.write("db[prod].env", "PASSWORD=1\n");
    t.write("dbp.env", "unrelated\n");

    let output = t.add(&["db[prod].env"]);
    assert_success(&output);

    assert!(t.gitignore().lines().any(|l| l == "/db\\[prod\\].env"));
    assert!(t.git_ignores("db[prod].env"));
    assert!(!t.git_ignores("dbp.env"));
}

#[test]
fn test_add_fails_when_git_still_sees_plaintext() {
    skip_without_git!();
    let t = Test::init();
    t.write("config/app.env", "A=1\n");
    t.write("config/.gitignore", "!app.env\n");

    let output = t.add(&["config/app.env"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "does not ignore 'config/app.env'");

    assert_eq!(t.status_json()["count"], 0);
    assert!(!t.gitignore().contains("/config/app.env"));
}

#[test]
fn test_add_twice_is_noop() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);

    let output = t.add(&["secrets.env"]);
    assert_success(&output);
    assert_stdout_contains(&output, "already tracked");

    assert_eq!(t.status_json()["count"], 1);
    let lines = t.gitignore().lines().filter(|l| *l == "/secrets.env").count();
    assert_eq!(lines, 1);
}

#[test]
fn test_add_missing_file_fails() {
    skip_without_git!();
    let t = Test::init();

    let output = t.add(&["nope.env"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no such file");
}

#[test]
fn test_add_private_file_fails() {
    skip_without_git!();
    let t = Test::init();
    t.write("secrets.env.private", "x");

    let output = t.add(&["secrets.env.private"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "encrypted version");
}

#[test]
fn test_add_validates_every_path_before_tracking() {
    skip_without_git!();
    let t = Test::init();
    t.write("a.env", "A=1\n");

    let output = t.add(&["a.env", "missing.env"]);
    assert_failure(&output);
    assert_eq!(t.status_json()["count"], 0);
}

#[test]
fn test_add_outside_repository_fails() {
    skip_without_git!();
    let t = Test::init();
    let outside = tempfile::NamedTempFile::new().unwrap();

    let output = t.add(&[outside.path().to_str().unwrap()]);
    assert_failure(&output);
    assert_stderr_contains(&output, "outside the repository");
}

#[test]
fn test_remove_untracks_and_deletes_ciphertext() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n"), ("other.env", "B=2\n")]);
    assert_success(&t.hide());
    assert!(t.exists("secrets.env.private"));

    let output = t.remove_cmd(&["secrets.env"]);
    assert_success(&output);
    assert_stdout_contains(&output, "removed secrets.env");

    assert!(!t.exists("secrets.env.private"));
    assert!(t.exists("secrets.env"), "plaintext stays");
    assert!(!t.gitignore().contains("/secrets.env\n"));
    assert!(t.gitignore().contains("/other.env"));
    assert_eq!(t.status_json()["count"], 1);
}

#[test]
fn test_remove_untracked_path_warns() {
    skip_without_git!();
    let t = Test::init();

    let output = t.remove_cmd(&["nope.env"]);
    assert_success(&output);
    assert_stderr_contains(&output, "not tracked");
}
