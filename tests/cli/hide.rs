//! Tests for `git-private hide`.

use crate::skip_without_git;
use crate::support::*;

#[test]
fn test_hide_writes_armored_ciphertext() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "API_KEY=1\n")]);

    let output = t.hide();
    assert_success(&output);
    assert_stdout_contains(&output, "hidden secrets.env");

    let ciphertext = t.read("secrets.env.private");
    assert!(ciphertext.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!ciphertext.contains("API_KEY"));
    assert_status(&t, "secrets.env", "hidden-in-sync");
}

#[test]
fn test_hide_records_fingerprint() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "hello")]);
    assert_success(&t.hide());

    let manifest: serde_json::Value =
        serde_json::from_str(&t.read(".gitprivate/paths.json")).unwrap();
    // sha256("hello")
    assert_eq!(
        manifest["entries"][0]["fingerprint"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_hide_clean_removes_plaintext() {
    skip_without_git!();
    let t = Test::with_files(SAMPLE_FILES);

    let output = t.hide_clean();
    assert_success(&output);

    for (path, _) in SAMPLE_FILES {
        assert!(!t.exists(path), "{} should be removed", path);
        assert!(t.exists(&format!("{}.private", path)));
        assert_status(&t, path, "hidden-not-revealed");
    }
}

#[test]
fn test_hide_skips_files_in_sync() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    let before = t.read_bytes("secrets.env.private");

    let output = t.hide();
    assert_success(&output);
    assert_stdout_contains(&output, "already in sync");
    assert_eq!(t.read_bytes("secrets.env.private"), before);

    // --force re-encrypts with a fresh file key.
    assert_success(&t.run(&["hide", "--force"]));
    assert_ne!(t.read_bytes("secrets.env.private"), before);
}

#[test]
fn test_hide_selected_files_only() {
    skip_without_git!();
    let t = Test::with_files(&[("a.env", "A=1\n"), ("b.env", "B=2\n")]);

    assert_success(&t.run(&["hide", "a.env"]));
    assert_status(&t, "a.env", "hidden-in-sync");
    assert_status(&t, "b.env", "not-hidden");
}

#[test]
fn test_hide_modified_file_updates_ciphertext() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());

    t.write("secrets.env", "A=2\n");
    assert_status(&t, "secrets.env", "hidden-modified");

    assert_success(&t.hide_clean());
    assert_success(&t.reveal());
    assert_eq!(t.read("secrets.env"), "A=2\n");
}

#[test]
fn test_hide_untracked_file_fails() {
    skip_without_git!();
    let t = Test::init();
    t.write("loose.env", "A=1\n");

    let output = t.run(&["hide", "loose.env"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not tracked");
}

#[test]
fn test_hide_stops_at_missing_plaintext() {
    skip_without_git!();
    let t = Test::with_files(&[("a.env", "A=1\n"), ("b.env", "B=2\n"), ("c.env", "C=3\n")]);
    t.remove("b.env");

    let output = t.hide();
    assert_failure(&output);
    assert_stderr_contains(&output, "b.env");
    assert_stdout_contains(&output, "hidden a.env");

    assert_status(&t, "a.env", "hidden-in-sync");
    assert_status(&t, "c.env", "not-hidden");
    assert!(!t.exists("c.env.private"));
}

#[test]
fn test_hide_without_key_fails() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);

    let output = t
        .cmd()
        .env_remove("GIT_PRIVATE_KEYFILE")
        .arg("hide")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "no private key provided");
}

#[test]
fn test_hide_with_unauthorized_key_fails() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    let stranger = KeyPair::generate();
    let path = t.key_path("stranger");
    stranger.write_secret(&path);

    let output = t.run_as(&path, &["hide"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot read the key list");
    assert!(!t.exists("secrets.env.private"));
}

#[test]
fn test_hide_with_inline_key() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    let secret = std::fs::read_to_string(&t.keyfile).unwrap();

    let output = t
        .cmd()
        .env_remove("GIT_PRIVATE_KEYFILE")
        .env("GIT_PRIVATE_KEY", secret)
        .arg("hide")
        .output()
        .unwrap();
    assert_success(&output);
    assert_status(&t, "secrets.env", "hidden-in-sync");
}

#[test]
fn test_hide_with_key_from_stdin() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    let secret = std::fs::read_to_string(&t.keyfile).unwrap();

    let output = t.run_with_stdin(&["hide", "--keyfile", "-"], &secret);
    assert_success(&output);
    assert_status(&t, "secrets.env", "hidden-in-sync");
}

#[cfg(unix)]
#[test]
fn test_ciphertext_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());

    let mode = std::fs::metadata(t.path("secrets.env.private"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}
