//! Tests for `git-private keys`.

use crate::skip_without_git;
use crate::support::*;

/// Write a fresh key pair into the key directory and return it with its path.
fn new_member(t: &Test, name: &str) -> (KeyPair, std::path::PathBuf) {
    let pair = KeyPair::generate();
    let path = t.key_path(name);
    pair.write_secret(&path);
    (pair, path)
}

#[test]
fn test_keys_list_shows_owner() {
    skip_without_git!();
    let t = Test::init();

    let output = t.run(&["keys", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "owner");
    assert_stdout_contains(&output, "[age]");
    assert_stdout_contains(&output, "read-write");

    let json = t.keys_json();
    assert_eq!(json["count"], 1);
    assert_eq!(json["keys"][0]["id"], "owner");
    assert_eq!(json["keys"][0]["access"], "read-write");
}

#[test]
fn test_key_list_is_encrypted() {
    skip_without_git!();
    let t = Test::init();

    let contents = t.read(".gitprivate/keys.dat");
    assert!(contents.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!contents.contains("owner"));
}

#[test]
fn test_keys_add_reencrypts_for_new_member() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    let before = t.read_bytes("secrets.env.private");

    let (bob, bob_key) = new_member(&t, "bob");
    let output = t.keys_add("bob", &bob.public);
    assert_success(&output);
    assert_stdout_contains(&output, "added age key bob");
    assert_ne!(t.read_bytes("secrets.env.private"), before);

    assert_success(&t.clean());
    assert_success(&t.run_as(&bob_key, &["reveal"]));
    assert_eq!(t.read("secrets.env"), "A=1\n");
}

#[test]
fn test_keys_add_blocked_by_unsynced_files() {
    skip_without_git!();
    let t = Test::with_files(&[("a.env", "A=1\n"), ("b.env", "B=2\n")]);
    assert_success(&t.hide());
    let a_before = t.read_bytes("a.env.private");
    let b_before = t.read_bytes("b.env.private");
    let keys_before = t.read_bytes(".gitprivate/keys.dat");
    t.write("b.env", "B=changed\n");

    let (bob, _) = new_member(&t, "bob");
    let output = t.keys_add("bob", &bob.public);
    assert_failure(&output);
    assert_stderr_contains(&output, "re-encryption blocked");
    assert_stderr_contains(&output, "b.env");

    assert_eq!(t.read_bytes("a.env.private"), a_before);
    assert_eq!(t.read_bytes("b.env.private"), b_before);
    assert_eq!(t.read_bytes(".gitprivate/keys.dat"), keys_before);
    assert_eq!(t.keys_json()["count"], 1);
}

#[test]
fn test_keys_add_duplicate_id_fails() {
    skip_without_git!();
    let t = Test::init();
    let (bob, _) = new_member(&t, "bob");

    let output = t.keys_add("owner", &bob.public);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_keys_add_invalid_key_fails() {
    skip_without_git!();
    let t = Test::init();

    let output = t.keys_add("bad", INVALID_PUBLIC_KEY);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid key format");
}

#[test]
fn test_keys_add_ssh_key_uses_comment_as_id() {
    skip_without_git!();
    let t = Test::init();

    let output = t.run(&["keys", "add", SSH_PUBLIC_KEY]);
    assert_success(&output);

    let json = t.keys_json();
    assert_eq!(json["keys"][1]["id"], "alice@laptop");
    assert_eq!(json["keys"][1]["kind"], "ssh");
}

#[test]
fn test_keys_add_age_key_needs_id() {
    skip_without_git!();
    let t = Test::init();
    let (bob, _) = new_member(&t, "bob");

    let output = t.run(&["keys", "add", &bob.public]);
    assert_failure(&output);
    assert_stderr_contains(&output, "--id");
}

#[test]
fn test_keys_add_from_pubfile_and_stdin() {
    skip_without_git!();
    let t = Test::init();
    let (bob, _) = new_member(&t, "bob");
    let (carol, _) = new_member(&t, "carol");

    let pubfile = t.keys.path().join("bob.pub");
    std::fs::write(&pubfile, format!("# bob's laptop\n{}\n", bob.public)).unwrap();
    let output = t.run(&["keys", "add", "--id", "bob", "--pubfile", pubfile.to_str().unwrap()]);
    assert_success(&output);

    let output = t.run_with_stdin(&["keys", "add", "--id", "carol", "--pubfile", "-"], &carol.public);
    assert_success(&output);

    assert_eq!(t.keys_json()["count"], 3);
}

#[test]
fn test_readonly_key_can_reveal_but_not_manage() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());

    let (ci, ci_key) = new_member(&t, "ci");
    let output = t.keys_add_readonly("ci", &ci.public);
    assert_success(&output);
    assert_stdout_contains(&output, "read-only");
    assert_eq!(t.keys_json()["keys"][1]["access"], "read-only");

    assert_success(&t.clean());
    assert_success(&t.run_as(&ci_key, &["reveal"]));
    assert_eq!(t.read("secrets.env"), "A=1\n");

    let output = t.run_as(&ci_key, &["keys", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot read the key list");

    t.write("secrets.env", "A=2\n");
    let output = t.run_as(&ci_key, &["hide"]);
    assert_failure(&output);
}

#[test]
fn test_readonly_first_key_is_refused() {
    skip_without_git!();
    let t = Test::new();
    assert_success(&t.init_cmd());
    let (ci, ci_key) = new_member(&t, "ci");

    let output = t.run_as(&ci_key, &["keys", "add", "--readonly", "--id", "ci", &ci.public]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no read-write keys");
    assert!(!t.exists(".gitprivate/keys.dat"));
}

#[test]
fn test_keys_remove_revokes_access() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    let (bob, bob_key) = new_member(&t, "bob");
    assert_success(&t.keys_add("bob", &bob.public));

    let output = t.keys_remove("bob");
    assert_success(&output);
    assert_stdout_contains(&output, "removed key bob");
    assert_eq!(t.keys_json()["count"], 1);

    assert_success(&t.clean());
    let output = t.run_as(&bob_key, &["reveal"]);
    assert_failure(&output);
    assert!(!t.exists("secrets.env"));
}

#[test]
fn test_keys_remove_blocked_by_modified_file() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());
    let (bob, bob_key) = new_member(&t, "bob");
    assert_success(&t.keys_add("bob", &bob.public));
    t.write("secrets.env", "A=edited\n");
    assert_status(&t, "secrets.env", "hidden-modified");

    let private_before = t.read_bytes("secrets.env.private");
    let keys_before = t.read_bytes(".gitprivate/keys.dat");

    let output = t.keys_remove("bob");
    assert_failure(&output);
    assert_stderr_contains(&output, "re-encryption blocked");
    assert_stderr_contains(&output, "secrets.env");

    assert_eq!(t.read_bytes("secrets.env.private"), private_before);
    assert_eq!(t.read_bytes(".gitprivate/keys.dat"), keys_before);
    assert_eq!(t.read("secrets.env"), "A=edited\n");
    assert_eq!(t.keys_json()["count"], 2);

    // bob can still open the untouched ciphertext
    t.remove("secrets.env");
    assert_success(&t.run_as(&bob_key, &["reveal"]));
    assert_eq!(t.read("secrets.env"), "A=1\n");
}

#[test]
fn test_keys_remove_with_id_flag() {
    skip_without_git!();
    let t = Test::init();
    let (bob, _) = new_member(&t, "bob");
    assert_success(&t.keys_add("bob", &bob.public));

    assert_success(&t.run(&["keys", "remove", "--id", "bob"]));
    assert_eq!(t.keys_json()["count"], 1);
}

#[test]
fn test_keys_remove_unknown_id_fails() {
    skip_without_git!();
    let t = Test::init();

    let output = t.keys_remove("nobody");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_keys_remove_last_writer_fails() {
    skip_without_git!();
    let t = Test::init();

    let output = t.keys_remove("owner");
    assert_failure(&output);
    assert_stderr_contains(&output, "no read-write keys");
    assert_eq!(t.keys_json()["count"], 1);
}

#[test]
fn test_keys_generate_protected_key_reveals() {
    skip_without_git!();
    let t = Test::with_files(&[("secrets.env", "A=1\n")]);
    assert_success(&t.hide());

    let keyfile = t.key_path("dave");
    let pubfile = t.keys.path().join("dave.pub");
    let output = t.run_with_stdin(
        &[
            "keys",
            "generate",
            "--keyfile",
            keyfile.to_str().unwrap(),
            "--pubfile",
            pubfile.to_str().unwrap(),
        ],
        "hunter2\nhunter2\n",
    );
    assert_success(&output);
    assert_stdout_contains(&output, "generated");

    let contents = std::fs::read_to_string(&keyfile).unwrap();
    assert!(contents.contains("GIT-PRIVATE-PROTECTED-KEY-"));
    assert!(!contents.contains("AGE-SECRET-KEY-"));

    let public = std::fs::read_to_string(&pubfile).unwrap();
    assert_success(&t.keys_add("dave", public.trim()));
    assert_success(&t.clean());

    let output = t
        .cmd()
        .env("GIT_PRIVATE_KEYFILE", &keyfile)
        .arg("reveal")
        .write_stdin("hunter2\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.read("secrets.env"), "A=1\n");

    std::fs::remove_file(t.path("secrets.env")).unwrap();
    let output = t
        .cmd()
        .env("GIT_PRIVATE_KEYFILE", &keyfile)
        .arg("reveal")
        .write_stdin("wrong\n")
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(!t.exists("secrets.env"));
}

#[test]
fn test_keys_generate_mismatched_passphrases() {
    skip_without_git!();
    let t = Test::new();
    let keyfile = t.key_path("dave");

    let output = t.run_with_stdin(
        &["keys", "generate", "--keyfile", keyfile.to_str().unwrap()],
        "one\ntwo\n",
    );
    assert_failure(&output);
    assert_stderr_contains(&output, "do not match");
    assert!(!keyfile.exists());
}

#[test]
fn test_keys_generate_refuses_existing_file() {
    skip_without_git!();
    let t = Test::new();
    let keyfile = t.key_path("dave");
    std::fs::write(&keyfile, "keep me").unwrap();

    let output = t.run_with_stdin(
        &["keys", "generate", "--keyfile", keyfile.to_str().unwrap()],
        "\n\n",
    );
    assert_failure(&output);
    assert_eq!(std::fs::read_to_string(&keyfile).unwrap(), "keep me");
}

#[test]
fn test_keys_generate_without_passphrase_warns() {
    skip_without_git!();
    let t = Test::new();
    let keyfile = t.key_path("dave");

    let output = t.run_with_stdin(
        &["keys", "generate", "--keyfile", keyfile.to_str().unwrap()],
        "\n\n",
    );
    assert_success(&output);
    assert_stderr_contains(&output, "without a passphrase");

    let contents = std::fs::read_to_string(&keyfile).unwrap();
    assert!(contents.contains("AGE-SECRET-KEY-"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&keyfile).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
