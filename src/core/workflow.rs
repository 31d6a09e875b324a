//! Hide, reveal, clean and untrack.
//!
//! Batches run file by file in the given order and stop at the first hard
//! error. Work already committed stays committed and is recorded in the
//! caller's [`Summary`], which is therefore complete even on failure.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::cipher::{self, Recipient};
use crate::core::files;
use crate::core::identity::Identity;
use crate::core::manifest::FileManifest;
use crate::core::repo::Repo;
use crate::core::status::{file_status, FileStatus};
use crate::core::store::Store;
use crate::core::types::RepoPath;
use crate::error::{Context, KeyError, Result, SyncError};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Hidden,
    Revealed,
    Cleaned,
    /// Nothing to do, the file was already in the target state.
    InSync,
    Untracked,
}

/// Per-file record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub path: RepoPath,
    pub action: Action,
}

/// Running result of a batch.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Summary {
    pub records: Vec<Record>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, path: &str, action: Action) {
        self.records.push(Record {
            path: path.to_string(),
            action,
        });
    }

    /// Files changed by the batch.
    pub fn processed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.action != Action::InSync)
            .count()
    }

    /// Files left alone because they were already in sync.
    pub fn in_sync(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.action == Action::InSync)
            .count()
    }
}

/// Options for [`hide`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HideOptions {
    /// Delete plaintexts once their ciphertext is stored.
    pub clean: bool,
    /// Re-encrypt files that are already in sync.
    pub force: bool,
}

/// Options for [`reveal`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealOptions {
    /// Replace plaintexts that changed since they were hidden.
    pub overwrite: bool,
    /// Delete ciphertexts once the plaintext is written.
    pub clean: bool,
}

/// Encrypt one tracked file to `recipients`.
///
/// The ciphertext is stored and the manifest updated before the plaintext
/// is removed, so a failure never loses the only copy.
pub fn hide_file(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    path: &str,
    recipients: &[Recipient],
    clean: bool,
) -> Result<()> {
    if recipients.is_empty() {
        return Err(KeyError::NoRecipients.into());
    }
    if files::is_private(path) {
        return Err(SyncError::AlreadyPrivate(path.to_string()).into());
    }
    if !manifest.contains(path) {
        return Err(SyncError::NotTracked(path.to_string()).into());
    }

    let plaintext_path = repo.absolute(path);
    if !files::exists(&plaintext_path)? {
        return Err(SyncError::PlaintextMissing(path.to_string()).into());
    }
    let plaintext = zeroize::Zeroizing::new(
        fs::read(&plaintext_path).with_context(|| format!("failed to read {}", path))?,
    );

    let encrypted = cipher::encrypt(&plaintext, recipients)?;
    files::write_atomic(&files::private_path(&plaintext_path), &encrypted, 0o644)
        .with_context(|| format!("failed to write private version of {}", path))?;

    manifest.set_fingerprint(path, files::hash_content(&plaintext));
    store.save_manifest(manifest)?;

    if clean {
        files::remove_if_exists(&plaintext_path)?;
    }
    debug!(path, recipients = recipients.len(), clean, "hid file");
    Ok(())
}

/// Hide `paths` in order.
///
/// Files already in sync are skipped unless `options.force` is set; they
/// are still cleaned when `options.clean` is set.
pub fn hide(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    paths: &[RepoPath],
    recipients: &[Recipient],
    options: HideOptions,
    summary: &mut Summary,
) -> Result<()> {
    if recipients.is_empty() {
        return Err(KeyError::NoRecipients.into());
    }

    for path in paths {
        if files::is_private(path) {
            return Err(SyncError::AlreadyPrivate(path.clone()).into());
        }
        let entry = manifest
            .get(path)
            .cloned()
            .ok_or_else(|| SyncError::NotTracked(path.clone()))?;

        if !options.force && file_status(repo, &entry)? == FileStatus::HiddenInSync {
            debug!(path = %path, "already in sync");
            if options.clean {
                files::remove_if_exists(&repo.absolute(path))?;
            }
            summary.record(path, Action::InSync);
            continue;
        }

        hide_file(repo, store, manifest, path, recipients, options.clean)?;
        summary.record(path, Action::Hidden);
    }
    Ok(())
}

/// Decrypt `paths` in order.
pub fn reveal(
    repo: &Repo,
    manifest: &FileManifest,
    paths: &[RepoPath],
    identity: &Identity,
    options: RevealOptions,
    summary: &mut Summary,
) -> Result<()> {
    for path in paths {
        let entry = manifest
            .get(path)
            .ok_or_else(|| SyncError::NotTracked(path.clone()))?;

        match file_status(repo, entry)? {
            FileStatus::HiddenInSync => {
                debug!(path = %path, "already in sync");
                summary.record(path, Action::InSync);
                continue;
            }
            FileStatus::NotHidden => return Err(SyncError::NotHidden(path.clone()).into()),
            FileStatus::HiddenPrivateMissing => {
                return Err(SyncError::PrivateMissing(path.clone()).into())
            }
            FileStatus::HiddenModified if !options.overwrite => {
                return Err(SyncError::Modified(path.clone()).into())
            }
            FileStatus::HiddenModified | FileStatus::HiddenNotRevealed => {}
        }

        let plaintext_path = repo.absolute(path);
        let private_path = files::private_path(&plaintext_path);
        let encrypted = fs::read(&private_path)
            .with_context(|| format!("failed to read private version of {}", path))?;
        let plaintext = cipher::decrypt(&encrypted, identity.as_age())
            .with_context(|| format!("cannot reveal {}", path))?;

        files::write_atomic(&plaintext_path, &plaintext, 0o600)
            .with_context(|| format!("failed to write {}", path))?;
        if options.clean {
            files::remove_if_exists(&private_path)?;
        }

        debug!(path = %path, clean = options.clean, "revealed file");
        summary.record(path, Action::Revealed);
    }
    Ok(())
}

/// Delete plaintexts of `paths`.
///
/// Without `force`, files whose plaintext is the only up-to-date copy are
/// refused. Files with no plaintext count as in sync.
pub fn clean(
    repo: &Repo,
    manifest: &FileManifest,
    paths: &[RepoPath],
    force: bool,
    summary: &mut Summary,
) -> Result<()> {
    for path in paths {
        let entry = manifest
            .get(path)
            .ok_or_else(|| SyncError::NotTracked(path.clone()))?;

        if !force {
            match file_status(repo, entry)? {
                FileStatus::NotHidden => return Err(SyncError::NotHidden(path.clone()).into()),
                FileStatus::HiddenModified => {
                    return Err(SyncError::Modified(path.clone()).into())
                }
                FileStatus::HiddenPrivateMissing => {
                    return Err(SyncError::PrivateMissing(path.clone()).into())
                }
                FileStatus::HiddenInSync | FileStatus::HiddenNotRevealed => {}
            }
        }

        if files::remove_if_exists(&repo.absolute(path))? {
            debug!(path = %path, force, "removed plaintext");
            summary.record(path, Action::Cleaned);
        } else {
            summary.record(path, Action::InSync);
        }
    }
    Ok(())
}

/// Start tracking existing files. Returns the newly tracked paths.
pub fn track(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    paths: &[RepoPath],
) -> Result<Vec<RepoPath>> {
    for path in paths {
        if files::is_private(path) {
            return Err(SyncError::AlreadyPrivate(path.clone()).into());
        }
        if !repo.absolute(path).is_file() {
            return Err(SyncError::NoSuchFile(path.clone()).into());
        }
    }

    let mut added = Vec::new();
    for path in paths {
        if manifest.track(path) {
            repo.add_ignore_pattern(&ignore_pattern(path))?;
            debug!(path = %path, "tracking file");
            added.push(path.clone());
        }
    }
    store.save_manifest(manifest)?;
    Ok(added)
}

/// Stop tracking `path`: drop its ignore line, its manifest entry and its
/// ciphertext. The plaintext is left in place.
///
/// Returns `false` if the path was not tracked.
pub fn untrack(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    path: &str,
    summary: &mut Summary,
) -> Result<bool> {
    if !manifest.contains(path) {
        return Ok(false);
    }

    repo.remove_ignore_pattern(&ignore_pattern(path))?;
    manifest.untrack(path);
    store.save_manifest(manifest)?;
    files::remove_if_exists(&files::private_path(&repo.absolute(path)))?;

    debug!(path, "untracked file");
    summary.record(path, Action::Untracked);
    Ok(true)
}

/// Check that git now ignores every path in `added`. Any path it does not
/// ignore is untracked again before the error is returned.
pub fn verify_ignored(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    added: &[RepoPath],
) -> Result<()> {
    let mut exposed = Vec::new();
    for path in added {
        if !repo.is_ignored(Path::new(path))? {
            exposed.push(path.clone());
        }
    }
    let Some(first) = exposed.first().cloned() else {
        return Ok(());
    };

    for path in &exposed {
        repo.remove_ignore_pattern(&ignore_pattern(path))?;
        manifest.untrack(path);
        warn!(path = %path, "plaintext is not ignored, untracked again");
    }
    store.save_manifest(manifest)?;
    Err(SyncError::NotIgnored(first).into())
}

/// `.gitignore` line for a tracked path, anchored at the root. Glob
/// metacharacters are escaped so the line matches only that file.
pub fn ignore_pattern(path: &str) -> String {
    let mut pattern = String::with_capacity(path.len() + 1);
    pattern.push('/');
    for c in path.chars() {
        if matches!(c, '\\' | '*' | '?' | '[' | ']') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    // git drops unescaped trailing spaces
    let body = pattern.trim_end_matches(' ').len();
    let trailing = pattern.len() - body;
    pattern.truncate(body);
    for _ in 0..trailing {
        pattern.push_str("\\ ");
    }
    pattern
}
