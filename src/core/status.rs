//! Per-file synchronization state.
//!
//! States are derived from the manifest and the file system on every call
//! and never stored.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::core::files;
use crate::core::manifest::SecureFileEntry;
use crate::core::repo::Repo;
use crate::error::Result;

/// Relationship between a tracked file, its ciphertext and the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// Tracked but never hidden.
    NotHidden,
    /// Hidden before, but the ciphertext is gone.
    HiddenPrivateMissing,
    /// Ciphertext present, plaintext absent.
    HiddenNotRevealed,
    /// Plaintext matches the last hidden fingerprint.
    HiddenInSync,
    /// Plaintext changed since it was last hidden.
    HiddenModified,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileStatus::NotHidden => "not hidden",
            FileStatus::HiddenPrivateMissing => "WARNING: private file missing!",
            FileStatus::HiddenNotRevealed => "hidden, not revealed",
            FileStatus::HiddenInSync => "hidden, in sync",
            FileStatus::HiddenModified => "hidden, modified",
        };
        f.write_str(text)
    }
}

/// Compute the state of one tracked file.
///
/// Performs at most two existence checks and one hash.
pub fn file_status(repo: &Repo, entry: &SecureFileEntry) -> Result<FileStatus> {
    if !entry.is_hidden() {
        return Ok(FileStatus::NotHidden);
    }

    let plaintext = repo.absolute(&entry.path);
    if !files::exists(&files::private_path(&plaintext))? {
        return Ok(FileStatus::HiddenPrivateMissing);
    }
    if !files::exists(&plaintext)? {
        return Ok(FileStatus::HiddenNotRevealed);
    }

    let status = if files::hash_file(&plaintext)? == entry.fingerprint {
        FileStatus::HiddenInSync
    } else {
        FileStatus::HiddenModified
    };
    trace!(path = %entry.path, %status, "computed status");
    Ok(status)
}
