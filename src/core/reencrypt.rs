//! Re-encryption after key changes.
//!
//! Adding or removing a key changes who can read every ciphertext, so each
//! tracked file is hidden again for the new key set. This is only allowed
//! when every tracked file is in sync; otherwise a stale plaintext could be
//! encrypted over newer ciphertext, or a missing one could not be
//! re-encrypted at all. The check runs before anything is written.

use tracing::{debug, info};

use crate::core::identity::Identity;
use crate::core::keys::{Access, KeyEntry, KeyMaterial};
use crate::core::manifest::FileManifest;
use crate::core::repo::Repo;
use crate::core::status::{file_status, FileStatus};
use crate::core::store::Store;
use crate::core::types::{KeyId, RepoPath};
use crate::core::workflow::{hide_file, Action, Summary};
use crate::error::{Result, SyncError};

/// A mutation of the key registry.
#[derive(Debug, Clone)]
pub enum KeyChange {
    Add {
        id: KeyId,
        key: KeyMaterial,
        access: Access,
    },
    Remove {
        id: KeyId,
    },
}

/// Tracked files that are not in sync.
pub fn out_of_sync(repo: &Repo, manifest: &FileManifest) -> Result<Vec<RepoPath>> {
    let mut blocked = Vec::new();
    for entry in &manifest.entries {
        let status = file_status(repo, entry)?;
        if status != FileStatus::HiddenInSync {
            debug!(path = %entry.path, %status, "blocks re-encryption");
            blocked.push(entry.path.clone());
        }
    }
    Ok(blocked)
}

/// Apply `change` to the registry and re-hide every tracked file.
///
/// Returns the entry that was added or removed.
///
/// # Errors
///
/// Returns `SyncError::ReEncryptionBlocked` naming every file that is not
/// in sync. In that case the registry and all ciphertexts are unchanged.
pub fn apply(
    repo: &Repo,
    store: &Store,
    manifest: &mut FileManifest,
    identity: &Identity,
    change: KeyChange,
    summary: &mut Summary,
) -> Result<KeyEntry> {
    let mut registry = store.load_registry(identity)?;
    // An empty registry means nothing has ever been hidden.
    let bootstrap = registry.is_empty();

    if !bootstrap {
        let blocked = out_of_sync(repo, manifest)?;
        if !blocked.is_empty() {
            return Err(SyncError::ReEncryptionBlocked { files: blocked }.into());
        }
    }

    let entry = match change {
        KeyChange::Add { id, key, access } => registry.add(&id, key, access)?,
        KeyChange::Remove { id } => registry.remove(&id)?,
    };

    // Resolve recipients before the registry is written, so a change that
    // leaves no read-write key fails without side effects.
    let recipients = registry.reveal_recipients()?;
    store.save_registry(identity, &registry)?;
    info!(id = %entry.id, keys = registry.entries().len(), "key list updated");

    if bootstrap {
        return Ok(entry);
    }

    let paths: Vec<RepoPath> = manifest.paths().map(str::to_string).collect();
    for path in &paths {
        hide_file(repo, store, manifest, path, &recipients, false)?;
        summary.record(path, Action::Hidden);
    }
    debug!(files = paths.len(), "re-encrypted tracked files");
    Ok(entry)
}
