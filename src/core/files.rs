//! File helpers: fingerprints, sibling paths and atomic replacement.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::trace;

use crate::core::constants::PRIVATE_EXTENSION;
use crate::core::types::Fingerprint;
use crate::error::Result;

/// Hex SHA-256 of in-memory content.
pub fn hash_content(bytes: &[u8]) -> Fingerprint {
    hex::encode(Sha256::digest(bytes))
}

/// Hex SHA-256 of a file, streamed.
pub fn hash_file(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Whether `path` names an encrypted sibling.
pub fn is_private(path: &str) -> bool {
    path.ends_with(PRIVATE_EXTENSION)
}

/// Encrypted sibling of a plaintext path.
pub fn private_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PRIVATE_EXTENSION);
    PathBuf::from(name)
}

/// Whether `path` exists, treating permission errors as failures.
pub fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// Readers see either the old or the new file, never a partial one.
pub fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path).map_err(|e| e.error)?;
    trace!(path = %path.display(), bytes = contents.len(), "replaced file");
    Ok(())
}

/// Delete `path` if present. Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
