//! Tracked file manifest.
//!
//! The manifest lists every tracked path with the fingerprint of the
//! plaintext it was last hidden from. It is stored unencrypted.

use serde::{Deserialize, Serialize};

use crate::core::constants::FORMAT_VERSION;
use crate::core::types::{Fingerprint, RepoPath};

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureFileEntry {
    /// Repository-relative path, `/`-separated.
    pub path: RepoPath,
    /// Hex SHA-256 of the plaintext at last hide; empty when never hidden.
    #[serde(default)]
    pub fingerprint: Fingerprint,
}

impl SecureFileEntry {
    pub fn new(path: impl Into<RepoPath>) -> Self {
        Self {
            path: path.into(),
            fingerprint: Fingerprint::new(),
        }
    }

    /// Whether the file has been hidden at least once.
    pub fn is_hidden(&self) -> bool {
        !self.fingerprint.is_empty()
    }
}

/// Ordered set of tracked files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<SecureFileEntry>,
}

impl Default for FileManifest {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }
}

impl FileManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&SecureFileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Track `path`. Returns `false` if it was already tracked.
    pub fn track(&mut self, path: &str) -> bool {
        if self.contains(path) {
            return false;
        }
        self.entries.push(SecureFileEntry::new(path));
        true
    }

    /// Stop tracking `path`, returning the removed entry.
    pub fn untrack(&mut self, path: &str) -> Option<SecureFileEntry> {
        let index = self.entries.iter().position(|e| e.path == path)?;
        Some(self.entries.remove(index))
    }

    /// Record a new fingerprint. Returns `false` for untracked paths.
    pub fn set_fingerprint(&mut self, path: &str, fingerprint: Fingerprint) -> bool {
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(entry) => {
                entry.fingerprint = fingerprint;
                true
            }
            None => false,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
