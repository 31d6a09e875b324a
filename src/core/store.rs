//! Persistent state.
//!
//! The state directory holds two documents:
//!
//! ```text
//! .gitprivate/
//! ├── paths.json   # tracked file manifest, plaintext JSON
//! └── keys.dat     # key registry, JSON armored-encrypted to its read-write keys
//! ```
//!
//! Both are replaced wholesale through an atomic rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::cipher;
use crate::core::constants::{KEYS_FILE, PATHS_FILE};
use crate::core::files;
use crate::core::identity::Identity;
use crate::core::keys::KeyRegistry;
use crate::core::manifest::FileManifest;
use crate::error::{ConfigError, Context, KeyError, Result};

/// Reader and writer for the state directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(PATHS_FILE)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.dir.join(KEYS_FILE)
    }

    /// Whether `init` has run.
    pub fn exists(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` before `init`.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(ConfigError::NotInitialized.into())
        }
    }

    /// Create the state directory with an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if a manifest exists.
    pub fn init(&self) -> Result<()> {
        if self.exists() {
            return Err(ConfigError::AlreadyInitialized(self.dir.display().to_string()).into());
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        self.save_manifest(&FileManifest::new())?;
        debug!(dir = %self.dir.display(), "initialized state directory");
        Ok(())
    }

    pub fn load_manifest(&self) -> Result<FileManifest> {
        self.ensure_initialized()?;
        let path = self.manifest_path();
        let contents =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let manifest: FileManifest = serde_json::from_slice(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(entries = manifest.len(), "loaded manifest");
        Ok(manifest)
    }

    pub fn save_manifest(&self, manifest: &FileManifest) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(manifest)?;
        json.push(b'\n');
        files::write_atomic(&self.manifest_path(), &json, 0o644)?;
        debug!(entries = manifest.len(), "stored manifest");
        Ok(())
    }

    /// Decrypt and parse the key registry.
    ///
    /// An absent document yields an empty registry, so the first key can be
    /// added by anyone.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` when `identity` is not a
    /// read-write key of the registry.
    pub fn load_registry(&self, identity: &Identity) -> Result<KeyRegistry> {
        self.ensure_initialized()?;
        let path = self.registry_path();
        if !files::exists(&path)? {
            debug!("no key list yet, starting empty");
            return Ok(KeyRegistry::new());
        }

        let encrypted =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let decrypted = cipher::decrypt(&encrypted, identity.as_age())
            .context("cannot read the key list with this private key")?;
        let registry: KeyRegistry = serde_json::from_slice(&decrypted)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        debug!(keys = registry.entries().len(), "loaded key list");
        Ok(registry)
    }

    /// Encrypt `registry` to its read-write keys and store it.
    ///
    /// The caller must be able to read the current document, so a key that
    /// was never trusted cannot replace it.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NoRecipients` if `registry` has no read-write key.
    pub fn save_registry(&self, identity: &Identity, registry: &KeyRegistry) -> Result<()> {
        self.load_registry(identity)?;

        let recipients = registry.recipients_for(|_| true)?;
        if recipients.is_empty() {
            return Err(KeyError::NoRecipients.into());
        }

        let json = serde_json::to_vec(registry)?;
        let encrypted = cipher::encrypt(&json, &recipients)?;
        files::write_atomic(&self.registry_path(), &encrypted, 0o644)?;

        debug!(
            keys = registry.entries().len(),
            recipients = recipients.len(),
            "stored key list"
        );
        Ok(())
    }
}
