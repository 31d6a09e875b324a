//! Runtime configuration.
//!
//! Everything the environment can influence is collected into [`Settings`]
//! once, at the command boundary. Library code receives the record and never
//! reads environment variables itself.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::core::constants;

/// Where the private key for a command comes from.
#[derive(Clone)]
pub enum IdentitySource {
    /// Key material given inline.
    Inline(Zeroizing<String>),
    /// Path to a key file; `-` reads stdin.
    File(PathBuf),
}

impl std::fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentitySource::Inline(_) => f.write_str("Inline(<redacted>)"),
            IdentitySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Resolved runtime settings.
#[derive(Clone, Default)]
pub struct Settings {
    /// State directory override; relative paths resolve against the repo root.
    pub state_dir: Option<PathBuf>,
    /// Inline private key.
    pub key: Option<Zeroizing<String>>,
    /// Private key file.
    pub key_file: Option<PathBuf>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("state_dir", &self.state_dir)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("key_file", &self.key_file)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            state_dir: get(constants::ENV_STATE_DIR).map(PathBuf::from),
            key: get(constants::ENV_KEY).map(Zeroizing::new),
            key_file: get(constants::ENV_KEY_FILE).map(PathBuf::from),
        }
    }

    /// Overlay an explicit `--keyfile` argument.
    pub fn with_key_file(mut self, key_file: Option<PathBuf>) -> Self {
        if key_file.is_some() {
            self.key_file = key_file;
            // An explicit flag beats the inline environment key.
            self.key = None;
        }
        self
    }

    /// Overlay an explicit `--state-dir` argument.
    pub fn with_state_dir(mut self, state_dir: Option<PathBuf>) -> Self {
        if state_dir.is_some() {
            self.state_dir = state_dir;
        }
        self
    }

    /// The identity source in precedence order: inline key, then key file.
    pub fn identity_source(&self) -> Option<IdentitySource> {
        if let Some(key) = &self.key {
            return Some(IdentitySource::Inline(key.clone()));
        }
        self.key_file.clone().map(IdentitySource::File)
    }

    /// State directory for a repository rooted at `root`.
    pub fn state_dir(&self, root: &Path) -> PathBuf {
        match &self.state_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join(constants::STATE_DIR),
        }
    }
}
