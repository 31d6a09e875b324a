//! Private key loading.
//!
//! An identity may be an OpenSSH/PEM private key (prompting for its
//! passphrase if encrypted), a protected key, or a plain age secret key.
//! They are tried in that order.

use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use ::age::{ssh, x25519};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::config::IdentitySource;
use crate::core::prompt::{PassphrasePrompt, PromptCallbacks};
use crate::core::protect;
use crate::core::types::PublicKey;
use crate::error::{Context, KeyError, Result};

/// A private key able to decrypt.
pub struct Identity {
    inner: Box<dyn ::age::Identity>,
    public_key: Option<PublicKey>,
    kind: &'static str,
}

impl Identity {
    /// Wrap an age x25519 identity.
    pub fn from_x25519(identity: x25519::Identity) -> Self {
        let public_key = identity.to_public().to_string();
        Self {
            inner: Box::new(identity),
            public_key: Some(public_key),
            kind: "age",
        }
    }

    /// Load from a configured source.
    ///
    /// A file source of `-` reads stdin.
    pub fn load(source: &IdentitySource, prompt: Arc<dyn PassphrasePrompt>) -> Result<Self> {
        match source {
            IdentitySource::Inline(text) => Self::parse(text, None, prompt),
            IdentitySource::File(path) if path.as_os_str() == "-" => {
                let mut text = Zeroizing::new(String::new());
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read private key from stdin")?;
                Self::parse(&text, None, prompt)
            }
            IdentitySource::File(path) => {
                debug!(path = %path.display(), "loading private key");
                #[cfg(unix)]
                warn_if_exposed(path);

                let text = Zeroizing::new(
                    fs::read_to_string(path)
                        .with_context(|| format!("failed to read key file {}", path.display()))?,
                );
                Self::parse(&text, Some(path.display().to_string()), prompt)
            }
        }
    }

    /// Parse key material.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidIdentity` when no format matches.
    pub fn parse(
        text: &str,
        label: Option<String>,
        prompt: Arc<dyn PassphrasePrompt>,
    ) -> Result<Self> {
        if text.contains("-----BEGIN") {
            return Self::parse_ssh(text, label, prompt);
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        let line = match lines.as_slice() {
            [] => return Err(KeyError::InvalidIdentity("no private key found".to_string()).into()),
            [line] => *line,
            _ => return Err(KeyError::MultipleKeys.into()),
        };

        if protect::is_protected(line) {
            debug!("private key is passphrase-protected");
            return Ok(Self::from_x25519(protect::import(line, prompt.as_ref())?));
        }

        let identity = x25519::Identity::from_str(line)
            .map_err(|e| KeyError::InvalidIdentity(e.to_string()))?;
        Ok(Self::from_x25519(identity))
    }

    fn parse_ssh(
        text: &str,
        label: Option<String>,
        prompt: Arc<dyn PassphrasePrompt>,
    ) -> Result<Self> {
        let identity = ssh::Identity::from_buffer(BufReader::new(text.as_bytes()), label)
            .map_err(|e| KeyError::InvalidIdentity(e.to_string()))?;

        match identity {
            ssh::Identity::Unsupported(key) => {
                Err(KeyError::InvalidIdentity(format!("unsupported SSH key: {:?}", key)).into())
            }
            ssh::Identity::Encrypted(_) => {
                debug!("SSH key is encrypted, passphrase will be requested");
                Ok(Self {
                    inner: Box::new(identity.with_callbacks(PromptCallbacks::new(prompt))),
                    public_key: None,
                    kind: "ssh",
                })
            }
            ssh::Identity::Unencrypted(_) => Ok(Self {
                inner: Box::new(identity),
                public_key: None,
                kind: "ssh",
            }),
        }
    }

    /// The identity for age decryption calls.
    pub fn as_age(&self) -> &dyn ::age::Identity {
        self.inner.as_ref()
    }

    /// Public key, when derivable.
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// `age` or `ssh`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("kind", &self.kind)
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[cfg(unix)]
fn warn_if_exposed(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "key file is accessible by others, run: chmod 600 {}",
                path.display()
            );
        }
    }
}
