//! Authorized key registry.
//!
//! Every key that may decrypt tracked files is listed here with an access
//! level. Read-write keys can change the key list and hide files; read-only
//! keys can only reveal.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::cipher::{self, Recipient};
use crate::core::constants::FORMAT_VERSION;
use crate::core::types::{KeyId, PublicKey};
use crate::error::{KeyError, Result};

/// How a key's material is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Age,
    Ssh,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Age => write!(f, "age"),
            KeyKind::Ssh => write!(f, "ssh"),
        }
    }
}

/// What a key holder is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
}

impl Access {
    pub fn is_read_only(self) -> bool {
        self == Access::ReadOnly
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::ReadWrite => write!(f, "read-write"),
            Access::ReadOnly => write!(f, "read-only"),
        }
    }
}

/// A parsed public key, not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub kind: KeyKind,
    /// Serialized public key without any SSH comment.
    pub material: PublicKey,
    /// SSH comment, usable as a default id.
    pub comment: Option<String>,
}

/// An authorized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub id: KeyId,
    pub kind: KeyKind,
    pub material: PublicKey,
    #[serde(default)]
    pub access: Access,
}

impl KeyEntry {
    /// Encryption recipient for this key.
    pub fn recipient(&self) -> Result<Recipient> {
        match self.kind {
            KeyKind::Age => cipher::parse_age_recipient(&self.material),
            KeyKind::Ssh => cipher::parse_ssh_recipient(&self.material),
        }
    }
}

/// The list of authorized keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRegistry {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<KeyEntry>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&KeyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a key, returning the new entry.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::DuplicateId` if `id` is taken.
    pub fn add(&mut self, id: &str, key: KeyMaterial, access: Access) -> Result<KeyEntry> {
        if self.get(id).is_some() {
            return Err(KeyError::DuplicateId(id.to_string()).into());
        }
        trace!(id, kind = %key.kind, %access, "registering key");
        let entry = KeyEntry {
            id: id.to_string(),
            kind: key.kind,
            material: key.material,
            access,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Unregister a key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotFound` if no key has this id.
    pub fn remove(&mut self, id: &str) -> Result<KeyEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| KeyError::NotFound(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Whether any read-write key is registered.
    pub fn has_writer(&self) -> bool {
        self.entries.iter().any(|e| !e.access.is_read_only())
    }

    /// Write recipients: read-write keys accepted by `filter`.
    ///
    /// Read-only keys never appear, whatever the filter says.
    pub fn recipients_for<F>(&self, filter: F) -> Result<Vec<Recipient>>
    where
        F: Fn(&KeyEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| !e.access.is_read_only())
            .filter(|e| filter(e))
            .map(KeyEntry::recipient)
            .collect()
    }

    /// Recipients of file ciphertexts: every registered key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NoRecipients` unless at least one read-write key
    /// is registered.
    pub fn reveal_recipients(&self) -> Result<Vec<Recipient>> {
        if !self.has_writer() {
            return Err(KeyError::NoRecipients.into());
        }
        self.entries.iter().map(KeyEntry::recipient).collect()
    }
}

/// Parse a single public key.
///
/// The SSH authorized-key grammar (`<type> <base64> [comment]`) is tried
/// first, then the age recipient grammar. Blank lines and lines starting
/// with `#` are ignored.
///
/// # Errors
///
/// Returns `KeyError::MultipleKeys` for blobs holding more than one key and
/// `KeyError::InvalidKey` for anything unparseable.
pub fn parse_key(raw: &str) -> Result<KeyMaterial> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let line = match lines.as_slice() {
        [] => return Err(KeyError::InvalidKey("no key found".to_string()).into()),
        [line] => *line,
        _ => return Err(KeyError::MultipleKeys.into()),
    };

    if let Some(key) = parse_ssh_line(line)? {
        return Ok(key);
    }

    cipher::parse_age_recipient(line)?;
    Ok(KeyMaterial {
        kind: KeyKind::Age,
        material: line.to_string(),
        comment: None,
    })
}

/// `Ok(None)` when the line is not in authorized-key form at all.
fn parse_ssh_line(line: &str) -> Result<Option<KeyMaterial>> {
    let mut fields = line.split_whitespace();
    let (key_type, body) = match (fields.next(), fields.next()) {
        (Some(t), Some(b)) if is_ssh_type(t) => (t, b),
        _ => return Ok(None),
    };
    let comment: Vec<&str> = fields.collect();

    let material = format!("{} {}", key_type, body);
    cipher::parse_ssh_recipient(&material)?;

    Ok(Some(KeyMaterial {
        kind: KeyKind::Ssh,
        material,
        comment: if comment.is_empty() {
            None
        } else {
            Some(comment.join(" "))
        },
    }))
}

fn is_ssh_type(field: &str) -> bool {
    field.starts_with("ssh-") || field.starts_with("ecdsa-") || field.starts_with("sk-")
}
