//! Passphrase-protected private keys.
//!
//! A protected key is the secret key body (the `AGE-SECRET-KEY-` prefix
//! removed), scrypt-encrypted with age, then written as
//! `GIT-PRIVATE-PROTECTED-KEY-1` followed by the upper-cased base-32 encoding
//! of the ciphertext in the bech32 alphabet, without padding or checksum.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use ::age::secrecy::{ExposeSecret, SecretString};
use ::age::x25519;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::cipher;
use crate::core::constants::{PROTECTED_KEY_HRP, SECRET_KEY_PREFIX};
use crate::core::files;
use crate::core::prompt::PassphrasePrompt;
use crate::core::types::PublicKey;
use crate::error::{Error, KeyError, Result};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Encode bytes as base-32 over the bech32 alphabet, no padding.
pub fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut buffer: u64 = 0;
    let mut bits = 0;

    for &byte in data {
        buffer = (buffer << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            result.push(CHARSET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        result.push(CHARSET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    result
}

/// Inverse of [`base32_encode`]. Case-insensitive; trailing pad bits are
/// dropped.
pub fn base32_decode(text: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits = 0;

    for c in text.chars() {
        let lower = c.to_ascii_lowercase() as u32;
        let value = CHARSET
            .iter()
            .position(|&b| u32::from(b) == lower)
            .ok_or_else(|| KeyError::InvalidIdentity(format!("invalid character '{}'", c)))?;
        buffer = (buffer << 5) | value as u64;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            result.push(((buffer >> bits) & 0xff) as u8);
        }
    }
    Ok(result)
}

/// `HRP1PAYLOAD` with an upper-cased payload.
fn pack(hrp: &str, data: &[u8]) -> String {
    format!("{}1{}", hrp, base32_encode(data).to_uppercase())
}

fn unpack<'a>(hrp: &str, text: &'a str) -> Option<&'a str> {
    text.strip_prefix(hrp)?.strip_prefix('1')
}

/// Whether `text` looks like a protected key.
pub fn is_protected(text: &str) -> bool {
    text.trim_start().starts_with(PROTECTED_KEY_HRP)
}

/// Wrap an identity under a passphrase.
pub fn protect(identity: &x25519::Identity, passphrase: SecretString) -> Result<String> {
    let secret = identity.to_string();
    let body = secret
        .expose_secret()
        .strip_prefix(SECRET_KEY_PREFIX)
        .ok_or_else(|| KeyError::InvalidIdentity("unexpected secret key format".to_string()))?;

    let encrypted = cipher::encrypt_with_passphrase(body.as_bytes(), passphrase)?;
    Ok(pack(PROTECTED_KEY_HRP, &encrypted))
}

/// Unwrap a protected key.
///
/// # Errors
///
/// Returns `CipherError::DecryptionFailed` for a wrong passphrase.
pub fn unprotect(text: &str, passphrase: SecretString) -> Result<x25519::Identity> {
    let payload = unpack(PROTECTED_KEY_HRP, text.trim())
        .ok_or_else(|| KeyError::InvalidIdentity("not a protected key".to_string()))?;
    let encrypted = base32_decode(payload)?;

    let body = cipher::decrypt_with_passphrase(&encrypted, passphrase)?;
    let body = std::str::from_utf8(&body)
        .map_err(|_| KeyError::InvalidIdentity("protected key body is not text".to_string()))?;

    let secret = Zeroizing::new(format!("{}{}", SECRET_KEY_PREFIX, body));
    x25519::Identity::from_str(&secret).map_err(|e| KeyError::InvalidIdentity(e.to_string()).into())
}

/// Prompt for a passphrase and unwrap a protected key.
pub fn import(text: &str, prompt: &dyn PassphrasePrompt) -> Result<x25519::Identity> {
    let passphrase = prompt.read_passphrase("Passphrase for protected key: ")?;
    unprotect(text, SecretString::from(passphrase.as_str().to_string()))
}

/// Result of [`generate`].
pub struct GeneratedKey {
    pub identity: x25519::Identity,
    pub public_key: PublicKey,
    pub protected: bool,
}

/// Generate a new identity and write it to `key_file`.
///
/// Asks for the passphrase twice. An empty passphrase stores the key in
/// clear text. The public key is also written to `pub_file` when given.
///
/// # Errors
///
/// Returns `KeyError::KeyFileExists` if `key_file` exists and
/// `KeyError::PassphraseMismatch` if the two entries differ.
pub fn generate(
    key_file: &Path,
    pub_file: Option<&Path>,
    prompt: &dyn PassphrasePrompt,
) -> Result<GeneratedKey> {
    if files::exists(key_file)? {
        return Err(KeyError::KeyFileExists(key_file.display().to_string()).into());
    }

    let first = prompt.read_passphrase("Passphrase (empty for none): ")?;
    let second = prompt.read_passphrase("Confirm passphrase: ")?;
    if first != second {
        return Err(KeyError::PassphraseMismatch.into());
    }

    let identity = x25519::Identity::generate();
    let public_key = identity.to_public().to_string();

    let protected = !first.is_empty();
    let secret = if protected {
        Zeroizing::new(protect(
            &identity,
            SecretString::from(first.as_str().to_string()),
        )?)
    } else {
        warn!(path = %key_file.display(), "writing private key without a passphrase");
        Zeroizing::new(identity.to_string().expose_secret().to_string())
    };

    let contents = Zeroizing::new(format!(
        "# created: {}\n# public key: {}\n{}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        public_key,
        secret.as_str()
    ));
    write_new(key_file, contents.as_bytes(), 0o600)?;
    debug!(path = %key_file.display(), protected, "wrote key file");

    if let Some(path) = pub_file {
        files::write_atomic(path, format!("{}\n", public_key).as_bytes(), 0o644)?;
    }

    Ok(GeneratedKey {
        identity,
        public_key,
        protected,
    })
}

/// Create `path` exclusively, failing if it appeared meanwhile.
fn write_new(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => {
            Error::from(KeyError::KeyFileExists(path.display().to_string()))
        }
        _ => Error::from(e),
    })?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}
