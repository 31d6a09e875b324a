//! Age encryption backend implementation.
//!
//! Provides encryption/decryption using the age format with x25519 and SSH
//! recipients and ASCII armor encoding.

use std::io::{Read, Write};
use std::str::FromStr;

use ::age::{ssh, x25519};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Cipher, Recipient};
use crate::error::{CipherError, KeyError, Result};

/// Age-based cryptographic backend
pub struct Age;

impl Cipher for Age {
    type Recipient = Recipient;

    fn encrypt(&self, plaintext: &[u8], recipients: &[Recipient]) -> Result<Vec<u8>> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting"
        );

        let encryptor = ::age::Encryptor::with_recipients(
            recipients.iter().map(|r| r.as_ref() as &dyn ::age::Recipient),
        )
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(::age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                ::age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext)?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        Ok(encrypted)
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        identity: &dyn ::age::Identity,
    ) -> Result<Zeroizing<Vec<u8>>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting");

        // The armored reader also accepts binary age files.
        let reader = ::age::armor::ArmoredReader::new(ciphertext);
        let decryptor = ::age::Decryptor::new(reader).map_err(|e| {
            debug!(error = %e, "unreadable age header");
            CipherError::DecryptionFailed
        })?;

        let mut reader = decryptor
            .decrypt(std::iter::once(identity))
            .map_err(|e| {
                debug!(error = %e, "age decryption rejected");
                CipherError::DecryptionFailed
            })?;

        let mut decrypted = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut decrypted).map_err(|e| {
            debug!(error = %e, "age payload corrupt");
            CipherError::DecryptionFailed
        })?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        Ok(decrypted)
    }
}

/// Parse a native age public key (`age1...`).
///
/// # Errors
///
/// Returns `KeyError::InvalidKey` if the key format is invalid.
pub fn parse_age_recipient(key: &str) -> Result<Recipient> {
    let recipient = x25519::Recipient::from_str(key.trim())
        .map_err(|e| KeyError::InvalidKey(format!("{}: {}", e, key.trim())))?;
    Ok(Box::new(recipient))
}

/// Parse an SSH public key (`ssh-ed25519 AAAA...`, `ssh-rsa AAAA...`).
///
/// # Errors
///
/// Returns `KeyError::InvalidKey` if the key is malformed or of an
/// unsupported type.
pub fn parse_ssh_recipient(key: &str) -> Result<Recipient> {
    let recipient = ssh::Recipient::from_str(key.trim())
        .map_err(|e| KeyError::InvalidKey(format!("{:?}", e)))?;
    Ok(Box::new(recipient))
}
