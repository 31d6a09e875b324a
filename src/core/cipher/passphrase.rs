//! Passphrase (scrypt) encryption.
//!
//! Used only to protect generated private keys at rest. Output is binary
//! age; the caller chooses the text encoding.

use std::io::{Read, Write};

use ::age::secrecy::SecretString;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::error::{CipherError, Result};

pub(super) fn encrypt(plaintext: &[u8], passphrase: SecretString) -> Result<Vec<u8>> {
    trace!(plaintext_len = plaintext.len(), "encrypting with passphrase");

    let encryptor = ::age::Encryptor::with_user_passphrase(passphrase);

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
    writer.write_all(plaintext)?;
    writer
        .finish()
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    Ok(encrypted)
}

pub(super) fn decrypt(ciphertext: &[u8], passphrase: SecretString) -> Result<Zeroizing<Vec<u8>>> {
    trace!(ciphertext_len = ciphertext.len(), "decrypting with passphrase");

    let decryptor = ::age::Decryptor::new(ciphertext).map_err(|e| {
        debug!(error = %e, "unreadable passphrase header");
        CipherError::DecryptionFailed
    })?;

    let identity = ::age::scrypt::Identity::new(passphrase);
    let mut reader = decryptor
        .decrypt(std::iter::once(&identity as &dyn ::age::Identity))
        .map_err(|e| {
            debug!(error = %e, "passphrase rejected");
            CipherError::DecryptionFailed
        })?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut decrypted)
        .map_err(|_| CipherError::DecryptionFailed)?;

    Ok(decrypted)
}
