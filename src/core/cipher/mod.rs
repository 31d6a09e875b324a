//! Cryptographic operations.
//!
//! Provides the encryption/decryption abstraction and its age implementation.
//! File ciphertexts and the key list are ASCII-armored age files; protected
//! private keys use age's scrypt passphrase mode.
//!
//! ## Recipients
//!
//! - **x25519**: native age public keys (`age1...`)
//! - **SSH**: `ssh-ed25519` and `ssh-rsa` public keys

use ::age::secrecy::SecretString;
use zeroize::Zeroizing;

use crate::error::Result;

mod age;
mod passphrase;

pub use self::age::{parse_age_recipient, parse_ssh_recipient, Age};

/// A boxed encryption target of any supported kind.
pub type Recipient = Box<dyn ::age::Recipient + Send>;

/// Cryptographic backend trait.
///
/// Abstracts encryption and decryption so the workflow does not depend on
/// the age stream API directly.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Encrypt plaintext for multiple recipients.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &[u8], recipients: &[Self::Recipient]) -> Result<Vec<u8>>;

    /// Decrypt a ciphertext using a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if the identity does not
    /// match or the ciphertext is corrupt.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        identity: &dyn ::age::Identity,
    ) -> Result<Zeroizing<Vec<u8>>>;
}

/// Encrypt plaintext for multiple recipients.
///
/// This is a convenience wrapper around `Age::encrypt`.
pub fn encrypt(plaintext: &[u8], recipients: &[Recipient]) -> Result<Vec<u8>> {
    Age.encrypt(plaintext, recipients)
}

/// Decrypt an age file with a private identity.
///
/// This is a convenience wrapper around `Age::decrypt`.
pub fn decrypt(ciphertext: &[u8], identity: &dyn ::age::Identity) -> Result<Zeroizing<Vec<u8>>> {
    Age.decrypt(ciphertext, identity)
}

/// Encrypt plaintext under a passphrase (scrypt).
pub fn encrypt_with_passphrase(plaintext: &[u8], passphrase: SecretString) -> Result<Vec<u8>> {
    passphrase::encrypt(plaintext, passphrase)
}

/// Decrypt a passphrase-encrypted age file.
pub fn decrypt_with_passphrase(
    ciphertext: &[u8],
    passphrase: SecretString,
) -> Result<Zeroizing<Vec<u8>>> {
    passphrase::decrypt(ciphertext, passphrase)
}
