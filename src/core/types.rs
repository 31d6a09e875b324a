//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A repository-relative path with `/` separators (e.g., `config/api.key`).
pub type RepoPath = String;

/// Hex-encoded SHA-256 of a plaintext file. Empty when never hidden.
pub type Fingerprint = String;

/// Identifier of an authorized key, unique within the key list.
pub type KeyId = String;

/// Serialized public key (`age1...` or `ssh-ed25519 AAAA...`).
pub type PublicKey = String;
