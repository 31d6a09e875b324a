//! git-private - keep secret files encrypted inside a git repository.
//!
//! Each tracked file `F` gets an encrypted sibling `F.private` that is safe to
//! commit, while `F` itself stays git-ignored.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create the state directory
//! │   ├── add, remove   # Track and untrack files
//! │   ├── hide, reveal  # Encrypt and decrypt
//! │   ├── clean         # Delete plaintexts
//! │   ├── status        # Per-file state
//! │   ├── keys/         # list, add, remove, generate
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Cipher trait, age and passphrase encryption
//!     ├── config        # Settings from the environment
//!     ├── repo          # git root discovery and .gitignore
//!     ├── workspace     # Repository + store + settings
//!     ├── keys          # Authorized key registry
//!     ├── manifest      # Tracked file manifest
//!     ├── store         # Persisted documents
//!     ├── status        # Five-state file status
//!     ├── workflow      # Hide, reveal, clean, untrack
//!     ├── reencrypt     # Re-encryption after key changes
//!     ├── identity      # Private key loading
//!     ├── protect       # Passphrase-protected key export
//!     └── prompt        # Passphrase input
//! ```
//!
//! # Access levels
//!
//! Read-write keys may change the key list and hide files. Read-only keys
//! receive every file ciphertext, so they can reveal, but the key list is
//! encrypted to read-write keys only.

pub mod cli;
pub mod core;
pub mod error;
